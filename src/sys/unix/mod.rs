mod dir;
mod error;
mod flags;
mod handle;

pub use dir::*;
pub use error::*;
pub use flags::*;
pub use handle::*;
