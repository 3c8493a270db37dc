mod dir;
mod error;
mod flags;
mod handle;
mod overlapped;
mod security;

pub use dir::*;
pub use error::*;
pub use flags::*;
pub use handle::*;
pub use overlapped::*;
