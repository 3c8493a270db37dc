//! The error-translation boundary: native status codes turned into a uniform, inspectable
//! [`FileError`] that carries a description of the operation that failed.

mod code;
mod file_error;
mod kind;
mod operation;

pub use code::*;
pub use file_error::*;
pub use kind::*;
pub use operation::*;

#[cfg(test)]
mod tests;
