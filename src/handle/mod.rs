//! Owned native handles and the options used to open them.
//!
//! [`RawHandle`] is the lowest public layer of this crate: it owns exactly one native resource
//! identifier and exposes the primitive operations on it without any path bookkeeping or access
//! restrictions. Most callers will want [`File`](crate::file::File) or
//! [`Directory`](crate::dir::Directory) instead.

mod borrowed;
mod options;
mod permissions;
mod raw;
mod whence;

pub use borrowed::*;
pub use options::*;
pub use permissions::*;
pub use raw::*;
pub use whence::*;
