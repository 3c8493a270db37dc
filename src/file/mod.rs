//! Files restricted to an access mode at compile time.
//!
//! A [`File<A>`] is a [`RawHandle`](crate::handle::RawHandle) plus the path it was opened from
//! (used to describe errors) and, where the native handle has no file position of its own, an
//! emulated cursor. The access mode `A` decides which operations exist at all:
//!
//! ```compile_fail
//! # use uniform_fs::file::ReadHandle;
//! let file = ReadHandle::open("Cargo.toml").unwrap();
//! file.write(b"nope", None).unwrap(); // no method named `write`
//! ```
//!
//! # Cursors
//! Every read or write takes an optional offset. With an offset, the operation is positional: it
//! neither uses nor moves the file's cursor. Without one, the operation starts at the cursor and
//! advances it by the bytes actually transferred. Handles opened for overlapped I/O on Windows
//! (which is how [`File::open`] opens them there) have no native cursor, so one is kept here
//! behind a lock instead.

mod access;
mod cursor;
mod file;
mod options;
mod scoped;

pub use access::*;
pub use file::*;
pub use options::*;
pub use scoped::*;

pub(crate) use cursor::EmulatedCursor;

#[cfg(test)]
mod tests;
