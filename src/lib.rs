//! A portable file I/O layer: one contract for files and directories on both POSIX-like systems and
//! Windows.
//!
//! # Purpose
//! The native APIs for files diverge a lot between platforms. POSIX hands out small integer file
//! descriptors and gives every one of them a file position plus `pread`/`pwrite` for free, while
//! Windows hands out opaque `HANDLE`s and, once a handle is opened for overlapped I/O, drops the
//! implicit file position entirely. This crate hides those differences behind a handful of types
//! that behave the same everywhere:
//!
//! - [`RawHandle`](handle::RawHandle) owns exactly one native resource and exposes the low-level
//!   primitives (read, write, positional read/write, seek, sync, truncate, duplicate, close).
//! - [`OpenOptions`](handle::OpenOptions) describes how something should be opened and is compiled
//!   into native flags by the platform backend.
//! - [`File<A>`](file::File) restricts a handle to an access mode at compile time
//!   ([`ReadHandle`](file::ReadHandle), [`WriteHandle`](file::WriteHandle),
//!   [`ReadWriteHandle`](file::ReadWriteHandle)) and emulates a file cursor where the platform
//!   doesn't provide one.
//! - [`Directory`](dir::Directory) and [`DirEntries`](dir::DirEntries) walk a directory, either
//!   one level or recursively, as a pull-based iterator that releases every native resource as
//!   soon as it ends.
//!
//! # Error Handling
//! Every fallible public operation returns a [`FileError`](error::FileError): a description of the
//! attempted operation (including the path, offset and length involved) together with the native
//! error code, if one was available. The code can be inspected portably through
//! [`ErrorKind`](error::ErrorKind). Nothing is retried and nothing is swallowed, with one
//! exception: a handle that is dropped without being closed is closed on a best-effort basis, and a
//! failure there is logged rather than returned (or panicking mid-unwind).
//!
//! # Resource Ownership
//! Closing consumes the value, so a handle can't be closed twice or used after being closed; the
//! compiler rejects it. Views that don't own a resource
//! ([`BorrowedHandle`](handle::BorrowedHandle), [`DirEntries`](dir::DirEntries)) borrow from their
//! owner and can't outlive it.
//!
//! # Dependencies
//! The platform backends rely on `libc` and `windows-sys` for their thin syscall wrappers. Errors
//! use `derive_more` to avoid a lot of very repetitive trait implementations, `tracing` is used for
//! logging and `parking_lot` provides the lock behind the emulated cursor.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod dir;
pub mod error;
pub mod file;
pub mod handle;

mod file_type;
mod metadata;
mod sys;

pub(crate) mod util;

pub use file_type::*;
pub use metadata::*;
