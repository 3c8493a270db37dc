//! Platform backends. Each one exposes the same crate-private surface:
//!
//! - `Handle`, a `Copy` wrapper around the native handle value (ownership lives in
//!   [`RawHandle`](crate::handle::RawHandle)),
//! - free functions for every primitive (`open`, `close`, `seek`, `read`, `read_at`, ...), all
//!   returning `Result<T, Option<PlatformErrorCode>>` with the code captured at the point of
//!   failure,
//! - `DirStream`, one open directory listing that yields `(name, FileType)` pairs,
//! - flag compilation for [`OpenOptions`](crate::handle::OpenOptions) and error code
//!   description/classification.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::*;

#[cfg(not(any(unix, windows)))]
compile_error!("uniform-fs only supports unix-like platforms and windows");

use crate::error::PlatformErrorCode;

pub(crate) type SysResult<T> = Result<T, Option<PlatformErrorCode>>;
