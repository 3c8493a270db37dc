use std::ffi::CStr;
use std::io;

use libc::{c_char, c_int};

use crate::error::{ErrorKind, PlatformErrorCode, RawCode};

/// Reported by emulated operations that reject their arguments without making a native call.
pub const INVALID_ARGUMENT: RawCode = libc::EINVAL;

pub fn last_error() -> Option<PlatformErrorCode> {
    io::Error::last_os_error().raw_os_error().and_then(PlatformErrorCode::new)
}

/// Resets `errno`, for calls like `readdir` that only signal failure through it.
pub fn clear_last_error() {
    // SAFETY: errno_location returns a valid pointer to the calling thread's errno.
    unsafe { *errno_location() = 0 };
}

#[cfg(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "redox",
    target_os = "hurd"
))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: Always safe to call, the returned pointer is thread-local.
    unsafe { libc::__errno_location() }
}

#[cfg(any(target_os = "android", target_os = "openbsd", target_os = "netbsd"))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: Always safe to call, the returned pointer is thread-local.
    unsafe { libc::__errno() }
}

#[cfg(any(target_vendor = "apple", target_os = "freebsd", target_os = "dragonfly"))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: Always safe to call, the returned pointer is thread-local.
    unsafe { libc::__error() }
}

#[cfg(any(target_os = "solaris", target_os = "illumos"))]
unsafe fn errno_location() -> *mut c_int {
    // SAFETY: Always safe to call, the returned pointer is thread-local.
    unsafe { libc::___errno() }
}

pub fn describe_code(code: RawCode) -> String {
    let mut buf: [c_char; 256] = [0; 256];
    // SAFETY: buf is valid for buf.len() bytes and the XSI strerror_r nul-terminates on success.
    match unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) } {
        // SAFETY: strerror_r succeeded, so buf holds a nul-terminated string.
        0 => unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy().into_owned(),
        _ => format!("unknown error {code}"),
    }
}

pub fn error_kind(code: RawCode) -> ErrorKind {
    match code {
        libc::ENOENT =>                   ErrorKind::NotFound,
        libc::EACCES | libc::EPERM =>     ErrorKind::PermissionDenied,
        libc::EEXIST =>                   ErrorKind::AlreadyExists,
        libc::ENOTDIR =>                  ErrorKind::NotADirectory,
        libc::EISDIR =>                   ErrorKind::IsADirectory,
        libc::EMFILE | libc::ENFILE =>    ErrorKind::TooManyOpenFiles,
        e if e == libc::EAGAIN || e == libc::EWOULDBLOCK => ErrorKind::WouldBlock,
        libc::EPIPE =>                    ErrorKind::BrokenPipe,
        libc::EIO =>                      ErrorKind::Io,
        libc::EINVAL | libc::EBADF =>     ErrorKind::InvalidInput,
        libc::ENOSPC | libc::EDQUOT =>    ErrorKind::StorageFull,
        libc::EINTR =>                    ErrorKind::Interrupted,
        _ =>                              ErrorKind::Other,
    }
}
