use std::fmt::{self, Display, Formatter};
use std::num::NonZero;

use super::ErrorKind;
use crate::sys;

/// The raw integer type of a native error code: `errno` values on POSIX, `GetLastError` values on
/// Windows.
#[cfg(unix)]
pub type RawCode = libc::c_int;
#[cfg(windows)]
pub type RawCode = u32;

/// A native error code. Zero means success on every supported platform, so it can never be
/// represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformErrorCode(NonZero<RawCode>);

impl PlatformErrorCode {
    /// Wraps a raw code, returning `None` for the success code.
    pub const fn new(raw: RawCode) -> Option<PlatformErrorCode> {
        match NonZero::new(raw) {
            Some(code) => Some(PlatformErrorCode(code)),
            None => None,
        }
    }

    /// Reads the calling thread's last native error (`errno` / `GetLastError`).
    pub fn last() -> Option<PlatformErrorCode> {
        sys::last_error()
    }

    pub const fn raw(self) -> RawCode {
        self.0.get()
    }

    /// A human-readable description from the platform (`strerror_r` / `FormatMessageW`).
    pub fn description(self) -> String {
        sys::describe_code(self.raw())
    }

    pub fn kind(self) -> ErrorKind {
        sys::error_kind(self.raw())
    }
}

impl Display for PlatformErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.raw())
    }
}
