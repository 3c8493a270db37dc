use std::ptr;

use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_BROKEN_PIPE, ERROR_DIRECTORY,
    ERROR_DISK_FULL, ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_HANDLE_DISK_FULL,
    ERROR_INVALID_HANDLE, ERROR_INVALID_PARAMETER, ERROR_NEGATIVE_SEEK, ERROR_NO_DATA,
    ERROR_OPERATION_ABORTED, ERROR_PATH_NOT_FOUND, ERROR_TOO_MANY_OPEN_FILES, GetLastError,
};
use windows_sys::Win32::System::Diagnostics::Debug::{
    FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS, FormatMessageW,
};

use crate::error::{ErrorKind, PlatformErrorCode, RawCode};

/// Reported by emulated operations that reject their arguments without making a native call.
pub const INVALID_ARGUMENT: RawCode = ERROR_NEGATIVE_SEEK;

pub fn last_error() -> Option<PlatformErrorCode> {
    // SAFETY: Always safe to call.
    PlatformErrorCode::new(unsafe { GetLastError() })
}

pub fn describe_code(code: RawCode) -> String {
    let mut buf = [0_u16; 512];
    // SAFETY: buf is valid for buf.len() UTF-16 units, and no inserts are read.
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            ptr::null(),
            code,
            0,
            buf.as_mut_ptr(),
            buf.len() as u32,
            ptr::null(),
        )
    };

    match len {
        0 => format!("unknown error {code}"),
        len => String::from_utf16_lossy(&buf[..len as usize]).trim_end().to_owned(),
    }
}

pub fn error_kind(code: RawCode) -> ErrorKind {
    match code {
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND =>       ErrorKind::NotFound,
        ERROR_ACCESS_DENIED =>                               ErrorKind::PermissionDenied,
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS =>          ErrorKind::AlreadyExists,
        ERROR_DIRECTORY =>                                   ErrorKind::NotADirectory,
        ERROR_TOO_MANY_OPEN_FILES =>                         ErrorKind::TooManyOpenFiles,
        ERROR_BROKEN_PIPE | ERROR_NO_DATA =>                 ErrorKind::BrokenPipe,
        ERROR_INVALID_PARAMETER | ERROR_NEGATIVE_SEEK
            | ERROR_INVALID_HANDLE =>                        ErrorKind::InvalidInput,
        ERROR_DISK_FULL | ERROR_HANDLE_DISK_FULL =>          ErrorKind::StorageFull,
        ERROR_OPERATION_ABORTED =>                           ErrorKind::Interrupted,
        _ =>                                                 ErrorKind::Other,
    }
}
