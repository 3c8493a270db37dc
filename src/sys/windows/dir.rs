use std::ffi::{OsStr, OsString};
use std::mem::MaybeUninit;
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};
use std::ptr;

use tracing::warn;
use windows_sys::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{
    FIND_FIRST_EX_LARGE_FETCH, FindClose, FindExInfoBasic, FindExSearchNameMatch,
    FindFirstFileExW, FindNextFileW, WIN32_FIND_DATAW,
};

use super::{Handle, check, last_error, wide};
use crate::FileType;
use crate::sys::SysResult;

/// One `FindFirstFileExW` search over a directory's entries. The search is only started on the
/// first read, so opening a stream never fails.
pub struct DirStream {
    path: PathBuf,
    find: Option<HANDLE>,
}

impl DirStream {
    /// Searches by path, so the directory handle itself isn't used.
    pub fn open(_handle: Handle, path: &Path) -> SysResult<DirStream> {
        Ok(DirStream { path: path.to_owned(), find: None })
    }

    pub fn open_child(&self, name: &OsStr) -> SysResult<DirStream> {
        Ok(DirStream { path: self.path.join(name), find: None })
    }

    pub fn next_entry(&mut self) -> SysResult<Option<(OsString, FileType)>> {
        let mut data = MaybeUninit::<WIN32_FIND_DATAW>::uninit();

        match self.find {
            None => {
                let pattern = wide(&self.path.join("*"))?;
                // SAFETY: pattern is nul-terminated and data is valid for writes of one
                // WIN32_FIND_DATAW.
                let find = unsafe {
                    FindFirstFileExW(
                        pattern.as_ptr(),
                        FindExInfoBasic,
                        data.as_mut_ptr().cast(),
                        FindExSearchNameMatch,
                        ptr::null(),
                        FIND_FIRST_EX_LARGE_FETCH,
                    )
                };
                if find == INVALID_HANDLE_VALUE {
                    return match last_error() {
                        Some(code) if code.raw() == ERROR_FILE_NOT_FOUND => Ok(None),
                        code => Err(code),
                    };
                }
                self.find = Some(find);
            },
            Some(find) => {
                // SAFETY: find is an open search and data is valid for writes.
                if unsafe { FindNextFileW(find, data.as_mut_ptr()) } == 0 {
                    return match last_error() {
                        Some(code) if code.raw() == ERROR_NO_MORE_FILES => Ok(None),
                        code => Err(code),
                    };
                }
            },
        }

        // SAFETY: The find call succeeded, so data is initialized.
        let data = unsafe { data.assume_init() };
        let len = data.cFileName.iter().position(|&c| c == 0).unwrap_or(data.cFileName.len());
        let name = OsString::from_wide(&data.cFileName[..len]);

        Ok(Some((name, FileType::from_attributes(data.dwFileAttributes, Some(data.dwReserved0)))))
    }

    pub fn close(mut self) -> SysResult<()> {
        match self.find.take() {
            // SAFETY: The stream is consumed, so the search is never used again.
            Some(find) => check(unsafe { FindClose(find) }),
            None => Ok(()),
        }
    }
}

// SAFETY: A find handle isn't tied to the thread that opened it, and &mut self is required to read.
unsafe impl Send for DirStream {}

impl Drop for DirStream {
    fn drop(&mut self) {
        if let Some(find) = self.find {
            // SAFETY: The stream is being dropped, so the search is never used again.
            if unsafe { FindClose(find) } == 0 {
                warn!(code = ?last_error(), "failed to close dropped directory search");
            }
        }
    }
}
