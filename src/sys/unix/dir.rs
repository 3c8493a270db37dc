use std::ffi::{CStr, CString, OsStr, OsString};
use std::mem::{ManuallyDrop, MaybeUninit};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use libc::{O_CLOEXEC, O_DIRECTORY, O_NOFOLLOW, O_RDONLY, c_int};
use tracing::warn;

use super::{Handle, clear_last_error, close, last_error};
use crate::FileType;
use crate::error::PlatformErrorCode;
use crate::sys::SysResult;

/// One open `DIR` stream. It owns its own descriptor, separate from the directory handle it was
/// opened from.
pub struct DirStream {
    dir: NonNull<libc::DIR>,
}

impl DirStream {
    /// Opens a stream over the directory behind `handle`. The handle stays valid and owned by the
    /// caller. `_path` is only needed by backends that list directories by name.
    /// Reopens `.` so that every stream has its own read offset, independent of `handle` and of
    /// other streams over it.
    pub fn open(handle: Handle, _path: &Path) -> SysResult<DirStream> {
        DirStream::open_at(handle.raw(), c".")
    }

    /// Opens the subdirectory `name` of this stream's directory. Symlinks are refused rather than
    /// followed.
    pub fn open_child(&self, name: &OsStr) -> SysResult<DirStream> {
        let name =
            CString::new(name.as_bytes()).map_err(|_| PlatformErrorCode::new(libc::EINVAL))?;
        // SAFETY: self.dir is an open stream.
        DirStream::open_at(unsafe { libc::dirfd(self.dir.as_ptr()) }, &name)
    }

    fn open_at(dir_fd: c_int, name: &CStr) -> SysResult<DirStream> {
        let flags = O_RDONLY | O_DIRECTORY | O_NOFOLLOW | O_CLOEXEC;

        // SAFETY: name is nul-terminated and outlives the call.
        let fd = match unsafe { libc::openat(dir_fd, name.as_ptr(), flags) } {
            -1 => return Err(last_error()),
            fd => Handle::from_raw(fd),
        };

        // SAFETY: fd is an open descriptor that the stream takes ownership of on success.
        match NonNull::new(unsafe { libc::fdopendir(fd.raw()) }) {
            Some(dir) => Ok(DirStream { dir }),
            None => {
                let code = last_error();
                let _ = close(fd);
                Err(code)
            },
        }
    }

    /// Reads the next record, or `None` at the end of the stream.
    pub fn next_entry(&mut self) -> SysResult<Option<(OsString, FileType)>> {
        // readdir only reports errors through errno.
        clear_last_error();
        // SAFETY: self.dir is an open stream.
        let entry = unsafe { libc::readdir(self.dir.as_ptr()) };
        if entry.is_null() {
            return match last_error() {
                None => Ok(None),
                code => Err(code),
            };
        }

        // SAFETY: A non-null entry is valid until the next readdir on this stream, and d_name is
        // nul-terminated.
        let (d_type, name) = unsafe { ((*entry).d_type, CStr::from_ptr((*entry).d_name.as_ptr())) };
        let file_type = match FileType::from_dirent_type(d_type) {
            Some(file_type) => file_type,
            None => self.stat_type(name)?,
        };

        Ok(Some((OsStr::from_bytes(name.to_bytes()).to_owned(), file_type)))
    }

    fn stat_type(&self, name: &CStr) -> SysResult<FileType> {
        let mut raw = MaybeUninit::<libc::stat>::uninit();
        // SAFETY: self.dir is an open stream, name is nul-terminated and raw is valid for writes.
        match unsafe {
            libc::fstatat(
                libc::dirfd(self.dir.as_ptr()),
                name.as_ptr(),
                raw.as_mut_ptr(),
                libc::AT_SYMLINK_NOFOLLOW,
            )
        } {
            -1 => Err(last_error()),
            // SAFETY: fstatat succeeded, so raw is initialized.
            _ => Ok(FileType::from_stat_mode(unsafe { raw.assume_init() }.st_mode)),
        }
    }

    pub fn close(self) -> SysResult<()> {
        let dir = ManuallyDrop::new(self).dir;
        // SAFETY: The stream is consumed, so it is never used again.
        match unsafe { libc::closedir(dir.as_ptr()) } {
            -1 => Err(last_error()),
            _ => Ok(()),
        }
    }
}

// SAFETY: A DIR stream isn't tied to the thread that opened it, and &mut self is required to read.
unsafe impl Send for DirStream {}

impl Drop for DirStream {
    fn drop(&mut self) {
        // SAFETY: The stream is being dropped, so it is never used again.
        if unsafe { libc::closedir(self.dir.as_ptr()) } == -1 {
            warn!(code = ?last_error(), "failed to close dropped directory stream");
        }
    }
}
