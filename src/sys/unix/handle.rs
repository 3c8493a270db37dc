use std::ffi::CString;
use std::fmt::{self, Display, Formatter};
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{O_CLOEXEC, O_DIRECTORY, O_NONBLOCK, O_RDONLY, c_int, c_uint, off_t};

use super::{access_flags, creation_flags, last_error, open_flags};
use crate::error::PlatformErrorCode;
use crate::handle::{Creation, OpenOptions, Permissions, SeekWhence};
use crate::sys::SysResult;

pub type NativeHandle = c_int;
pub type NativeStat = libc::stat;

/// A file descriptor. Copyable, ownership is tracked one level up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(c_int);

impl Handle {
    pub const fn from_raw(raw: NativeHandle) -> Handle {
        Handle(raw)
    }

    pub const fn raw(self) -> NativeHandle {
        self.0
    }

    /// Every descriptor has a kernel-maintained file offset.
    pub const fn has_native_cursor(self) -> bool {
        true
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fd {}", self.0)
    }
}

pub(super) fn c_path(path: &Path) -> SysResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| PlatformErrorCode::new(libc::EINVAL))
}

fn to_off<T: TryInto<off_t>>(offset: T) -> SysResult<off_t> {
    offset.try_into().map_err(|_| PlatformErrorCode::new(libc::EOVERFLOW))
}

pub fn open(
    path: &Path,
    options: &OpenOptions,
    permissions: Option<Permissions>,
) -> SysResult<Handle> {
    let pathname = c_path(path)?;
    let flags = access_flags(options) | creation_flags(options) | open_flags(options);
    let mode = match options.creation {
        Creation::Never => 0,
        _ => c_uint::from(permissions.unwrap_or_default().mode()),
    };

    // SAFETY: pathname is nul-terminated and outlives the call.
    match unsafe { libc::open(pathname.as_ptr(), flags, mode) } {
        -1 => Err(last_error()),
        fd => Ok(Handle(fd)),
    }
}

pub fn open_directory(path: &Path) -> SysResult<Handle> {
    let pathname = c_path(path)?;

    // SAFETY: pathname is nul-terminated and outlives the call.
    match unsafe { libc::open(pathname.as_ptr(), O_RDONLY | O_DIRECTORY | O_CLOEXEC) } {
        -1 => Err(last_error()),
        fd => Ok(Handle(fd)),
    }
}

/// Closes the descriptor. It is invalid afterwards whatever the outcome.
pub fn close(handle: Handle) -> SysResult<()> {
    // SAFETY: The caller gives up the descriptor, nothing else touches memory here.
    match unsafe { libc::close(handle.0) } {
        -1 => Err(last_error()),
        _ => Ok(()),
    }
}

pub fn duplicate(handle: Handle) -> SysResult<Handle> {
    // SAFETY: F_DUPFD_CLOEXEC takes an int argument and doesn't touch memory.
    match unsafe { libc::fcntl(handle.0, libc::F_DUPFD_CLOEXEC, 0) } {
        -1 => Err(last_error()),
        fd => Ok(Handle(fd)),
    }
}

pub fn seek(handle: Handle, offset: i64, whence: SeekWhence) -> SysResult<i64> {
    // SAFETY: lseek doesn't touch memory.
    match unsafe { libc::lseek(handle.0, to_off(offset)?, whence.to_native()) } {
        -1 => Err(last_error()),
        position => Ok(i64::from(position)),
    }
}

pub fn read(handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    // SAFETY: buf is valid for writes of buf.len() bytes.
    match unsafe { libc::read(handle.0, buf.as_mut_ptr().cast(), buf.len()) } {
        -1 => Err(last_error()),
        count => Ok(count as usize),
    }
}

pub fn write(handle: Handle, buf: &[u8]) -> SysResult<usize> {
    // SAFETY: buf is valid for reads of buf.len() bytes.
    match unsafe { libc::write(handle.0, buf.as_ptr().cast(), buf.len()) } {
        -1 => Err(last_error()),
        count => Ok(count as usize),
    }
}

pub fn read_at(handle: Handle, buf: &mut [u8], offset: u64) -> SysResult<usize> {
    let offset = to_off(offset)?;
    // SAFETY: buf is valid for writes of buf.len() bytes.
    match unsafe { libc::pread(handle.0, buf.as_mut_ptr().cast(), buf.len(), offset) } {
        -1 => Err(last_error()),
        count => Ok(count as usize),
    }
}

pub fn write_at(handle: Handle, buf: &[u8], offset: u64) -> SysResult<usize> {
    let offset = to_off(offset)?;
    // SAFETY: buf is valid for reads of buf.len() bytes.
    match unsafe { libc::pwrite(handle.0, buf.as_ptr().cast(), buf.len(), offset) } {
        -1 => Err(last_error()),
        count => Ok(count as usize),
    }
}

pub fn sync(handle: Handle) -> SysResult<()> {
    // SAFETY: fsync doesn't touch memory.
    match unsafe { libc::fsync(handle.0) } {
        -1 => Err(last_error()),
        _ => Ok(()),
    }
}

/// `ftruncate` never moves the file offset, so nothing needs restoring.
pub fn truncate(handle: Handle, size: u64) -> SysResult<()> {
    // SAFETY: ftruncate doesn't touch memory.
    match unsafe { libc::ftruncate(handle.0, to_off(size)?) } {
        -1 => Err(last_error()),
        _ => Ok(()),
    }
}

pub fn truncate_here(handle: Handle) -> SysResult<()> {
    let position = seek(handle, 0, SeekWhence::Current)?;
    truncate(handle, u64::try_from(position).map_err(|_| PlatformErrorCode::new(libc::EOVERFLOW))?)
}

pub fn stat(handle: Handle) -> SysResult<NativeStat> {
    let mut raw = MaybeUninit::<NativeStat>::uninit();
    // SAFETY: raw is valid for writes of one stat structure.
    match unsafe { libc::fstat(handle.0, raw.as_mut_ptr()) } {
        -1 => Err(last_error()),
        // SAFETY: fstat succeeded, so raw is initialized.
        _ => Ok(unsafe { raw.assume_init() }),
    }
}

#[cfg(not(target_vendor = "apple"))]
pub fn pipe() -> SysResult<(Handle, Handle)> {
    let mut fds: [c_int; 2] = [-1; 2];
    // SAFETY: fds is valid for writes of two ints.
    match unsafe { libc::pipe2(fds.as_mut_ptr(), O_CLOEXEC) } {
        -1 => Err(last_error()),
        _ => Ok((Handle(fds[0]), Handle(fds[1]))),
    }
}

#[cfg(target_vendor = "apple")]
pub fn pipe() -> SysResult<(Handle, Handle)> {
    let mut fds: [c_int; 2] = [-1; 2];
    // SAFETY: fds is valid for writes of two ints.
    if unsafe { libc::pipe(fds.as_mut_ptr()) } == -1 {
        return Err(last_error());
    }
    let (read, write) = (Handle(fds[0]), Handle(fds[1]));

    for fd in fds {
        // SAFETY: F_SETFD takes an int argument and doesn't touch memory.
        if unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
            let code = last_error();
            let _ = close(read);
            let _ = close(write);
            return Err(code);
        }
    }
    Ok((read, write))
}

pub fn set_non_blocking(handle: Handle, non_blocking: bool) -> SysResult<()> {
    // SAFETY: F_GETFL takes no argument and doesn't touch memory.
    let flags = match unsafe { libc::fcntl(handle.0, libc::F_GETFL) } {
        -1 => return Err(last_error()),
        flags => flags,
    };
    let flags = if non_blocking { flags | O_NONBLOCK } else { flags & !O_NONBLOCK };

    // SAFETY: F_SETFL takes an int argument and doesn't touch memory.
    match unsafe { libc::fcntl(handle.0, libc::F_SETFL, flags) } {
        -1 => Err(last_error()),
        _ => Ok(()),
    }
}
