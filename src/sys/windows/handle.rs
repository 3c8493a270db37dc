use std::fmt::{self, Display, Formatter};
use std::iter;
use std::mem::{self, MaybeUninit};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use windows_sys::Win32::Foundation::{
    BOOL, CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, ERROR_BROKEN_PIPE,
    ERROR_DIRECTORY, ERROR_INVALID_NAME, ERROR_INVALID_PARAMETER, FALSE, GENERIC_READ, HANDLE,
    INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Security::SECURITY_ATTRIBUTES;
use windows_sys::Win32::Storage::FileSystem::{
    BY_HANDLE_FILE_INFORMATION, CreateFileW, FILE_ATTRIBUTE_DIRECTORY, FILE_FLAG_BACKUP_SEMANTICS,
    FILE_FLAG_OVERLAPPED, FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE,
    FlushFileBuffers, GetFileInformationByHandle, OPEN_EXISTING, ReadFile, SetEndOfFile,
    SetFilePointerEx, WriteFile,
};
use windows_sys::Win32::System::Pipes::CreatePipe;
use windows_sys::Win32::System::Threading::GetCurrentProcess;

use super::security::SecurityDescriptor;
use super::{access_flags, creation_flags, last_error, open_flags};
use crate::error::PlatformErrorCode;
use crate::handle::{Creation, OpenOptions, Permissions, PlatformOptions, SeekWhence};
use crate::sys::SysResult;

pub type NativeHandle = HANDLE;
pub type NativeStat = BY_HANDLE_FILE_INFORMATION;

const SHARE_ALL: u32 = FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE;

/// A `HANDLE`, along with whether it was opened for overlapped I/O. Copyable, ownership is
/// tracked one level up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    raw: HANDLE,
    pub(super) overlapped: bool,
}

// SAFETY: A HANDLE is an opaque kernel object reference, usable from any thread.
unsafe impl Send for Handle {}
// SAFETY: As above, no operation here relies on thread affinity.
unsafe impl Sync for Handle {}

impl Handle {
    /// Assumes the handle was opened for synchronous I/O.
    pub const fn from_raw(raw: NativeHandle) -> Handle {
        Handle { raw, overlapped: false }
    }

    pub const fn raw(self) -> NativeHandle {
        self.raw
    }

    /// Overlapped handles have no file pointer that reads and writes advance.
    pub const fn has_native_cursor(self) -> bool {
        !self.overlapped
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "handle {:p}", self.raw)
    }
}

pub(super) fn wide(path: &Path) -> SysResult<Vec<u16>> {
    let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(PlatformErrorCode::new(ERROR_INVALID_NAME));
    }
    wide.extend(iter::once(0));
    Ok(wide)
}

pub(super) fn check(result: BOOL) -> SysResult<()> {
    match result {
        0 => Err(last_error()),
        _ => Ok(()),
    }
}

pub(super) const fn clamp_len(len: usize) -> u32 {
    if len > u32::MAX as usize { u32::MAX } else { len as u32 }
}

pub fn open(
    path: &Path,
    options: &OpenOptions,
    permissions: Option<Permissions>,
) -> SysResult<Handle> {
    let name = wide(path)?;
    let descriptor = match (options.creation, permissions) {
        (Creation::Never, _) | (_, None) => None,
        (_, Some(permissions)) => Some(SecurityDescriptor::new(
            permissions,
            options.platform.contains(PlatformOptions::BACKUP_SEMANTICS),
        )?),
    };
    let attributes = SECURITY_ATTRIBUTES {
        nLength: mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: descriptor
            .as_ref()
            .map_or(ptr::null_mut(), SecurityDescriptor::as_ptr),
        bInheritHandle: BOOL::from(!options.close_on_exec),
    };
    let flags = open_flags(options);

    // SAFETY: name is nul-terminated, attributes and the descriptor it points to outlive the call.
    let raw = unsafe {
        CreateFileW(
            name.as_ptr(),
            access_flags(options),
            SHARE_ALL,
            &attributes,
            creation_flags(options),
            flags,
            ptr::null_mut(),
        )
    };

    if raw == INVALID_HANDLE_VALUE {
        return Err(last_error());
    }
    Ok(Handle { raw, overlapped: flags & FILE_FLAG_OVERLAPPED != 0 })
}

pub fn open_directory(path: &Path) -> SysResult<Handle> {
    let name = wide(path)?;

    // SAFETY: name is nul-terminated and outlives the call.
    let raw = unsafe {
        CreateFileW(
            name.as_ptr(),
            GENERIC_READ,
            SHARE_ALL,
            ptr::null(),
            OPEN_EXISTING,
            FILE_FLAG_BACKUP_SEMANTICS,
            ptr::null_mut(),
        )
    };
    if raw == INVALID_HANDLE_VALUE {
        return Err(last_error());
    }

    let handle = Handle::from_raw(raw);
    // Backup semantics open plain files too.
    match stat(handle) {
        Ok(info) if info.dwFileAttributes & FILE_ATTRIBUTE_DIRECTORY != 0 => Ok(handle),
        result => {
            let _ = close(handle);
            Err(result.err().unwrap_or(PlatformErrorCode::new(ERROR_DIRECTORY)))
        },
    }
}

/// Closes the handle. It is invalid afterwards whatever the outcome.
pub fn close(handle: Handle) -> SysResult<()> {
    // SAFETY: The caller gives up the handle.
    check(unsafe { CloseHandle(handle.raw) })
}

pub fn duplicate(handle: Handle) -> SysResult<Handle> {
    let mut raw = ptr::null_mut();
    // SAFETY: raw is a valid out pointer and the pseudo process handle never needs closing.
    check(unsafe {
        DuplicateHandle(
            GetCurrentProcess(),
            handle.raw,
            GetCurrentProcess(),
            &mut raw,
            0,
            FALSE,
            DUPLICATE_SAME_ACCESS,
        )
    })?;
    Ok(Handle { raw, overlapped: handle.overlapped })
}

/// Overlapped handles have no file pointer that reads and writes would use, so everything that
/// relies on one is refused with `ERROR_INVALID_PARAMETER`.
fn require_native_cursor(handle: Handle) -> SysResult<()> {
    if handle.overlapped { Err(PlatformErrorCode::new(ERROR_INVALID_PARAMETER)) } else { Ok(()) }
}

pub fn seek(handle: Handle, offset: i64, whence: SeekWhence) -> SysResult<i64> {
    require_native_cursor(handle)?;
    move_pointer(handle, offset, whence)
}

fn move_pointer(handle: Handle, offset: i64, whence: SeekWhence) -> SysResult<i64> {
    let mut position = 0_i64;
    // SAFETY: position is a valid out pointer.
    check(unsafe { SetFilePointerEx(handle.raw, offset, &mut position, whence.to_native()) })?;
    Ok(position)
}

/// A broken pipe means the write end was closed, which is end of file for the reader.
pub fn read(handle: Handle, buf: &mut [u8]) -> SysResult<usize> {
    require_native_cursor(handle)?;
    let mut count = 0_u32;
    // SAFETY: buf is valid for writes of at least clamp_len(buf.len()) bytes.
    match check(unsafe {
        ReadFile(handle.raw, buf.as_mut_ptr(), clamp_len(buf.len()), &mut count, ptr::null_mut())
    }) {
        Err(Some(code)) if code.raw() == ERROR_BROKEN_PIPE => Ok(0),
        result => result.map(|()| count as usize),
    }
}

pub fn write(handle: Handle, buf: &[u8]) -> SysResult<usize> {
    require_native_cursor(handle)?;
    let mut count = 0_u32;
    // SAFETY: buf is valid for reads of at least clamp_len(buf.len()) bytes.
    check(unsafe {
        WriteFile(handle.raw, buf.as_ptr(), clamp_len(buf.len()), &mut count, ptr::null_mut())
    })?;
    Ok(count as usize)
}

pub fn sync(handle: Handle) -> SysResult<()> {
    // SAFETY: No memory is touched.
    check(unsafe { FlushFileBuffers(handle.raw) })
}

/// `SetEndOfFile` truncates at the file pointer, so the pointer is moved there and put back. That
/// works on overlapped handles too, where the pointer is otherwise unused.
pub fn truncate(handle: Handle, size: u64) -> SysResult<()> {
    let size = i64::try_from(size).map_err(|_| PlatformErrorCode::new(super::INVALID_ARGUMENT))?;
    let saved = move_pointer(handle, 0, SeekWhence::Current)?;
    move_pointer(handle, size, SeekWhence::Beginning)?;

    let truncated = set_end_of_file(handle);
    let restored = move_pointer(handle, saved, SeekWhence::Beginning);
    truncated?;
    restored.map(drop)
}

pub fn truncate_here(handle: Handle) -> SysResult<()> {
    require_native_cursor(handle)?;
    set_end_of_file(handle)
}

fn set_end_of_file(handle: Handle) -> SysResult<()> {
    // SAFETY: No memory is touched.
    check(unsafe { SetEndOfFile(handle.raw) })
}

pub fn stat(handle: Handle) -> SysResult<NativeStat> {
    let mut info = MaybeUninit::<NativeStat>::uninit();
    // SAFETY: info is valid for writes of one BY_HANDLE_FILE_INFORMATION.
    check(unsafe { GetFileInformationByHandle(handle.raw, info.as_mut_ptr()) })?;
    // SAFETY: The call succeeded, so info is initialized.
    Ok(unsafe { info.assume_init() })
}

pub fn pipe() -> SysResult<(Handle, Handle)> {
    let attributes = SECURITY_ATTRIBUTES {
        nLength: mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: ptr::null_mut(),
        bInheritHandle: FALSE,
    };
    let (mut read, mut write) = (ptr::null_mut(), ptr::null_mut());

    // SAFETY: Both out pointers are valid and attributes outlives the call.
    check(unsafe { CreatePipe(&mut read, &mut write, &attributes, 0) })?;
    Ok((Handle::from_raw(read), Handle::from_raw(write)))
}
