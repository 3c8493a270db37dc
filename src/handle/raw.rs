use std::fmt::{self, Debug, Formatter};
use std::mem::ManuallyDrop;
use std::path::Path;

use tracing::{trace, warn};

use super::{BorrowedHandle, OpenOptions, Permissions, SeekWhence};
use crate::error::{FileError, OperationDescription};
use crate::metadata::Metadata;
use crate::sys;
use crate::util::result::ErrorContext;

pub use crate::sys::{NativeHandle, NativeStat, RawFlags, RawWhence};

/// Exclusive owner of one native file handle: a file descriptor on POSIX or a `HANDLE` on
/// Windows.
///
/// The handle is released by [`close`](RawHandle::close), which consumes the value so that it
/// can't be used (or closed) again:
///
/// ```compile_fail
/// # use uniform_fs::handle::{OpenOptions, RawHandle};
/// let handle = RawHandle::open("Cargo.toml", &OpenOptions::new(), None).unwrap();
/// handle.close().unwrap();
/// handle.close().unwrap(); // use of moved value
/// ```
///
/// If a `RawHandle` is dropped without being closed, it is closed on a best-effort basis and any
/// failure is logged. That is a safety net: callers that care about close errors (which can report
/// deferred write failures) must call `close` themselves.
pub struct RawHandle {
    pub(crate) inner: sys::Handle,
}

impl RawHandle {
    /// Opens `file_path` with the given options. `permissions` is only used if the file may be
    /// created; on POSIX, [`Permissions::default`] is used if none are given.
    pub fn open<P: AsRef<Path>>(
        file_path: P,
        options: &OpenOptions,
        permissions: Option<Permissions>,
    ) -> Result<RawHandle, FileError> {
        let path = file_path.as_ref();
        let inner = sys::open(path, options, permissions)
            .describe(|| OperationDescription::opening(path))?;

        trace!(handle = %inner, path = %path.display(), "opened handle");
        Ok(RawHandle { inner })
    }

    /// Opens a handle to the directory at `dir_path`, suitable for
    /// [`DirEntries`](crate::dir::DirEntries). Fails if the path isn't a directory.
    pub fn open_directory<P: AsRef<Path>>(dir_path: P) -> Result<RawHandle, FileError> {
        let path = dir_path.as_ref();
        let inner = sys::open_directory(path)
            .describe(|| OperationDescription::opening_directory(path))?;

        trace!(handle = %inner, path = %path.display(), "opened directory handle");
        Ok(RawHandle { inner })
    }

    /// Creates a connected pair of handles: `(read end, write end)`.
    pub fn pipe() -> Result<(RawHandle, RawHandle), FileError> {
        let (read, write) = sys::pipe().describe(OperationDescription::creating_pipe)?;
        trace!(read = %read, write = %write, "created pipe");
        Ok((RawHandle { inner: read }, RawHandle { inner: write }))
    }

    /// Takes ownership of a native handle.
    ///
    /// # Safety
    /// `raw` must be an open handle that nothing else owns or will close. On Windows it must not
    /// have been opened for overlapped I/O.
    pub unsafe fn from_raw(raw: NativeHandle) -> RawHandle {
        RawHandle { inner: sys::Handle::from_raw(raw) }
    }

    pub fn as_raw(&self) -> NativeHandle {
        self.inner.raw()
    }

    /// Gives up ownership of the native handle without closing it.
    pub fn into_raw(self) -> NativeHandle {
        ManuallyDrop::new(self).inner.raw()
    }

    /// Borrows the native handle without transferring ownership. The borrow can't outlive `self`.
    pub const fn borrow(&self) -> BorrowedHandle<'_> {
        BorrowedHandle::new(self.inner)
    }

    /// Whether the native handle keeps its own file position. Windows handles opened for
    /// overlapped I/O don't.
    pub fn has_native_cursor(&self) -> bool {
        self.inner.has_native_cursor()
    }

    pub fn close(self) -> Result<(), FileError> {
        // The native handle is invalid after close regardless of the outcome, so Drop must not run.
        let inner = ManuallyDrop::new(self).inner;
        trace!(handle = %inner, "closing handle");
        sys::close(inner).describe(|| OperationDescription::closing(inner))
    }

    pub fn duplicate(&self) -> Result<RawHandle, FileError> {
        let inner = sys::duplicate(self.inner)
            .describe(|| OperationDescription::duplicating(self.inner))?;

        trace!(handle = %self.inner, duplicate = %inner, "duplicated handle");
        Ok(RawHandle { inner })
    }

    /// Moves the native file position, returning the new offset from the beginning. Fails with
    /// [`ErrorKind::InvalidInput`](crate::error::ErrorKind::InvalidInput) on handles without a
    /// native cursor (see [`has_native_cursor`](RawHandle::has_native_cursor)).
    pub fn seek(&self, offset: i64, whence: SeekWhence) -> Result<i64, FileError> {
        sys::seek(self.inner, offset, whence)
            .describe(|| OperationDescription::seeking(self.inner, offset, whence))
    }

    /// The current native file position (`seek(0, Current)`).
    pub fn tell(&self) -> Result<i64, FileError> {
        self.seek(0, SeekWhence::Current)
    }

    /// Reads into `buf` from the current position, returning the number of bytes read. To read
    /// fewer bytes than `buf` holds, pass a shorter slice.
    ///
    /// Handles without a native cursor have no current position: this fails with
    /// [`ErrorKind::InvalidInput`](crate::error::ErrorKind::InvalidInput) and reads must go through
    /// an explicit offset instead.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FileError> {
        sys::read(self.inner, buf)
            .describe(|| OperationDescription::reading(self.inner, None, buf.len()))
    }

    /// Writes `buf` at the current position, returning the number of bytes written. Like
    /// [`read`](RawHandle::read), this needs a native cursor.
    pub fn write(&self, buf: &[u8]) -> Result<usize, FileError> {
        sys::write(self.inner, buf)
            .describe(|| OperationDescription::writing(self.inner, None, buf.len()))
    }

    /// Reads at `offset` without using or moving the file position.
    #[cfg(unix)]
    pub fn pread(&self, buf: &mut [u8], offset: u64) -> Result<usize, FileError> {
        self.read_at(buf, offset)
    }

    /// Writes at `offset` without using or moving the file position.
    #[cfg(unix)]
    pub fn pwrite(&self, buf: &[u8], offset: u64) -> Result<usize, FileError> {
        self.write_at(buf, offset)
    }

    /// Reads at `offset` by issuing an overlapped request and waiting for it to complete.
    #[cfg(windows)]
    pub fn read_overlapped(&self, buf: &mut [u8], offset: u64) -> Result<usize, FileError> {
        self.read_at(buf, offset)
    }

    /// Writes at `offset` by issuing an overlapped request and waiting for it to complete.
    #[cfg(windows)]
    pub fn write_overlapped(&self, buf: &[u8], offset: u64) -> Result<usize, FileError> {
        self.write_at(buf, offset)
    }

    pub(crate) fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, FileError> {
        sys::read_at(self.inner, buf, offset)
            .describe(|| OperationDescription::reading(self.inner, Some(offset), buf.len()))
    }

    pub(crate) fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize, FileError> {
        sys::write_at(self.inner, buf, offset)
            .describe(|| OperationDescription::writing(self.inner, Some(offset), buf.len()))
    }

    /// Flushes written data and metadata to the storage device.
    pub fn fsync(&self) -> Result<(), FileError> {
        sys::sync(self.inner).describe(|| OperationDescription::synchronizing(self.inner))
    }

    /// Sets the file's length to `size`. The native file position is left where it was.
    pub fn truncate(&self, size: u64) -> Result<(), FileError> {
        sys::truncate(self.inner, size)
            .describe(|| OperationDescription::resizing(self.inner, size))
    }

    /// Sets the file's length to the current native file position. Needs a native cursor.
    pub fn truncate_here(&self) -> Result<(), FileError> {
        sys::truncate_here(self.inner).describe(|| OperationDescription::truncating(self.inner))
    }

    /// The platform's raw stat structure for this handle, for metadata decoding outside this crate.
    pub fn native_stat(&self) -> Result<NativeStat, FileError> {
        self.borrow().native_stat()
    }

    pub fn metadata(&self) -> Result<Metadata, FileError> {
        self.borrow().metadata()
    }

    /// Switches `O_NONBLOCK` on an open descriptor.
    #[cfg(unix)]
    pub fn set_non_blocking(&mut self, non_blocking: bool) -> Result<(), FileError> {
        sys::set_non_blocking(self.inner, non_blocking)
            .describe(|| OperationDescription::setting_blocking(self.inner, non_blocking))
    }
}

impl Drop for RawHandle {
    fn drop(&mut self) {
        if let Err(code) = sys::close(self.inner) {
            let error = FileError::new(OperationDescription::closing(self.inner), code);
            warn!(%error, "failed to close dropped handle");
        }
    }
}

impl Debug for RawHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RawHandle({})", self.inner)
    }
}
