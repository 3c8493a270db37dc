use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::{AccessMode, EmulatedCursor, Read, ReadOnly, ReadWrite, Write, WriteOnly, WriteOptions};
use crate::error::{FileError, OperationDescription, PlatformErrorCode};
use crate::handle::{Access, BorrowedHandle, OpenOptions, Permissions, RawHandle, SeekWhence};
use crate::metadata::Metadata;
use crate::sys;
use crate::util::result::ErrorContext;

pub type ReadHandle = File<ReadOnly>;
pub type WriteHandle = File<WriteOnly>;
pub type ReadWriteHandle = File<ReadWrite>;

const READ_CHUNK: usize = 8 * 1024;

/// An open file, restricted to the access mode `A`. See the [module docs](super) for how the
/// cursor behaves.
pub struct File<A: AccessMode> {
    handle: RawHandle,
    path: PathBuf,
    cursor: Option<EmulatedCursor>,
    _access: PhantomData<fn() -> A>,
}

impl<A: AccessMode> File<A> {
    /// The options [`File::open`] uses: access mode `A`, and on Windows, overlapped I/O. Writable
    /// files are created if missing, without truncation.
    pub const fn options() -> OpenOptions {
        let options = OpenOptions::new().access(A::ACCESS).non_blocking(cfg!(windows));
        match A::ACCESS {
            Access::ReadOnly { .. } => options,
            Access::WriteOnly | Access::ReadWrite => {
                WriteOptions::edit_file(true, false).apply(options)
            },
        }
    }

    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<File<A>, FileError> {
        File::open_with_options(file_path, &File::<A>::options(), None)
    }

    /// Opens `file_path` with arbitrary options. The access mode is always replaced by `A`'s.
    pub fn open_with_options<P: AsRef<Path>>(
        file_path: P,
        options: &OpenOptions,
        permissions: Option<Permissions>,
    ) -> Result<File<A>, FileError> {
        let path = file_path.as_ref();
        let handle = RawHandle::open(path, &options.access(A::ACCESS), permissions)?;
        Ok(File::from_raw(handle, path))
    }

    /// Wraps an open handle. `handle` should have been opened with access compatible with `A`,
    /// otherwise operations fail with the platform's bad-handle error.
    pub fn from_raw<P: Into<PathBuf>>(handle: RawHandle, file_path: P) -> File<A> {
        let cursor = (!handle.has_native_cursor()).then(EmulatedCursor::new);
        File { handle, path: file_path.into(), cursor, _access: PhantomData }
    }

    /// Wraps a handle but keeps the cursor in user space even if the handle has its own.
    #[cfg(test)]
    pub(crate) fn with_emulated_cursor<P: Into<PathBuf>>(
        handle: RawHandle,
        file_path: P,
    ) -> File<A> {
        File {
            handle,
            path: file_path.into(),
            cursor: Some(EmulatedCursor::new()),
            _access: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the cursor is kept here rather than by the native handle.
    pub const fn has_emulated_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// Moves the cursor, returning the new offset from the beginning of the file.
    pub fn seek(&self, offset: i64, whence: SeekWhence) -> Result<i64, FileError> {
        let describe = || OperationDescription::seeking(self.path.display(), offset, whence);

        let Some(cursor) = &self.cursor else {
            return sys::seek(self.handle.inner, offset, whence).describe(describe);
        };

        let mut position = cursor.lock();
        let base = match whence {
            SeekWhence::Beginning => 0,
            SeekWhence::Current => *position,
            SeekWhence::End => {
                let size = self.metadata()?.size;
                i64::try_from(size).map_err(|_| FileError::new(describe(), invalid_argument()))?
            },
        };

        match base.checked_add(offset) {
            Some(target) if target >= 0 => {
                *position = target;
                Ok(target)
            },
            _ => Err(FileError::new(describe(), invalid_argument())),
        }
    }

    /// The cursor's offset from the beginning of the file.
    pub fn current_offset(&self) -> Result<i64, FileError> {
        match &self.cursor {
            Some(cursor) => Ok(cursor.get()),
            None => self.seek(0, SeekWhence::Current),
        }
    }

    /// Flushes written data and metadata to the storage device.
    pub fn synchronize(&self) -> Result<(), FileError> {
        sys::sync(self.handle.inner)
            .describe(|| OperationDescription::synchronizing(self.path.display()))
    }

    pub fn metadata(&self) -> Result<Metadata, FileError> {
        let raw = sys::stat(self.handle.inner)
            .describe(|| OperationDescription::fetching_info(self.path.display()))?;
        Ok(Metadata::from_native(&raw))
    }

    /// Runs `f` with a borrowed view of the native handle. The view can't escape `f`.
    pub fn with_system_handle<R, F>(&self, f: F) -> R
    where
        F: FnOnce(BorrowedHandle<'_>) -> R,
    {
        f(self.handle.borrow())
    }

    /// Gives up the access restriction and returns the underlying handle. An emulated cursor is
    /// discarded.
    pub fn into_raw_handle(self) -> RawHandle {
        self.handle
    }

    pub fn close(self) -> Result<(), FileError> {
        let File { handle, path, .. } = self;
        handle.close().map_err(|error| {
            FileError::new(OperationDescription::closing(path.display()), error.code)
        })
    }
}

impl<A: Read> File<A> {
    /// Reads up to `length` bytes (at most `buf.len()`, the default) into `buf`, returning the
    /// number of bytes read. With an `offset` the read is positional and the cursor is untouched,
    /// otherwise it reads from the cursor and advances it.
    pub fn read(
        &self,
        offset: Option<u64>,
        length: Option<usize>,
        buf: &mut [u8],
    ) -> Result<usize, FileError> {
        let len = length.map_or(buf.len(), |length| length.min(buf.len()));
        let buf = &mut buf[..len];
        let describe = |at| OperationDescription::reading(self.path.display(), at, len);

        match (offset, &self.cursor) {
            (Some(offset), _) => {
                sys::read_at(self.handle.inner, buf, offset).describe(|| describe(Some(offset)))
            },
            (None, None) => sys::read(self.handle.inner, buf).describe(|| describe(None)),
            (None, Some(cursor)) => {
                let mut position = cursor.lock();
                // The emulated cursor is never negative.
                let at = *position as u64;
                let count =
                    sys::read_at(self.handle.inner, buf, at).describe(|| describe(Some(at)))?;
                *position += count as i64;
                Ok(count)
            },
        }
    }

    /// Reads up to `length` bytes into a new buffer, sized to the bytes actually read.
    pub fn read_to_vec(&self, offset: Option<u64>, length: usize) -> Result<Vec<u8>, FileError> {
        let mut buf = vec![0; length];
        let count = self.read(offset, None, &mut buf)?;
        buf.truncate(count);
        Ok(buf)
    }

    /// Reads from the cursor until end of file.
    pub fn read_all(&self) -> Result<Vec<u8>, FileError> {
        let mut data = Vec::new();
        let mut chunk = vec![0; READ_CHUNK];
        loop {
            match self.read(None, None, &mut chunk)? {
                0 => return Ok(data),
                count => data.extend_from_slice(&chunk[..count]),
            }
        }
    }
}

impl<A: Write> File<A> {
    /// Opens `file_path` for writing, with `options` deciding what happens to an existing file.
    /// `permissions` are only used if the file is created.
    pub fn open_with<P: AsRef<Path>>(
        file_path: P,
        options: WriteOptions,
        permissions: Option<Permissions>,
    ) -> Result<File<A>, FileError> {
        File::open_with_options(file_path, &options.apply(File::<A>::options()), permissions)
    }

    /// Writes `data`, returning the number of bytes written. With an `offset` the write is
    /// positional and the cursor is untouched, otherwise it writes at the cursor and advances it.
    pub fn write(&self, data: &[u8], offset: Option<u64>) -> Result<usize, FileError> {
        let describe = |at| OperationDescription::writing(self.path.display(), at, data.len());

        match (offset, &self.cursor) {
            (Some(offset), _) => {
                sys::write_at(self.handle.inner, data, offset).describe(|| describe(Some(offset)))
            },
            (None, None) => sys::write(self.handle.inner, data).describe(|| describe(None)),
            (None, Some(cursor)) => {
                let mut position = cursor.lock();
                // The emulated cursor is never negative.
                let at = *position as u64;
                let count =
                    sys::write_at(self.handle.inner, data, at).describe(|| describe(Some(at)))?;
                *position += count as i64;
                Ok(count)
            },
        }
    }

    /// Sets the file's length. The cursor stays where it was, even if that is now past the end.
    pub fn resize(&self, size: u64) -> Result<(), FileError> {
        sys::truncate(self.handle.inner, size)
            .describe(|| OperationDescription::resizing(self.path.display(), size))
    }
}

fn invalid_argument() -> Option<PlatformErrorCode> {
    PlatformErrorCode::new(sys::INVALID_ARGUMENT)
}

impl<A: AccessMode> Debug for File<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("handle", &self.handle)
            .field("path", &self.path)
            .field("access", &A::ACCESS)
            .field("emulated_cursor", &self.cursor.as_ref().map(EmulatedCursor::get))
            .finish()
    }
}
