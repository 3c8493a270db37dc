use std::path::Path;

use super::{AccessMode, File, ReadHandle, ReadWriteHandle, WriteHandle, WriteOptions};
use crate::error::FileError;
use crate::util::result::close_after;

fn scoped<A, R, F>(file: File<A>, f: F) -> Result<R, FileError>
where
    A: AccessMode,
    F: FnOnce(&File<A>) -> Result<R, FileError>,
{
    let result = f(&file);
    close_after(result, file.close())
}

/// Opens `file_path` for reading, runs `f` with it and closes it again, on every exit path.
///
/// If `f` and the close both fail, the error from `f` is returned.
pub fn with_read_handle<P, R, F>(file_path: P, f: F) -> Result<R, FileError>
where
    P: AsRef<Path>,
    F: FnOnce(&ReadHandle) -> Result<R, FileError>,
{
    scoped(ReadHandle::open(file_path)?, f)
}

/// Like [`with_read_handle`], for writing.
pub fn with_write_handle<P, R, F>(file_path: P, options: WriteOptions, f: F) -> Result<R, FileError>
where
    P: AsRef<Path>,
    F: FnOnce(&WriteHandle) -> Result<R, FileError>,
{
    scoped(WriteHandle::open_with(file_path, options, None)?, f)
}

/// Like [`with_read_handle`], for reading and writing.
pub fn with_read_write_handle<P, R, F>(
    file_path: P,
    options: WriteOptions,
    f: F,
) -> Result<R, FileError>
where
    P: AsRef<Path>,
    F: FnOnce(&ReadWriteHandle) -> Result<R, FileError>,
{
    scoped(ReadWriteHandle::open_with(file_path, options, None)?, f)
}
