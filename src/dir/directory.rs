use std::path::{Path, PathBuf};

use super::{DirEntries, DirEntry};
use crate::error::{FileError, OperationDescription};
use crate::handle::{BorrowedHandle, RawHandle};
use crate::metadata::Metadata;
use crate::util::result::close_after;

/// An open directory.
#[derive(Debug)]
pub struct Directory {
    handle: RawHandle,
    path: PathBuf,
}

impl Directory {
    /// Opens the directory at `dir_path`, failing if it is anything else.
    pub fn open<P: AsRef<Path>>(dir_path: P) -> Result<Directory, FileError> {
        let path = dir_path.as_ref();
        Ok(Directory { handle: RawHandle::open_directory(path)?, path: path.to_owned() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterates over this directory's entries, or with `recursive` over the whole tree below it.
    pub fn entries(&self, recursive: bool) -> DirEntries<'_> {
        DirEntries::open(&self.handle, &self.path, recursive)
    }

    /// Collects the entries directly inside this directory.
    pub fn direct_entries(&self) -> Result<Vec<DirEntry>, FileError> {
        self.entries(false).collect()
    }

    pub fn metadata(&self) -> Result<Metadata, FileError> {
        self.handle.metadata().map_err(|error| {
            FileError::new(OperationDescription::fetching_info(self.path.display()), error.code)
        })
    }

    /// Runs `f` with a borrowed view of the native handle. The view can't escape `f`.
    pub fn with_system_handle<R, F>(&self, f: F) -> R
    where
        F: FnOnce(BorrowedHandle<'_>) -> R,
    {
        f(self.handle.borrow())
    }

    pub fn close(self) -> Result<(), FileError> {
        let Directory { handle, path } = self;
        handle.close().map_err(|error| {
            FileError::new(OperationDescription::closing(path.display()), error.code)
        })
    }
}

/// Opens the directory at `dir_path`, runs `f` with it and closes it again, on every exit path.
///
/// If `f` and the close both fail, the error from `f` is returned.
pub fn with_directory<P, R, F>(dir_path: P, f: F) -> Result<R, FileError>
where
    P: AsRef<Path>,
    F: FnOnce(&Directory) -> Result<R, FileError>,
{
    let directory = Directory::open(dir_path)?;
    let result = f(&directory);
    close_after(result, directory.close())
}
