use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::FileType;

/// One entry produced by [`DirEntries`](super::DirEntries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    path: PathBuf,
    name: OsString,
    file_type: FileType,
}

impl DirEntry {
    pub(crate) const fn new(path: PathBuf, name: OsString, file_type: FileType) -> DirEntry {
        DirEntry { path, name, file_type }
    }

    /// The traversal root joined with the entry's path below it.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last component of the path, as listed. Unlike [`Path::file_name`] this is also
    /// available for `.` and `..`.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Whether this is the `.` or `..` entry of its directory.
    pub fn is_dot(&self) -> bool {
        is_dot(&self.name)
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

pub(crate) fn is_dot(name: &OsStr) -> bool {
    name == "." || name == ".."
}
