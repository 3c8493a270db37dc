use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::path::Path;

use tracing::trace;

use super::walk::Walk;
use super::{DirEntry, Directory};
use crate::error::{FileError, OperationDescription};
use crate::handle::RawHandle;
use crate::sys::DirStream;
use crate::util::result::ErrorContext;

/// The entries of a directory, one level or recursively. Borrows the [`Directory`] it lists when
/// created through [`Directory::entries`].
///
/// Yields `Err` at most once: a failure to start the walk (such as the root not being a
/// directory) is reported through the first call to `next`, a failure mid-walk through the call
/// that hit it. Either way the iterator is fused afterwards.
pub struct DirEntries<'a> {
    state: State,
    _directory: PhantomData<&'a Directory>,
}

enum State {
    Direct(Walk),
    Recursive(Walk),
    OpenError(FileError),
    Exhausted,
}

impl<'a> DirEntries<'a> {
    /// Starts listing the directory behind `handle`. The listing holds its own native resources,
    /// `handle` can be closed while it is still in use.
    pub(crate) fn open(handle: &RawHandle, dir_path: &Path, recursive: bool) -> DirEntries<'a> {
        let stream = DirStream::open(handle.inner, dir_path)
            .describe(|| OperationDescription::opening_dir_stream(dir_path));
        let stream = match stream {
            Ok(stream) => stream,
            Err(error) => return DirEntries::failed(error),
        };

        trace!(path = %dir_path.display(), recursive, "opened directory stream");
        let walk = Walk::new(stream, dir_path.to_owned(), recursive);
        DirEntries {
            state: if recursive { State::Recursive(walk) } else { State::Direct(walk) },
            _directory: PhantomData,
        }
    }

    /// An iterator that yields `error` once and then ends.
    pub(crate) const fn failed(error: FileError) -> DirEntries<'a> {
        DirEntries { state: State::OpenError(error), _directory: PhantomData }
    }

    pub const fn is_recursive(&self) -> bool {
        matches!(self.state, State::Recursive(_))
    }

    /// Whether `next` will only return `None` from now on.
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }
}

impl Iterator for DirEntries<'_> {
    type Item = Result<DirEntry, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.state {
            State::Direct(walk) | State::Recursive(walk) => walk.next_entry(),
            State::OpenError(_) | State::Exhausted => None,
        };

        match item {
            Some(Ok(entry)) => Some(Ok(entry)),
            end_or_error => match mem::replace(&mut self.state, State::Exhausted) {
                State::OpenError(error) => Some(Err(error)),
                _ => end_or_error,
            },
        }
    }
}

impl FusedIterator for DirEntries<'_> {}

/// Lists the directory at `dir_path` without keeping a [`Directory`] around. Failing to open it is
/// reported as the iterator's only item.
pub fn walk<P: AsRef<Path>>(dir_path: P, recursive: bool) -> DirEntries<'static> {
    let path = dir_path.as_ref();
    let handle = match RawHandle::open_directory(path) {
        Ok(handle) => handle,
        Err(error) => return DirEntries::failed(error),
    };

    let entries = DirEntries::open(&handle, path, recursive);
    match handle.close() {
        Ok(()) => entries,
        Err(error) => DirEntries::failed(error),
    }
}
