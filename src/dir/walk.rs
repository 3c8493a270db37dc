use std::ffi::OsString;
use std::path::PathBuf;

use tracing::{trace, warn};

use super::DirEntry;
use super::entry::is_dot;
use crate::error::{FileError, OperationDescription};
use crate::sys::DirStream;

/// An open directory listing and the path of the directory it lists.
struct Level {
    stream: DirStream,
    path: PathBuf,
}

/// A pre-order, depth-first walk over an explicit stack of open listings, the root at the bottom.
///
/// A subdirectory is yielded first and only entered on the following call: it waits in `pending`
/// until then. So there is always one open listing per directory on the current path, and
/// `pending` is only set between yielding a directory and the next call.
pub(crate) struct Walk {
    levels: Vec<Level>,
    pending: Option<OsString>,
    recursive: bool,
}

impl Walk {
    pub(crate) fn new(root: DirStream, path: PathBuf, recursive: bool) -> Walk {
        Walk {
            levels: vec![Level { stream: root, path }],
            pending: None,
            recursive,
        }
    }

    /// The next entry, or the error that ended the walk. Once this returns `None` or an error,
    /// every listing has been closed and later calls return `None` without touching the platform.
    pub(crate) fn next_entry(&mut self) -> Option<Result<DirEntry, FileError>> {
        loop {
            if let Some(name) = self.pending.take() {
                if let Err(error) = self.descend(name) {
                    return Some(Err(error));
                }
            }

            let level = self.levels.last_mut()?;
            match level.stream.next_entry() {
                Ok(Some((name, file_type))) => {
                    let path = level.path.join(&name);
                    if self.recursive && file_type.is_directory() && !is_dot(&name) {
                        self.pending = Some(name.clone());
                    }
                    return Some(Ok(DirEntry::new(path, name, file_type)));
                },
                Ok(None) => {
                    if let Err(error) = self.ascend() {
                        return Some(Err(error));
                    }
                },
                Err(code) => {
                    let operation = OperationDescription::reading_dir_entries(&level.path);
                    let error = FileError::new(operation, code);
                    self.abort();
                    return Some(Err(error));
                },
            }
        }
    }

    fn descend(&mut self, name: OsString) -> Result<(), FileError> {
        let Some(parent) = self.levels.last() else {
            return Ok(());
        };
        let path = parent.path.join(&name);

        match parent.stream.open_child(&name) {
            Ok(stream) => {
                trace!(path = %path.display(), "opened directory stream");
                self.levels.push(Level { stream, path });
                Ok(())
            },
            Err(code) => {
                self.abort();
                Err(FileError::new(OperationDescription::opening_dir_stream(&path), code))
            },
        }
    }

    /// Closes the exhausted listing on top, returning to its parent.
    fn ascend(&mut self) -> Result<(), FileError> {
        let Some(Level { stream, path }) = self.levels.pop() else {
            return Ok(());
        };

        trace!(path = %path.display(), "closing directory stream");
        stream.close().map_err(|code| {
            self.abort();
            FileError::new(OperationDescription::closing_dir_stream(&path), code)
        })
    }

    /// Closes every listing still open. Failures are only logged, since an error is already on
    /// its way to the caller.
    fn abort(&mut self) {
        self.pending = None;
        while let Some(Level { stream, path }) = self.levels.pop() {
            if let Err(code) = stream.close() {
                let error = FileError::new(OperationDescription::closing_dir_stream(&path), code);
                warn!(%error, "failed to close directory stream after an earlier error");
            }
        }
    }
}
