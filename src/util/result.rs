use tracing::warn;

use crate::error::{FileError, OperationDescription, PlatformErrorCode};

pub(crate) trait ErrorContext<T> {
    /// Converts a raw backend failure into a [`FileError`], attaching a description of the
    /// operation that was attempted. The description is only built on the error path.
    fn describe<F>(self, operation: F) -> Result<T, FileError>
    where
        F: FnOnce() -> OperationDescription;
}

impl<T> ErrorContext<T> for Result<T, Option<PlatformErrorCode>> {
    fn describe<F>(self, operation: F) -> Result<T, FileError>
    where
        F: FnOnce() -> OperationDescription,
    {
        self.map_err(|code| FileError::new(operation(), code))
    }
}

/// Combines the outcome of a scoped closure with the close that follows it. The closure's error
/// wins, a close failure behind it is only logged.
pub(crate) fn close_after<R>(
    result: Result<R, FileError>,
    closed: Result<(), FileError>,
) -> Result<R, FileError> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(error)) | (Err(error), Ok(())) => Err(error),
        (Err(error), Err(close_error)) => {
            warn!(%close_error, "failed to close after an earlier error");
            Err(error)
        },
    }
}
