use std::fmt::{self, Display, Formatter};

use derive_more::Error;

use super::{ErrorKind, OperationDescription, PlatformErrorCode};

/// The error returned by every fallible operation in this crate.
///
/// `code` is `None` when no native code was available, for example when a native call reported
/// failure without setting the last error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct FileError {
    pub operation: OperationDescription,
    pub code: Option<PlatformErrorCode>,
}

impl FileError {
    pub const fn new(
        operation: OperationDescription,
        code: Option<PlatformErrorCode>,
    ) -> FileError {
        FileError { operation, code }
    }

    /// Builds an error from the calling thread's last native error.
    pub fn last(operation: OperationDescription) -> FileError {
        FileError::new(operation, PlatformErrorCode::last())
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.code.map(PlatformErrorCode::kind)
    }
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}: {}", self.operation, code),
            None => write!(f, "{}: no native error code available", self.operation),
        }
    }
}
