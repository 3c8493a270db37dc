use derive_more::{Display, IsVariant};

/// A portable classification of a [`PlatformErrorCode`](super::PlatformErrorCode).
///
/// Several native codes can map to the same kind (e.g. `ERROR_FILE_NOT_FOUND` and
/// `ERROR_PATH_NOT_FOUND` are both [`NotFound`](ErrorKind::NotFound)), and anything without an
/// obvious portable equivalent is [`Other`](ErrorKind::Other).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum ErrorKind {
    #[display("entity not found")]
    NotFound,
    #[display("permission denied")]
    PermissionDenied,
    #[display("entity already exists")]
    AlreadyExists,
    #[display("not a directory")]
    NotADirectory,
    #[display("is a directory")]
    IsADirectory,
    #[display("exceeded open file limit")]
    TooManyOpenFiles,
    #[display("operation would block")]
    WouldBlock,
    #[display("broken pipe")]
    BrokenPipe,
    #[display("error during I/O")]
    Io,
    #[display("invalid argument")]
    InvalidInput,
    #[display("available storage space exhausted")]
    StorageFull,
    #[display("interrupted")]
    Interrupted,
    #[display("other error")]
    Other,
}
