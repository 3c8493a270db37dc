#![cfg(test)]

use std::path::Path;

use super::*;
use crate::handle::SeekWhence;
use crate::sys;

#[test]
fn test_zero_is_not_an_error() {
    assert!(
        PlatformErrorCode::new(0).is_none(),
        "The success code shouldn't be representable."
    );
}

#[test]
fn test_code_display() {
    let code = PlatformErrorCode::new(sys::INVALID_ARGUMENT).expect("a non-zero code");
    let shown = code.to_string();

    assert!(
        shown.ends_with(&format!("({})", sys::INVALID_ARGUMENT)),
        "Display should end with the raw code, got {shown:?}."
    );
    assert!(
        !code.description().is_empty(),
        "The platform should have a description for an invalid argument."
    );
    assert_eq!(code.kind(), ErrorKind::InvalidInput);
}

#[cfg(unix)]
#[test]
fn test_kind_mapping() {
    let kind = |raw| PlatformErrorCode::new(raw).expect("a non-zero code").kind();

    assert_eq!(kind(libc::ENOENT), ErrorKind::NotFound);
    assert_eq!(kind(libc::EACCES), ErrorKind::PermissionDenied);
    assert_eq!(kind(libc::EEXIST), ErrorKind::AlreadyExists);
    assert_eq!(kind(libc::ENOTDIR), ErrorKind::NotADirectory);
    assert_eq!(kind(libc::EISDIR), ErrorKind::IsADirectory);
    assert_eq!(kind(libc::EMFILE), ErrorKind::TooManyOpenFiles);
    assert_eq!(kind(libc::EAGAIN), ErrorKind::WouldBlock);
    assert_eq!(kind(libc::EPIPE), ErrorKind::BrokenPipe);
    assert_eq!(kind(libc::EIO), ErrorKind::Io);
    assert_eq!(kind(libc::ENOSPC), ErrorKind::StorageFull);
    assert_eq!(kind(libc::EINTR), ErrorKind::Interrupted);
    assert_eq!(
        kind(libc::ENOEXEC),
        ErrorKind::Other,
        "Codes without a portable meaning should be classified as other."
    );
}

#[cfg(windows)]
#[test]
fn test_kind_mapping() {
    use windows_sys::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_BROKEN_PIPE, ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND,
    };

    let kind = |raw| PlatformErrorCode::new(raw).expect("a non-zero code").kind();

    assert_eq!(kind(ERROR_FILE_NOT_FOUND), ErrorKind::NotFound);
    assert_eq!(kind(ERROR_ACCESS_DENIED), ErrorKind::PermissionDenied);
    assert_eq!(kind(ERROR_FILE_EXISTS), ErrorKind::AlreadyExists);
    assert_eq!(kind(ERROR_BROKEN_PIPE), ErrorKind::BrokenPipe);
}

#[test]
fn test_file_error_display() {
    let code = PlatformErrorCode::new(sys::INVALID_ARGUMENT);
    let operation = OperationDescription::seeking("a.txt", -4, SeekWhence::Current);
    let error = FileError::new(operation, code);

    assert_eq!(
        error.to_string(),
        format!(
            "seeking a.txt to offset -4 relative to the current position: {}",
            code.expect("a non-zero code")
        ),
        "Display should put the operation before the native error."
    );
    assert_eq!(error.kind(), Some(ErrorKind::InvalidInput));

    let without_code = FileError::new(OperationDescription::creating_pipe(), None);
    assert_eq!(
        without_code.to_string(),
        "creating pipe: no native error code available"
    );
    assert_eq!(without_code.kind(), None, "No code means no kind.");
}

#[test]
fn test_operation_descriptions() {
    let path = Path::new("dir/file.bin");

    assert_eq!(
        OperationDescription::opening(path).as_str(),
        "opening handle for dir/file.bin"
    );
    assert_eq!(
        OperationDescription::reading(path.display(), Some(7), 6).as_str(),
        "reading 6 bytes at offset 7 from dir/file.bin"
    );
    assert_eq!(
        OperationDescription::writing(path.display(), None, 13).as_str(),
        "writing 13 bytes at the current position to dir/file.bin"
    );
    assert_eq!(
        OperationDescription::resizing(path.display(), 0).as_str(),
        "resizing dir/file.bin to 0 bytes"
    );
    assert_eq!(
        OperationDescription::from("anything at all").to_string(),
        "anything at all",
        "Free-form descriptions should be kept as they are."
    );
}
