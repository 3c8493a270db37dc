#![cfg(test)]

use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::error::{ErrorKind, FileError};
use crate::handle::{OpenOptions, RawHandle, SeekWhence};
use crate::util::leak::assert_no_leak;

fn scratch() -> TempDir {
    tempfile::tempdir().expect("a scratch directory should be creatable")
}

fn create_with(path: &Path, contents: &[u8]) {
    with_write_handle(path, WriteOptions::new_file(true), |file| file.write(contents, None))
        .expect("Creating the file should succeed.");
}

#[test]
fn test_write_options() {
    let base = OpenOptions::new().read_write();

    assert_eq!(
        WriteOptions::default().apply(base),
        base.create_if_missing().truncate(false),
        "Editing should create the file if missing and keep its contents."
    );
    assert_eq!(
        WriteOptions::edit_file(false, true).apply(base),
        base.no_create().truncate(true)
    );
    assert_eq!(
        WriteOptions::new_file(true).apply(base),
        base.create_if_missing().truncate(true)
    );
    assert_eq!(
        WriteOptions::new_file(false).apply(base),
        base.create_exclusive()
    );
}

#[test]
#[serial]
fn test_hello_world_round_trip() {
    let dir = scratch();
    let path = dir.path().join("hello.txt");

    assert_no_leak!({
        let file = ReadWriteHandle::open(&path)
            .expect("Opening with defaults should create the file.");
        assert_eq!(file.write(b"Hello, ", None).expect("Writing should succeed."), 7);
        assert_eq!(file.write(b"World!", Some(7)).expect("Positional writing should succeed."), 6);
        file.close().expect("Closing should succeed.");

        let file = ReadHandle::open(&path).expect("Reopening for reading should succeed.");
        assert_eq!(
            file.read_all().expect("Reading should succeed."),
            b"Hello, World!",
            "Both writes should land where they were aimed."
        );
        file.close().expect("Closing should succeed.");
    });
}

#[test]
#[serial]
fn test_positional_write_ignores_cursor() {
    let dir = scratch();
    let path = dir.path().join("cursor.txt");
    create_with(&path, b"0123456789");

    assert_no_leak!({
        let file = ReadWriteHandle::open(&path).expect("Opening should succeed.");
        file.seek(2, SeekWhence::Beginning).expect("Seeking should succeed.");
        file.write(b"XY", Some(8)).expect("Positional writing should succeed.");

        assert_eq!(file.current_offset().expect("Querying the offset should succeed."), 2);
        assert_eq!(
            file.read_to_vec(None, 4).expect("Reading should succeed."),
            b"2345",
            "A sequential read should start at the cursor, not after the positional write."
        );

        file.seek(-2, SeekWhence::End).expect("Seeking from the end should succeed.");
        assert_eq!(file.read_to_vec(None, 8).expect("Reading should succeed."), b"XY");
        file.close().expect("Closing should succeed.");
    });
}

#[test]
#[serial]
fn test_read_length_and_offset() {
    let dir = scratch();
    let path = dir.path().join("partial.txt");
    create_with(&path, b"abcdefgh");

    let file = ReadHandle::open(&path).expect("Opening should succeed.");
    let mut buf = [0; 8];

    assert_eq!(file.read(Some(2), Some(3), &mut buf).expect("Reading should succeed."), 3);
    assert_eq!(&buf[..3], b"cde");
    assert_eq!(
        file.read(None, Some(100), &mut buf[..2]).expect("Reading should succeed."),
        2,
        "The length should be capped by the buffer."
    );
    assert_eq!(&buf[..2], b"ab");
    assert_eq!(
        file.read_to_vec(Some(6), 10).expect("Reading past the end should succeed."),
        b"gh",
        "The buffer should be sized to the bytes actually read."
    );
    let past_end = file.read_to_vec(Some(100), 10).expect("Reading past the end should succeed.");
    assert!(past_end.is_empty());
    file.close().expect("Closing should succeed.");
}

#[test]
#[serial]
fn test_emulated_cursor() {
    let dir = scratch();
    let path = dir.path().join("emulated.txt");
    create_with(&path, b"0123456789");

    assert_no_leak!({
        let handle = RawHandle::open(&path, &OpenOptions::new().read_write(), None)
            .expect("Opening should succeed.");
        let file = ReadWriteHandle::with_emulated_cursor(handle, &path);
        assert!(file.has_emulated_cursor());

        assert_eq!(file.read_to_vec(None, 3).expect("Reading should succeed."), b"012");
        assert_eq!(file.current_offset().expect("Querying the offset should succeed."), 3);

        assert_eq!(file.read_to_vec(Some(8), 2).expect("Reading should succeed."), b"89");
        assert_eq!(
            file.current_offset().expect("Querying the offset should succeed."),
            3,
            "Positional reads shouldn't move the emulated cursor."
        );

        assert_eq!(file.seek(2, SeekWhence::Current).expect("Seeking should succeed."), 5);
        file.write(b"ab", None).expect("Writing should succeed.");
        assert_eq!(file.current_offset().expect("Querying the offset should succeed."), 7);

        let offset = file.seek(-1, SeekWhence::End).expect("Seeking from the end should succeed.");
        assert_eq!(offset, 9);
        assert_eq!(file.read_all().expect("Reading should succeed."), b"9");

        let error = file
            .seek(-1, SeekWhence::Beginning)
            .expect_err("Seeking before the beginning should fail.");
        assert_eq!(error.kind(), Some(ErrorKind::InvalidInput));
        assert_eq!(
            file.current_offset().expect("Querying the offset should succeed."),
            10,
            "A failed seek shouldn't move the cursor."
        );

        file.close().expect("Closing should succeed.");
    });

    let contents =
        with_read_handle(&path, ReadHandle::read_all).expect("Reading back should succeed.");
    assert_eq!(contents, b"01234ab789");
}

#[test]
#[serial]
fn test_resize_and_metadata() {
    let dir = scratch();
    let path = dir.path().join("resize.bin");

    assert_no_leak!({
        let file = WriteHandle::open_with(&path, WriteOptions::new_file(false), None)
            .expect("Creating should succeed.");
        file.write(&[7; 64], None).expect("Writing should succeed.");
        file.resize(16).expect("Shrinking should succeed.");
        assert_eq!(file.metadata().expect("Fetching metadata should succeed.").size, 16);
        file.resize(100).expect("Growing should succeed.");
        assert_eq!(file.metadata().expect("Fetching metadata should succeed.").size, 100);
        file.synchronize().expect("Syncing should succeed.");
        file.close().expect("Closing should succeed.");
    });

    let error = WriteHandle::open_with(&path, WriteOptions::new_file(false), None)
        .expect_err("Creating an existing file exclusively should fail.");
    assert_eq!(error.kind(), Some(ErrorKind::AlreadyExists));
}

#[test]
#[serial]
fn test_errors_name_the_path() {
    let dir = scratch();
    let path = dir.path().join("named.txt");
    create_with(&path, b"data");

    let file = ReadHandle::open(&path).expect("Opening should succeed.");
    let error = file
        .seek(-10, SeekWhence::Current)
        .expect_err("Seeking before the beginning should fail.");
    assert!(
        error.operation.as_str().contains("named.txt"),
        "The error should name the file, got {error}."
    );
    file.close().expect("Closing should succeed.");
}

#[test]
#[serial]
fn test_scoped_helpers_close_on_error() {
    let dir = scratch();
    let path = dir.path().join("scoped.txt");
    create_with(&path, b"scoped");

    assert_no_leak!({
        let result: Result<(), FileError> = with_read_handle(&path, |file| {
            file.read_to_vec(None, 6)?;
            Err(FileError::new("giving up".into(), None))
        });
        assert_eq!(
            result.expect_err("The closure's error should be returned.").operation.as_str(),
            "giving up"
        );

        let missing = with_read_write_handle(
            dir.path().join("absent"),
            WriteOptions::edit_file(false, false),
            |_| Ok(()),
        );
        assert_eq!(missing.expect_err("Opening should fail.").kind(), Some(ErrorKind::NotFound));
    });
}

#[test]
#[serial]
fn test_with_system_handle() {
    let dir = scratch();
    let path = dir.path().join("borrowed.txt");
    create_with(&path, b"12345");

    with_read_handle(&path, |file| {
        let size = file.with_system_handle(|handle| handle.metadata())?.size;
        assert_eq!(size, 5);
        Ok(())
    })
    .expect("Borrowing the handle should succeed.");
}
