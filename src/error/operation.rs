use std::fmt::Display;
use std::path::Path;

use derive_more::Display;

use crate::handle::SeekWhence;

/// A free-form description of the operation that failed, naming the action along with the path,
/// offset and length involved where relevant.
///
/// The constructors below exist so that descriptions stay consistent across the crate, but any
/// string can be converted into one.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct OperationDescription(String);

impl OperationDescription {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn opening(path: &Path) -> OperationDescription {
        format!("opening handle for {}", path.display()).into()
    }

    pub fn opening_directory(path: &Path) -> OperationDescription {
        format!("opening directory handle for {}", path.display()).into()
    }

    pub fn closing(target: impl Display) -> OperationDescription {
        format!("closing {target}").into()
    }

    pub fn duplicating(target: impl Display) -> OperationDescription {
        format!("duplicating {target}").into()
    }

    pub fn seeking(target: impl Display, offset: i64, whence: SeekWhence) -> OperationDescription {
        format!("seeking {target} to offset {offset} relative to the {whence}").into()
    }

    pub fn reading(
        target: impl Display,
        offset: Option<u64>,
        length: usize,
    ) -> OperationDescription {
        match offset {
            Some(offset) => format!("reading {length} bytes at offset {offset} from {target}"),
            None => format!("reading {length} bytes at the current position from {target}"),
        }
        .into()
    }

    pub fn writing(
        target: impl Display,
        offset: Option<u64>,
        length: usize,
    ) -> OperationDescription {
        match offset {
            Some(offset) => format!("writing {length} bytes at offset {offset} to {target}"),
            None => format!("writing {length} bytes at the current position to {target}"),
        }
        .into()
    }

    pub fn resizing(target: impl Display, size: u64) -> OperationDescription {
        format!("resizing {target} to {size} bytes").into()
    }

    pub fn truncating(target: impl Display) -> OperationDescription {
        format!("truncating {target} at the current position").into()
    }

    pub fn synchronizing(target: impl Display) -> OperationDescription {
        format!("synchronizing {target}").into()
    }

    pub fn fetching_info(target: impl Display) -> OperationDescription {
        format!("fetching info for {target}").into()
    }

    pub fn setting_blocking(target: impl Display, non_blocking: bool) -> OperationDescription {
        let mode = if non_blocking { "non-blocking" } else { "blocking" };
        format!("switching {target} to {mode} mode").into()
    }

    pub fn creating_pipe() -> OperationDescription {
        "creating pipe".into()
    }

    pub fn opening_dir_stream(path: &Path) -> OperationDescription {
        format!("opening directory stream for {}", path.display()).into()
    }

    pub fn reading_dir_entries(path: &Path) -> OperationDescription {
        format!("reading directory entries at {}", path.display()).into()
    }

    pub fn closing_dir_stream(path: &Path) -> OperationDescription {
        format!("closing directory stream for {}", path.display()).into()
    }
}

impl From<String> for OperationDescription {
    fn from(value: String) -> Self {
        OperationDescription(value)
    }
}

impl From<&str> for OperationDescription {
    fn from(value: &str) -> Self {
        OperationDescription(value.to_owned())
    }
}
