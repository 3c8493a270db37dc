use crate::FileType;
use crate::handle::NativeStat;

/// The handful of metadata fields this crate itself needs, decoded from the platform's stat
/// structure. Everything else is available through
/// [`RawHandle::native_stat`](crate::handle::RawHandle::native_stat).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub size: u64,
    pub file_type: FileType,
    pub links: u64,
}

impl Metadata {
    #[cfg(unix)]
    #[allow(clippy::unnecessary_cast)]
    pub(crate) const fn from_native(raw: &NativeStat) -> Metadata {
        Metadata {
            size: raw.st_size as u64,
            file_type: FileType::from_stat_mode(raw.st_mode),
            links: raw.st_nlink as u64,
        }
    }

    #[cfg(windows)]
    pub(crate) const fn from_native(raw: &NativeStat) -> Metadata {
        Metadata {
            size: ((raw.nFileSizeHigh as u64) << 32) | raw.nFileSizeLow as u64,
            // A handle opened with FILE_FLAG_OPEN_REPARSE_POINT doesn't expose its reparse tag
            // here.
            file_type: FileType::from_attributes(raw.dwFileAttributes, None),
            links: raw.nNumberOfLinks as u64,
        }
    }
}
