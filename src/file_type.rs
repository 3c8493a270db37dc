use derive_more::{Display, IsVariant};

/// The type of a filesystem entry.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum FileType {
    #[display("block device")]
    BlockDevice,
    #[display("character device")]
    CharDevice,
    #[display("directory")]
    Directory,
    #[display("fifo")]
    Fifo,
    #[display("symlink")]
    Symlink,
    #[display("regular file")]
    Regular,
    #[display("socket")]
    Socket,
    #[display("unknown")]
    Unknown,
}

use FileType::*;

#[cfg(unix)]
impl FileType {
    #[inline(always)]
    pub(crate) const fn from_stat_mode(st_mode: libc::mode_t) -> FileType {
        match st_mode & libc::S_IFMT {
            libc::S_IFBLK => BlockDevice,
            libc::S_IFCHR => CharDevice,
            libc::S_IFDIR => Directory,
            libc::S_IFIFO => Fifo,
            libc::S_IFLNK => Symlink,
            libc::S_IFREG => Regular,
            libc::S_IFSOCK => Socket,
            _ => Unknown,
        }
    }

    /// Decodes `dirent::d_type`. Returns `None` for `DT_UNKNOWN`, where the filesystem didn't
    /// record a type and the caller has to stat the entry instead.
    pub(crate) const fn from_dirent_type(d_type: u8) -> Option<FileType> {
        Some(match d_type {
            libc::DT_BLK => BlockDevice,
            libc::DT_CHR => CharDevice,
            libc::DT_DIR => Directory,
            libc::DT_FIFO => Fifo,
            libc::DT_LNK => Symlink,
            libc::DT_REG => Regular,
            libc::DT_SOCK => Socket,
            libc::DT_UNKNOWN => return None,
            _ => Unknown,
        })
    }
}

#[cfg(windows)]
impl FileType {
    /// Decodes Windows file attributes, with `reparse_tag` taken from
    /// `WIN32_FIND_DATAW::dwReserved0`
    /// when it is available. Symlinks are checked first, since a symlink to a directory carries the
    /// directory attribute too.
    pub(crate) const fn from_attributes(attributes: u32, reparse_tag: Option<u32>) -> FileType {
        use windows_sys::Win32::Storage::FileSystem::{
            FILE_ATTRIBUTE_DEVICE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_REPARSE_POINT,
        };

        const IO_REPARSE_TAG_SYMLINK: u32 = 0xA000_000C;

        if attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
            match reparse_tag {
                Some(IO_REPARSE_TAG_SYMLINK) => Symlink,
                _ => Unknown,
            }
        } else if attributes & FILE_ATTRIBUTE_DIRECTORY != 0 {
            Directory
        } else if attributes & FILE_ATTRIBUTE_DEVICE != 0 {
            CharDevice
        } else {
            Regular
        }
    }
}
