use std::fmt::{self, Debug, Formatter};
use std::ops::BitOr;

use crate::sys::{self, RawFlags};
use crate::util::fmt::DebugHex;

/// Which operations an opened handle will permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read access. With `metadata_only` the handle can only be used to query metadata (`O_PATH`
    /// on Linux, attribute access on Windows); other platforms treat it as plain read access.
    ReadOnly { metadata_only: bool },
    WriteOnly,
    ReadWrite,
}

/// What to do when the target does or doesn't exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Creation {
    /// Fail if the file is missing.
    Never,
    /// Create the file if it is missing, otherwise open the existing one.
    CreateIfMissing,
    /// Create the file, failing if it already exists.
    CreateExclusive,
}

/// Options that only mean something on one platform. Ignored everywhere else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlatformOptions(u64);

impl PlatformOptions {
    pub const NONE: PlatformOptions = PlatformOptions(0);
    /// POSIX `O_DIRECTORY`: fail unless the path names a directory.
    pub const DIRECTORY_ONLY: PlatformOptions = PlatformOptions(1 << 0);
    /// Windows `FILE_FLAG_BACKUP_SEMANTICS`: required to open a handle to a directory.
    pub const BACKUP_SEMANTICS: PlatformOptions = PlatformOptions(1 << 32);

    pub const fn contains(self, other: PlatformOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PlatformOptions {
    type Output = PlatformOptions;

    fn bitor(self, rhs: Self) -> Self::Output {
        PlatformOptions(self.0 | rhs.0)
    }
}

impl Debug for PlatformOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.contains(PlatformOptions::DIRECTORY_ONLY).then_some("DIRECTORY_ONLY"))
            .entries(self.contains(PlatformOptions::BACKUP_SEMANTICS).then_some("BACKUP_SEMANTICS"))
            .finish()
    }
}

/// A declarative description of how to open a path, compiled into native flags when passed to
/// [`RawHandle::open`](super::RawHandle::open).
///
/// The defaults are read-only access to an existing file, with close-on-exec set and everything
/// else unset. Each builder method consumes and returns the options, so a configuration reads as a
/// single expression:
///
/// ```
/// # use uniform_fs::handle::OpenOptions;
/// let options = OpenOptions::new()
///     .read_write()
///     .create_if_missing()
///     .truncate(true);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub(crate) access: Access,
    pub(crate) creation: Creation,
    pub(crate) truncate: bool,
    pub(crate) append: bool,
    pub(crate) no_follow: bool,
    pub(crate) close_on_exec: bool,
    pub(crate) non_blocking: bool,
    pub(crate) platform: PlatformOptions,
    pub(crate) extra_flags: RawFlags,
}

impl OpenOptions {
    pub const fn new() -> OpenOptions {
        OpenOptions {
            access: Access::ReadOnly { metadata_only: false },
            creation: Creation::Never,
            truncate: false,
            append: false,
            no_follow: false,
            close_on_exec: true,
            non_blocking: false,
            platform: PlatformOptions::NONE,
            extra_flags: 0,
        }
    }

    pub const fn access(self, access: Access) -> OpenOptions {
        OpenOptions { access, ..self }
    }

    pub const fn read_only(self) -> OpenOptions {
        self.access(Access::ReadOnly { metadata_only: false })
    }

    pub const fn metadata_only(self) -> OpenOptions {
        self.access(Access::ReadOnly { metadata_only: true })
    }

    pub const fn write_only(self) -> OpenOptions {
        self.access(Access::WriteOnly)
    }

    pub const fn read_write(self) -> OpenOptions {
        self.access(Access::ReadWrite)
    }

    pub const fn creation(self, creation: Creation) -> OpenOptions {
        OpenOptions { creation, ..self }
    }

    pub const fn no_create(self) -> OpenOptions {
        self.creation(Creation::Never)
    }

    pub const fn create_if_missing(self) -> OpenOptions {
        self.creation(Creation::CreateIfMissing)
    }

    pub const fn create_exclusive(self) -> OpenOptions {
        self.creation(Creation::CreateExclusive)
    }

    pub const fn truncate(self, truncate: bool) -> OpenOptions {
        OpenOptions { truncate, ..self }
    }

    pub const fn append(self, append: bool) -> OpenOptions {
        OpenOptions { append, ..self }
    }

    /// Whether a symlink in the final path component is followed. `false` maps to `O_NOFOLLOW` or
    /// `FILE_FLAG_OPEN_REPARSE_POINT`.
    pub const fn follow_links(self, follow: bool) -> OpenOptions {
        OpenOptions { no_follow: !follow, ..self }
    }

    /// Whether the handle is closed in child processes. On Windows this is inverted into the
    /// inheritance bit of the handle's security attributes.
    pub const fn close_on_exec(self, close_on_exec: bool) -> OpenOptions {
        OpenOptions { close_on_exec, ..self }
    }

    /// `O_NONBLOCK` on POSIX. On Windows this is `FILE_FLAG_OVERLAPPED`, which also removes the
    /// handle's file position: sequential reads and writes are then only available through
    /// [`File`](crate::file::File)'s emulated cursor.
    pub const fn non_blocking(self, non_blocking: bool) -> OpenOptions {
        OpenOptions { non_blocking, ..self }
    }

    pub const fn platform_options(self, platform: PlatformOptions) -> OpenOptions {
        OpenOptions { platform, ..self }
    }

    /// Adds raw native flags on top of the ones compiled from the other options. On POSIX, flags
    /// that the other options control (access mode, creation, truncation, etc.) are masked out.
    ///
    /// # Safety
    /// The flags are passed to the platform's open call unchecked, and some of them change the
    /// meaning of the returned handle in ways the rest of this crate doesn't expect (e.g.
    /// `O_ASYNC`, `FILE_FLAG_NO_BUFFERING`). The caller must ensure the resulting handle is still
    /// valid for the operations it is used with.
    pub const unsafe fn extra_flags(self, extra_flags: RawFlags) -> OpenOptions {
        OpenOptions { extra_flags: extra_flags & sys::EXTRA_FLAGS_MASK, ..self }
    }

    pub const fn get_access(&self) -> Access {
        self.access
    }

    pub const fn get_creation(&self) -> Creation {
        self.creation
    }

    /// The native access mode bits.
    pub fn access_flags(&self) -> RawFlags {
        sys::access_flags(self)
    }

    /// The native creation bits (`O_CREAT`/`O_EXCL`) or creation disposition (`OPEN_EXISTING`,
    /// `CREATE_NEW`, ...), with truncation folded in on Windows.
    pub fn creation_flags(&self) -> RawFlags {
        sys::creation_flags(self)
    }

    /// The remaining native behaviour flags, including any extra flags.
    pub fn open_flags(&self) -> RawFlags {
        sys::open_flags(self)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions::new()
    }
}

impl Debug for OpenOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("access", &self.access)
            .field("creation", &self.creation)
            .field("truncate", &self.truncate)
            .field("append", &self.append)
            .field("follow_links", &!self.no_follow)
            .field("close_on_exec", &self.close_on_exec)
            .field("non_blocking", &self.non_blocking)
            .field("platform", &self.platform)
            .field("extra_flags", &DebugHex(self.extra_flags))
            .finish()
    }
}
