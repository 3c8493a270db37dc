use libc::{
    O_APPEND, O_CLOEXEC, O_CREAT, O_DIRECTORY, O_EXCL, O_NOFOLLOW, O_NONBLOCK, O_RDONLY, O_RDWR,
    O_TRUNC, O_WRONLY, c_int,
};

use crate::handle::{Access, Creation, OpenOptions, PlatformOptions};

pub type RawFlags = c_int;
pub type RawWhence = c_int;

pub const SEEK_BEGINNING: RawWhence = libc::SEEK_SET;
pub const SEEK_CURRENT: RawWhence = libc::SEEK_CUR;
pub const SEEK_END: RawWhence = libc::SEEK_END;

/// Flags that [`OpenOptions`] controls itself, and which therefore can't be passed as extra flags.
pub const EXTRA_FLAGS_MASK: RawFlags = !(
    libc::O_ACCMODE | O_CREAT | O_EXCL | O_TRUNC | O_APPEND | O_NOFOLLOW | O_CLOEXEC | O_NONBLOCK
        | O_DIRECTORY
);

pub fn access_flags(options: &OpenOptions) -> RawFlags {
    match options.access {
        // O_PATH is Linux only.
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Access::ReadOnly { metadata_only: true } => O_RDONLY | libc::O_PATH,
        Access::ReadOnly { .. } => O_RDONLY,
        Access::WriteOnly =>       O_WRONLY,
        Access::ReadWrite =>       O_RDWR,
    }
}

pub fn creation_flags(options: &OpenOptions) -> RawFlags {
    match options.creation {
        Creation::Never =>           0,
        Creation::CreateIfMissing => O_CREAT,
        Creation::CreateExclusive => O_CREAT | O_EXCL,
    }
}

macro_rules! flag_if {
    ($cond:expr, $flag:expr) => {
        if $cond { $flag } else { 0 }
    };
}

pub fn open_flags(options: &OpenOptions) -> RawFlags {
    flag_if!(options.truncate, O_TRUNC)
        | flag_if!(options.append, O_APPEND)
        | flag_if!(options.no_follow, O_NOFOLLOW)
        | flag_if!(options.close_on_exec, O_CLOEXEC)
        | flag_if!(options.non_blocking, O_NONBLOCK)
        | flag_if!(options.platform.contains(PlatformOptions::DIRECTORY_ONLY), O_DIRECTORY)
        | options.extra_flags
}
