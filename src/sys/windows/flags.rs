use windows_sys::Win32::Foundation::{GENERIC_READ, GENERIC_WRITE};
use windows_sys::Win32::Storage::FileSystem::{
    CREATE_ALWAYS, CREATE_NEW, FILE_APPEND_DATA, FILE_ATTRIBUTE_NORMAL, FILE_BEGIN, FILE_CURRENT,
    FILE_END, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT, FILE_FLAG_OVERLAPPED,
    FILE_READ_ATTRIBUTES, OPEN_ALWAYS, OPEN_EXISTING, READ_CONTROL, TRUNCATE_EXISTING,
};

use crate::handle::{Access, Creation, OpenOptions, PlatformOptions};

pub type RawFlags = u32;
pub type RawWhence = u32;

pub const SEEK_BEGINNING: RawWhence = FILE_BEGIN;
pub const SEEK_CURRENT: RawWhence = FILE_CURRENT;
pub const SEEK_END: RawWhence = FILE_END;

/// Every `FILE_FLAG_*`/`FILE_ATTRIBUTE_*` bit can be passed through.
pub const EXTRA_FLAGS_MASK: RawFlags = !0;

pub fn access_flags(options: &OpenOptions) -> RawFlags {
    let write = if options.append { FILE_APPEND_DATA } else { GENERIC_WRITE };

    match options.access {
        Access::ReadOnly { metadata_only: true } =>  FILE_READ_ATTRIBUTES | READ_CONTROL,
        Access::ReadOnly { metadata_only: false } => GENERIC_READ,
        Access::WriteOnly =>                         write,
        Access::ReadWrite =>                         GENERIC_READ | write,
    }
}

/// The creation disposition, which also carries truncation on Windows.
pub fn creation_flags(options: &OpenOptions) -> RawFlags {
    match (options.creation, options.truncate) {
        (Creation::Never, false) =>           OPEN_EXISTING,
        (Creation::Never, true) =>            TRUNCATE_EXISTING,
        (Creation::CreateIfMissing, false) => OPEN_ALWAYS,
        (Creation::CreateIfMissing, true) =>  CREATE_ALWAYS,
        (Creation::CreateExclusive, _) =>     CREATE_NEW,
    }
}

macro_rules! flag_if {
    ($cond:expr, $flag:expr) => {
        if $cond { $flag } else { 0 }
    };
}

/// Close-on-exec isn't a flag here, it becomes the inheritance bit of the security attributes.
pub fn open_flags(options: &OpenOptions) -> RawFlags {
    FILE_ATTRIBUTE_NORMAL
        | flag_if!(options.no_follow, FILE_FLAG_OPEN_REPARSE_POINT)
        | flag_if!(options.non_blocking, FILE_FLAG_OVERLAPPED)
        | flag_if!(
            options.platform.contains(PlatformOptions::BACKUP_SEMANTICS),
            FILE_FLAG_BACKUP_SEMANTICS
        )
        | options.extra_flags
}
