use derive_more::Display;

use crate::sys;

/// The anchor that a seek offset is interpreted relative to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekWhence {
    #[display("beginning")]
    Beginning,
    #[display("current position")]
    Current,
    #[display("end")]
    End,
}

impl SeekWhence {
    /// The native constant: `SEEK_SET`/`SEEK_CUR`/`SEEK_END` or
    /// `FILE_BEGIN`/`FILE_CURRENT`/`FILE_END`.
    pub const fn to_native(self) -> sys::RawWhence {
        match self {
            SeekWhence::Beginning => sys::SEEK_BEGINNING,
            SeekWhence::Current => sys::SEEK_CURRENT,
            SeekWhence::End => sys::SEEK_END,
        }
    }

    pub const fn from_native(raw: sys::RawWhence) -> Option<SeekWhence> {
        match raw {
            sys::SEEK_BEGINNING => Some(SeekWhence::Beginning),
            sys::SEEK_CURRENT => Some(SeekWhence::Current),
            sys::SEEK_END => Some(SeekWhence::End),
            _ => None,
        }
    }
}
