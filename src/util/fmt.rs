use std::fmt::{self, Debug, Formatter, LowerHex};

/// Prints raw native bits as `0x...` in `Debug` output, where decimal would be unreadable.
pub struct DebugHex<T: LowerHex>(pub T);

impl<T: LowerHex> Debug for DebugHex<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
