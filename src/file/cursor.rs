use parking_lot::{Mutex, MutexGuard};

/// A file position kept in user space, for handles that don't have one natively.
///
/// The lock is held for the whole of a sequential operation (the native call included), so reading
/// the offset, transferring and advancing it happen as one step.
#[derive(Debug, Default)]
pub(crate) struct EmulatedCursor(Mutex<i64>);

impl EmulatedCursor {
    pub(crate) fn new() -> EmulatedCursor {
        EmulatedCursor(Mutex::new(0))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, i64> {
        self.0.lock()
    }

    pub(crate) fn get(&self) -> i64 {
        *self.0.lock()
    }
}
