use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use super::{NativeHandle, NativeStat, RawHandle};
use crate::error::{FileError, OperationDescription};
use crate::metadata::Metadata;
use crate::sys;
use crate::util::result::ErrorContext;

/// A non-owning view of a native handle, tied to the lifetime of its owner. It can't close the
/// handle, and the borrow checker won't let it outlive the handle it was borrowed from.
#[derive(Clone, Copy)]
pub struct BorrowedHandle<'a> {
    inner: sys::Handle,
    _owner: PhantomData<&'a RawHandle>,
}

impl BorrowedHandle<'_> {
    pub(crate) const fn new(inner: sys::Handle) -> Self {
        BorrowedHandle { inner, _owner: PhantomData }
    }

    pub fn as_raw(&self) -> NativeHandle {
        self.inner.raw()
    }

    /// Fetches the platform's stat structure through this handle (`fstat` /
    /// `GetFileInformationByHandle`).
    pub fn native_stat(&self) -> Result<NativeStat, FileError> {
        sys::stat(self.inner).describe(|| OperationDescription::fetching_info(self.inner))
    }

    pub fn metadata(&self) -> Result<Metadata, FileError> {
        Ok(Metadata::from_native(&self.native_stat()?))
    }
}

impl Debug for BorrowedHandle<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BorrowedHandle({})", self.inner)
    }
}
