use std::fmt::Debug;

use crate::handle::Access;
use crate::util::sealed::Sealed;

/// The access mode of a [`File`](super::File), fixed at compile time.
pub trait AccessMode: Sealed + Debug {
    const ACCESS: Access;
}

/// Access modes that allow reading.
pub trait Read: AccessMode {}

/// Access modes that allow writing.
pub trait Write: AccessMode {}

#[derive(Debug)]
pub enum ReadOnly {}

impl Sealed for ReadOnly {}

impl AccessMode for ReadOnly {
    const ACCESS: Access = Access::ReadOnly { metadata_only: false };
}

impl Read for ReadOnly {}

#[derive(Debug)]
pub enum WriteOnly {}

impl Sealed for WriteOnly {}

impl AccessMode for WriteOnly {
    const ACCESS: Access = Access::WriteOnly;
}

impl Write for WriteOnly {}

#[derive(Debug)]
pub enum ReadWrite {}

impl Sealed for ReadWrite {}

impl AccessMode for ReadWrite {
    const ACCESS: Access = Access::ReadWrite;
}

impl Read for ReadWrite {}

impl Write for ReadWrite {}
