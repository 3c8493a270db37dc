//! Directories and their traversal.
//!
//! [`DirEntries`] is a pull-based iterator over a directory's entries, either one level
//! ([`Directory::entries`] with `recursive: false`) or the whole tree below it, pre-order and depth
//! first. Each item is a [`DirEntry`] or a [`FileError`](crate::error::FileError). After the first
//! error or the end of the walk, every native stream it opened has been closed and it only returns
//! `None`.
//!
//! Entries are reported as the platform lists them: `.` and `..` are included at every level but
//! never descended into, and symlinks are reported as such and never followed.

mod directory;
mod entries;
mod entry;
mod walk;

pub use directory::*;
pub use entries::*;
pub use entry::*;

#[cfg(test)]
mod tests;
