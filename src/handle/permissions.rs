use std::fmt::{self, Debug, Formatter};

/// The nine POSIX permission bits, used when a file may be created.
///
/// On POSIX these are passed straight to `open` (and are subject to the process umask). On Windows
/// they are compiled into a security descriptor with one allow entry each for the owner, the
/// primary group and everyone.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions(u16);

impl Permissions {
    pub const OWNER_READ: Permissions = Permissions(0o400);
    pub const OWNER_WRITE: Permissions = Permissions(0o200);
    pub const OWNER_EXECUTE: Permissions = Permissions(0o100);
    pub const GROUP_READ: Permissions = Permissions(0o040);
    pub const GROUP_WRITE: Permissions = Permissions(0o020);
    pub const GROUP_EXECUTE: Permissions = Permissions(0o010);
    pub const OTHER_READ: Permissions = Permissions(0o004);
    pub const OTHER_WRITE: Permissions = Permissions(0o002);
    pub const OTHER_EXECUTE: Permissions = Permissions(0o001);

    /// Creates a set of permissions from a mode, ignoring everything but the lowest nine bits.
    pub const fn from_mode(mode: u16) -> Permissions {
        Permissions(mode & 0o777)
    }

    pub const fn mode(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: Permissions) -> Permissions {
        Permissions(self.0 | other.0)
    }

    pub const fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    /// The `rwx` triple for the owner, as the lowest three bits.
    pub const fn owner(self) -> u8 {
        ((self.0 >> 6) & 0o7) as u8
    }

    pub const fn group(self) -> u8 {
        ((self.0 >> 3) & 0o7) as u8
    }

    pub const fn other(self) -> u8 {
        (self.0 & 0o7) as u8
    }
}

impl Default for Permissions {
    /// `rw-r--r--`
    fn default() -> Self {
        Permissions(0o644)
    }
}

impl Debug for Permissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Permissions(0o{:03o})", self.0)
    }
}
