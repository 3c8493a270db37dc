use crate::handle::{Creation, OpenOptions};

/// How a file opened for writing treats what is already at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOptions {
    /// Open an existing file, keeping or truncating its contents.
    EditFile { create_if_missing: bool, truncate: bool },
    /// Start from an empty file. Without `replace_existing`, an existing file is an error.
    NewFile { replace_existing: bool },
}

impl WriteOptions {
    pub const fn edit_file(create_if_missing: bool, truncate: bool) -> WriteOptions {
        WriteOptions::EditFile { create_if_missing, truncate }
    }

    pub const fn new_file(replace_existing: bool) -> WriteOptions {
        WriteOptions::NewFile { replace_existing }
    }

    /// Sets the creation policy and truncation of `options` to match.
    pub const fn apply(self, options: OpenOptions) -> OpenOptions {
        match self {
            WriteOptions::EditFile { create_if_missing, truncate } => {
                let creation =
                    if create_if_missing { Creation::CreateIfMissing } else { Creation::Never };
                options.creation(creation).truncate(truncate)
            },
            WriteOptions::NewFile { replace_existing: true } => {
                options.creation(Creation::CreateIfMissing).truncate(true)
            },
            WriteOptions::NewFile { replace_existing: false } => {
                options.creation(Creation::CreateExclusive).truncate(false)
            },
        }
    }
}

impl Default for WriteOptions {
    /// Edit the file in place, creating it if it is missing.
    fn default() -> Self {
        WriteOptions::edit_file(true, false)
    }
}
