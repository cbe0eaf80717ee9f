use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while extracting frames.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A malformed record in a trajectory or cell file.
    ///
    /// The `line` is one-based and counts lines in the file that was being read.
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    /// A lattice that is not made up of either three or nine numbers.
    #[error("invalid lattice: {0}")]
    Lattice(String),

    /// A frame asked for a step that the cell table does not contain.
    #[error("no cell record for step {step}")]
    Lookup { step: u64 },
}

impl Error {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Returns whether this is a format error, either for a record or for a lattice.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Lattice(_))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }
}
