use std::borrow::Cow;

use crate::cell::CellTable;
use crate::lattice::Lattice;
use crate::{Frame, Result};

/// The per-atom properties declared in every extended xyz comment that we write.
pub const PROPERTIES: &str = "Properties=species:S:1:pos:R:3";

/// How the comment line of each written frame is produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CommentMode {
    /// Label each frame with its index in the input trajectory, as `Frame: <index>`.
    #[default]
    #[value(alias = "frame")]
    Nothing,
    /// Copy the input comment line unmodified.
    Copy,
    /// Write an extended xyz comment with the lattice from a cell file or `--lattice`.
    Extended,
}

/// A [`CommentMode`] together with the lattice information it needs.
#[derive(Debug, Clone)]
pub enum Comment {
    Frame,
    Copy,
    /// Look up the lattice for each frame by its step.
    Cells(CellTable),
    /// Use the same lattice for every frame.
    Lattice(Lattice),
}

impl Comment {
    /// Decide, once for a whole run, how comments will be written.
    ///
    /// In [`CommentMode::Extended`], a cell table takes precedence over a fixed lattice. Without
    /// either, the input comments are assumed to be extended xyz already and are copied.
    pub fn resolve(mode: CommentMode, cells: Option<CellTable>, lattice: Option<Lattice>) -> Self {
        if mode != CommentMode::Extended {
            if cells.is_some() {
                log::warn!("a cell file is only used in extended mode, ignoring it");
            }
            if lattice.is_some() {
                log::warn!("a lattice is only used in extended mode, ignoring it");
            }
        }

        match mode {
            CommentMode::Nothing => Self::Frame,
            CommentMode::Copy => Self::Copy,
            CommentMode::Extended => match (cells, lattice) {
                (Some(cells), lattice) => {
                    if lattice.is_some() {
                        log::warn!("both a cell file and a lattice were given, ignoring the lattice");
                    }
                    log::debug!("taking lattices for {} steps from the cell file", cells.len());
                    Self::Cells(cells)
                }
                (None, Some(lattice)) => {
                    log::debug!(
                        "using a fixed lattice '{lattice}' with a volume of {}",
                        lattice.volume()
                    );
                    Self::Lattice(lattice)
                }
                (None, None) => {
                    log::debug!("no lattice was given, copying extended xyz comments as they are");
                    Self::Copy
                }
            },
        }
    }

    /// Produce the comment line for `frame`.
    ///
    /// # Errors
    ///
    /// When the lattices come from a cell table, a frame whose step is not in that table results
    /// in an [`Error::Lookup`](crate::Error::Lookup).
    pub fn rewrite<'f>(&self, frame: &'f Frame) -> Result<Cow<'f, [u8]>> {
        let comment = match self {
            Comment::Frame => Cow::Owned(format!("Frame: {}", frame.step).into_bytes()),
            Comment::Copy => Cow::Borrowed(frame.comment.as_slice()),
            Comment::Cells(cells) => {
                let record = cells.lookup(frame.step as u64)?;
                let line = format!(
                    "Lattice=\"{}\" {PROPERTIES} Time={} Step={}",
                    record.lattice, record.time, record.step
                );
                Cow::Owned(line.into_bytes())
            }
            Comment::Lattice(lattice) => {
                let line = format!("Lattice=\"{lattice}\" {PROPERTIES} Step={}", frame.step);
                Cow::Owned(line.into_bytes())
            }
        };
        Ok(comment)
    }
}
