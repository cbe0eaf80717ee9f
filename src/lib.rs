//! Read xyz trajectories frame by frame, select a subset of the frames, and write them out again
//! with rewritten comment lines.
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;

pub use crate::cell::{CellRecord, CellTable};
pub use crate::comment::{Comment, CommentMode};
pub use crate::error::{Error, Result};
pub use crate::lattice::{Lattice, ParseScalarError, Scalar};
pub use crate::selection::{FrameSelection, Range};
pub use crate::writer::XYZWriter;

pub mod cell;
pub mod comment;
mod error;
pub mod lattice;
pub(crate) mod reader;
pub mod selection;
pub mod writer;

/// A single frame of an xyz trajectory.
///
/// The comment and atom lines are kept as raw bytes, without their line terminators. Nothing about
/// them is interpreted, and they need not be valid UTF-8.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    /// The zero-based index of this frame in the trajectory it was read from.
    pub step: usize,
    pub natoms: usize,
    pub comment: Vec<u8>,
    pub atoms: Vec<Vec<u8>>,
}

impl Frame {
    pub fn atoms(&self) -> impl Iterator<Item = &[u8]> {
        self.atoms.iter().map(Vec::as_slice)
    }

    /// The comment line, with any invalid UTF-8 replaced.
    pub fn comment_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.comment)
    }
}

#[derive(Debug)]
pub struct XYZReader<R> {
    pub file: R,
    /// The index of the next frame.
    step: usize,
    /// The number of lines consumed so far.
    line: usize,
    /// The atom count of the previous frame.
    natoms: Option<usize>,
    scratch: Vec<u8>,
}

impl XYZReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> XYZReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            file: reader,
            step: 0,
            line: 0,
            natoms: None,
            scratch: Vec::new(),
        }
    }

    /// The index of the frame that will be read next.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The number of lines that have been consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// A convenience function to read all frames in a trajectory.
    ///
    /// It is likely more efficient to use [`XYZReader::read_frame`] if you are only interested in
    /// the values of a single frame at a time.
    pub fn read_all_frames(&mut self) -> Result<Box<[Frame]>> {
        let frames = self.frames().collect::<Result<Vec<_>>>()?;
        Ok(frames.into_boxed_slice())
    }

    /// Returns an iterator over the remaining frames.
    ///
    /// The iterator stops after the first error.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// Reads a [`Frame`] into `frame` and advances one step.
    ///
    /// The buffers in `frame` are reused. Returns `false`, leaving `frame` in an unspecified state,
    /// when the trajectory is exhausted exactly where the next frame would begin.
    ///
    /// # Errors
    ///
    /// A frame with an invalid atom count, or a frame that ends before all of its atom lines are
    /// read, is an [`Error::Format`].
    pub fn read_frame(&mut self, frame: &mut Frame) -> Result<bool> {
        // The comment buffer doubles as scratch space for the atom count line.
        let Some(natoms) = self.read_natoms(&mut frame.comment)? else {
            return Ok(false);
        };
        self.read_comment(&mut frame.comment)?;

        frame.atoms.truncate(natoms);
        frame.atoms.resize_with(natoms, Vec::new);
        for (idx, atom) in frame.atoms.iter_mut().enumerate() {
            if !self.next_line(atom)? {
                return Err(self.truncated(natoms, idx));
            }
        }

        frame.step = self.step;
        frame.natoms = natoms;
        self.step += 1;
        Ok(true)
    }

    /// Reads past a frame without storing it, and advances one step.
    ///
    /// The frame is checked in the same way as in [`XYZReader::read_frame`].
    pub fn skip_frame(&mut self) -> Result<bool> {
        let mut scratch = std::mem::take(&mut self.scratch);
        let skipped = self.skip_frame_with_scratch(&mut scratch);
        self.scratch = scratch;
        skipped
    }

    fn skip_frame_with_scratch(&mut self, scratch: &mut Vec<u8>) -> Result<bool> {
        let Some(natoms) = self.read_natoms(scratch)? else {
            return Ok(false);
        };
        self.read_comment(scratch)?;
        for idx in 0..natoms {
            if !self.next_line(scratch)? {
                return Err(self.truncated(natoms, idx));
            }
        }

        self.step += 1;
        Ok(true)
    }

    /// Append [`Frame`]s to the `frames` buffer according to a [`FrameSelection`].
    ///
    /// If successful, it will return the number of frames that were read into `frames`.
    /// This can be useful since the selection itself is not enough to tell how many frames will
    /// actually be read.
    pub fn read_frames(
        &mut self,
        frames: &mut impl Extend<Frame>,
        frame_selection: &FrameSelection,
    ) -> Result<usize> {
        let mut n = 0;
        loop {
            match frame_selection.is_included(self.step) {
                Some(true) => {
                    let mut frame = Frame::default();
                    if !self.read_frame(&mut frame)? {
                        break;
                    }
                    frames.extend(Some(frame));
                    n += 1;
                }
                Some(false) => {
                    if !self.skip_frame()? {
                        break;
                    }
                }
                None => break,
            }
        }

        Ok(n)
    }

    fn next_line(&mut self, buf: &mut Vec<u8>) -> std::io::Result<bool> {
        let more = reader::read_line(&mut self.file, buf)?;
        if more {
            self.line += 1;
        }
        Ok(more)
    }

    /// Read the atom count that starts a frame.
    ///
    /// Returns [`None`] at the end of the trajectory. Blank lines are only accepted if nothing but
    /// blank lines follow them.
    fn read_natoms(&mut self, buf: &mut Vec<u8>) -> Result<Option<usize>> {
        if !self.next_line(buf)? {
            return Ok(None);
        }

        if reader::is_blank(buf) {
            let blank = self.line;
            while self.next_line(buf)? {
                if !reader::is_blank(buf) {
                    return Err(Error::format(
                        blank,
                        format!("expected the atom count of frame {}, found a blank line", self.step),
                    ));
                }
            }
            return Ok(None);
        }

        let natoms = match reader::parse_natoms(buf) {
            Some(0) => {
                return Err(Error::format(
                    self.line,
                    format!("frame {} has an atom count of zero", self.step),
                ))
            }
            Some(natoms) => natoms,
            None => {
                return Err(Error::format(
                    self.line,
                    format!(
                        "expected the atom count of frame {}, found '{}'",
                        self.step,
                        String::from_utf8_lossy(buf).trim()
                    ),
                ))
            }
        };

        if let Some(previous) = self.natoms.replace(natoms) {
            if previous != natoms {
                log::warn!(
                    "frame {} has {natoms} atoms, while the frame before it has {previous}",
                    self.step
                );
            }
        }
        Ok(Some(natoms))
    }

    fn read_comment(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        if !self.next_line(buf)? {
            return Err(Error::format(
                self.line + 1,
                format!("expected the comment line of frame {}, found the end of the file", self.step),
            ));
        }
        Ok(())
    }

    fn truncated(&self, natoms: usize, found: usize) -> Error {
        Error::format(
            self.line + 1,
            format!(
                "expected {natoms} atom lines for frame {}, found the end of the file after {found}",
                self.step
            ),
        )
    }
}

impl<R: BufRead + Seek> XYZReader<R> {
    /// Reset the reader to its initial position.
    ///
    /// Go back to the first frame.
    pub fn home(&mut self) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.step = 0;
        self.line = 0;
        self.natoms = None;
        Ok(())
    }
}

/// An iterator over the [`Frame`]s of an [`XYZReader`], see [`XYZReader::frames`].
pub struct Frames<'r, R> {
    reader: &'r mut XYZReader<R>,
    done: bool,
}

impl<R: BufRead> Iterator for Frames<'_, R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut frame = Frame::default();
        match self.reader.read_frame(&mut frame) {
            Ok(true) => Some(Ok(frame)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// The number of frames that passed through [`filter_frames`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Frames that were read from the input, whether they were selected or not.
    pub read: usize,
    /// Frames that were written to the output.
    pub written: usize,
}

/// Copy the frames included in `frame_selection` from `reader` to `writer`, with their comment
/// lines rewritten according to `comment`.
///
/// Frames are handled one at a time, in the order in which they appear. Reading stops as soon as
/// the selection cannot include any later frames. The writer is flushed before returning.
///
/// # Errors
///
/// The first malformed frame or failed cell lookup aborts the whole run. Whatever was written up
/// to that point stays written.
pub fn filter_frames<R: BufRead, W: Write>(
    reader: &mut XYZReader<R>,
    writer: &mut XYZWriter<W>,
    frame_selection: &FrameSelection,
    comment: &Comment,
) -> Result<Summary> {
    if let Some(until) = frame_selection.until() {
        log::debug!("reading no further than frame {until}");
    }

    let mut summary = Summary::default();
    let mut frame = Frame::default();
    loop {
        let idx = reader.step();
        let more = match frame_selection.is_included(idx) {
            Some(true) => {
                let more = reader.read_frame(&mut frame)?;
                if more {
                    let line = comment.rewrite(&frame)?;
                    writer.write_frame(&frame, &line)?;
                    log::trace!("wrote frame {idx} with {} atoms", frame.natoms);
                    summary.written += 1;
                }
                more
            }
            Some(false) => reader.skip_frame()?,
            None => {
                log::debug!("frame {idx} is past the end of the selection, stopping");
                break;
            }
        };
        if !more {
            break;
        }
        summary.read += 1;
    }

    writer.flush()?;
    Ok(summary)
}
