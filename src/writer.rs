use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::Frame;

/// Writes [`Frame`]s in the xyz format.
///
/// Atom lines are written exactly as they were read, so the column widths and precision of the
/// coordinates survive.
#[derive(Debug)]
pub struct XYZWriter<W: Write> {
    pub file: W,
}

impl XYZWriter<BufWriter<File>> {
    /// Create a new file at `path`, truncating it if it already exists.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> XYZWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { file: writer }
    }

    /// Write the atom count, the provided `comment`, and the atom lines of `frame`.
    pub fn write_frame(&mut self, frame: &Frame, comment: &[u8]) -> io::Result<()> {
        writeln!(self.file, "{}", frame.natoms)?;
        self.file.write_all(comment)?;
        self.file.write_all(b"\n")?;
        for atom in &frame.atoms {
            self.file.write_all(atom)?;
            self.file.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.file.flush()?;
        Ok(self.file)
    }
}
