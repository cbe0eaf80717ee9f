#![allow(dead_code)]

pub mod trajectories {
    /// Ten frames of a single water molecule, with CP2K comment lines.
    pub const WATER: &str = "tests/trajectories/water.xyz";
    pub const WATER_NFRAMES: usize = 10;
    /// A cell file with a record for each of the frames in [`WATER`].
    pub const WATER_CELL: &str = "tests/trajectories/water.cell";
    /// A cell file with records for the even frames in [`WATER`] only.
    pub const WATER_EVEN_CELL: &str = "tests/trajectories/water_even.cell";
    /// A cell file of which the second record lacks a lattice component.
    pub const SHORT_ROW_CELL: &str = "tests/trajectories/short_row.cell";
    /// [`WATER`], with the last atom line missing.
    pub const TRUNCATED: &str = "tests/trajectories/truncated.xyz";
    /// [`WATER`], with the atom count of the third frame spelled out.
    pub const BAD_COUNT: &str = "tests/trajectories/bad_count.xyz";
    /// The first two frames of [`WATER`], followed by blank lines.
    pub const TRAILING_BLANK: &str = "tests/trajectories/trailing_blank.xyz";
}

/// Split xyz text into frames of `(natoms line, comment line, atom lines)`.
///
/// This is deliberately naive, and independent of the reader in the crate.
pub fn split_frames(text: &str) -> Vec<(String, String, Vec<String>)> {
    let mut lines = text.lines();
    let mut frames = Vec::new();
    while let Some(natoms) = lines.next() {
        if natoms.trim().is_empty() {
            break;
        }
        let n: usize = natoms.trim().parse().unwrap();
        let comment = lines.next().unwrap().to_string();
        let atoms = (&mut lines).take(n).map(str::to_string).collect();
        frames.push((natoms.trim().to_string(), comment, atoms));
    }
    frames
}

/// Pull the value of the `key="..."` or `key=...` attribute out of an extended xyz comment.
pub fn attribute<'c>(comment: &'c str, key: &str) -> Option<&'c str> {
    let start = comment.find(&format!("{key}="))? + key.len() + 1;
    let rest = &comment[start..];
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next(),
        None => rest.split_whitespace().next(),
    }
}
