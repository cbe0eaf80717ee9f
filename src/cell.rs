//! Cell trajectories, as written by CP2K.
//!
//! A cell file starts with a header line, followed by one row per recorded step:
//!
//! ```text
//! #   Step   Time [fs]       Ax [Angstrom]       Ay [Angstrom] ...      Cz [Angstrom]   Volume [Angstrom^3]
//!        0       0.000       12.4200000000        0.0000000000 ...      12.4200000000         1915.864488
//! ```
//!
//! Only the first eleven columns (step, time and the nine lattice components) are used. Anything
//! after that, such as the volume, is ignored.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::lattice::{Lattice, Scalar};
use crate::{Error, Result};

/// The number of fields a row needs to have, at least.
pub const NFIELDS: usize = 2 + Lattice::NCOMPONENTS;

/// The cell of a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub step: u64,
    pub time: Scalar,
    pub lattice: Lattice,
}

/// All [`CellRecord`]s in a cell file, keyed by their step.
#[derive(Debug, Default, Clone)]
pub struct CellTable {
    records: BTreeMap<u64, CellRecord>,
}

impl CellTable {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a cell table from a reader, discarding the first line as a header.
    ///
    /// When a step appears more than once, the last record for that step is kept.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = BTreeMap::new();
        // Enumerate before skipping the header, such that line numbers line up with the file.
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let lineno = idx + 1;
            let record = parse_record(&line, lineno)?;
            if let Some(earlier) = records.insert(record.step, record) {
                log::debug!(
                    "cell record for step {} on line {lineno} replaces an earlier record",
                    earlier.step
                );
            }
        }

        log::debug!("loaded {} cell records", records.len());
        Ok(Self { records })
    }

    pub fn get(&self, step: u64) -> Option<&CellRecord> {
        self.records.get(&step)
    }

    /// Like [`CellTable::get`], but a missing step is an [`Error::Lookup`].
    pub fn lookup(&self, step: u64) -> Result<&CellRecord> {
        self.get(step).ok_or(Error::Lookup { step })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The steps in this table, in ascending order.
    pub fn steps(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.keys().copied()
    }
}

impl FromIterator<CellRecord> for CellTable {
    fn from_iter<T: IntoIterator<Item = CellRecord>>(iter: T) -> Self {
        let records = iter.into_iter().map(|record| (record.step, record)).collect();
        Self { records }
    }
}

fn parse_record(line: &str, lineno: usize) -> Result<CellRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < NFIELDS {
        return Err(Error::format(
            lineno,
            format!(
                "expected at least {NFIELDS} fields (step, time and nine lattice components), found {}",
                fields.len()
            ),
        ));
    }

    let step = fields[0].parse().map_err(|err| {
        Error::format(lineno, format!("invalid step '{}' ({err})", fields[0]))
    })?;
    let time = parse_scalar(fields[1], "time", lineno)?;
    let components = fields[2..NFIELDS]
        .iter()
        .map(|field| parse_scalar(field, "lattice component", lineno))
        .collect::<Result<Vec<_>>>()?;
    let components: [Scalar; 9] = match components.try_into() {
        Ok(components) => components,
        Err(_) => unreachable!(), // We just checked for that!
    };

    Ok(CellRecord {
        step,
        time,
        lattice: Lattice::from_components(components),
    })
}

fn parse_scalar(field: &str, what: &str, lineno: usize) -> Result<Scalar> {
    field
        .parse()
        .map_err(|err| Error::format(lineno, format!("invalid {what} '{field}' ({err})")))
}
