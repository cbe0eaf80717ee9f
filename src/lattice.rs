use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use glam::DMat3;

use crate::Error;

/// A number that remembers how it was written.
///
/// Formatting a [`Scalar`] reproduces its source text, such that values read from a cell file or
/// the command line are written out with their original precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    text: String,
    value: f64,
}

impl Scalar {
    pub fn zero() -> Self {
        Self {
            text: "0".to_string(),
            value: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Why a [`Scalar`] could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseScalarError {
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    #[error("not a finite number")]
    NotFinite,
}

/// Parse a finite number. `nan`, `inf` and friends are rejected.
impl FromStr for Scalar {
    type Err = ParseScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.parse()?;
        if !value.is_finite() {
            return Err(ParseScalarError::NotFinite);
        }
        Ok(Self {
            text: s.to_string(),
            value,
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A 3x3 matrix of cell vectors.
///
/// The components are stored row-major, in the order `xx xy xz yx yy yz zx zy zz`, where each row
/// is one of the cell vectors. This is also the order in which they appear in cell files and in
/// the extended xyz `Lattice="..."` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    components: [Scalar; 9],
}

impl Lattice {
    pub const NCOMPONENTS: usize = 9;

    pub fn from_components(components: [Scalar; 9]) -> Self {
        Self { components }
    }

    /// Create a rectangular box with side lengths `a`, `b`, and `c`.
    ///
    /// The off-diagonal components are written as a literal `0`.
    pub fn orthorhombic([a, b, c]: [Scalar; 3]) -> Self {
        let z = Scalar::zero;
        Self {
            components: [a, z(), z(), z(), b, z(), z(), z(), c],
        }
    }

    /// The numeric matrix, with the cell vectors as its columns.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_cols_array(&self.components.clone().map(|c| c.value))
    }

    pub fn volume(&self) -> f64 {
        self.matrix().determinant().abs()
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, component) in self.components.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// Parse a lattice from either three (`a b c`) or nine whitespace-separated values.
impl FromStr for Lattice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 3 && tokens.len() != Self::NCOMPONENTS {
            return Err(Error::Lattice(format!(
                "expected 3 or 9 values, found {} in '{s}'",
                tokens.len()
            )));
        }

        let scalars = tokens
            .iter()
            .map(|token| {
                token.parse::<Scalar>().map_err(|err| {
                    Error::Lattice(format!("'{token}' is not a valid component ({err})"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let lattice = match <[Scalar; 9]>::try_from(scalars) {
            Ok(components) => Self::from_components(components),
            Err(scalars) => match <[Scalar; 3]>::try_from(scalars) {
                Ok(sides) => Self::orthorhombic(sides),
                Err(_) => unreachable!(), // We just checked for that!
            },
        };
        Ok(lattice)
    }
}
