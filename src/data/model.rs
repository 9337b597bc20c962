use std::fmt;

use super::error::CubeError;

/// Index of the first sample line; lines 0..5 are the file header.
pub const FIRST_SAMPLE_LINE: usize = 5;

/// Columns 0..3 hold x, y and wavelength; column 3 is the value.
const COORDINATE_COLUMNS: usize = 3;

// ---------------------------------------------------------------------------
// Axis – names the coordinate columns for error messages and logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    /// Wavelength / luminosity column.
    L,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::L => write!(f, "wavelength"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sample – one data line of the render cube
// ---------------------------------------------------------------------------

/// A single emissivity sample `(x, y, wavelength, value)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub l: f64,
    pub value: f64,
}

/// Raw text of a sample line together with its 0-based line number in the file.
///
/// Fields are parsed on demand: the bounds scan only needs the coordinate
/// columns, so a short line past the compare cutoff never has its value read.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleLine {
    pub number: usize,
    pub text: String,
}

impl SampleLine {
    /// Parse the `(x, y, l)` coordinate columns.
    pub fn coords(&self) -> Result<[f64; 3], CubeError> {
        let mut fields = self.text.split(' ');
        Ok([
            self.field(fields.next(), 0)?,
            self.field(fields.next(), 1)?,
            self.field(fields.next(), 2)?,
        ])
    }

    /// Parse the full sample; columns past the fourth are ignored.
    pub fn sample(&self) -> Result<Sample, CubeError> {
        let mut fields = self.text.split(' ');
        Ok(Sample {
            x: self.field(fields.next(), 0)?,
            y: self.field(fields.next(), 1)?,
            l: self.field(fields.next(), 2)?,
            value: self.field(fields.next(), 3)?,
        })
    }

    // Tokens come from a single-space split, so "1  2" yields an empty token
    // that fails here. Surrounding whitespace on a token (tab, '\r') is fine.
    // Coordinates must be finite: `inf`/`nan` parse as f64 but cannot be binned.
    fn field(&self, token: Option<&str>, column: usize) -> Result<f64, CubeError> {
        let token = token.ok_or(CubeError::MissingField {
            line: self.number + 1,
            column,
        })?;
        let v = token.trim().parse::<f64>().map_err(|_| CubeError::BadField {
            line: self.number + 1,
            column,
            token: token.to_string(),
        })?;
        if column < COORDINATE_COLUMNS && !v.is_finite() {
            return Err(CubeError::NonFinite {
                line: self.number + 1,
                column,
                token: token.to_string(),
            });
        }
        Ok(v)
    }
}

// ---------------------------------------------------------------------------
// RenderCube – the complete parsed file
// ---------------------------------------------------------------------------

/// A loaded render cube: the declared sample count plus the raw sample lines.
#[derive(Debug, Clone)]
pub struct RenderCube {
    /// Sample count from header line 1. Reported only, never trusted.
    pub declared_count: i64,
    /// Every line from index 5 onwards, in file order.
    pub lines: Vec<SampleLine>,
}

impl RenderCube {
    /// Number of sample lines actually present.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the file held no sample lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> SampleLine {
        SampleLine {
            number: 7,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_sample_ignores_extra_columns() {
        let s = line("1.5 -2 600.25 3e-4 99 100").sample().unwrap();
        assert_eq!(
            s,
            Sample {
                x: 1.5,
                y: -2.0,
                l: 600.25,
                value: 3e-4
            }
        );
    }

    #[test]
    fn test_trailing_carriage_return_is_tolerated() {
        let s = line("1 2 3 4\r").sample().unwrap();
        assert_eq!(s.value, 4.0);
    }

    #[test]
    fn test_double_space_produces_empty_token() {
        let err = line("1  2 3 4").sample().unwrap_err();
        match err {
            CubeError::BadField { line, column, token } => {
                assert_eq!(line, 8);
                assert_eq!(column, 1);
                assert_eq!(token, "");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tab_separated_line_is_rejected() {
        assert!(matches!(
            line("1\t2\t3\t4").coords(),
            Err(CubeError::BadField { column: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        for token in ["inf", "-inf", "nan", "NaN"] {
            let err = line(&format!("{token} 5 1 1.0")).coords().unwrap_err();
            assert!(
                matches!(err, CubeError::NonFinite { line: 8, column: 0, .. }),
                "{token}: {err}"
            );
        }
        assert!(matches!(
            line("0 5 inf 1.0").sample(),
            Err(CubeError::NonFinite { column: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_value_is_kept() {
        assert!(line("0 5 1 nan").sample().unwrap().value.is_nan());
    }

    #[test]
    fn test_coords_do_not_need_value_column() {
        let l = line("1 2 3");
        assert_eq!(l.coords().unwrap(), [1.0, 2.0, 3.0]);
        assert!(matches!(
            l.sample(),
            Err(CubeError::MissingField { column: 3, .. })
        ));
    }
}
