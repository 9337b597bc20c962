use std::path::PathBuf;

use super::model::Axis;

/// Everything that can go wrong between reading a render cube and binning it.
#[derive(Debug, thiserror::Error)]
pub enum CubeError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file has no sample-count header on line 1")]
    MissingHeader,
    #[error("line 1: sample count '{value}' is not an integer")]
    BadCount { value: String },
    #[error("line {line}: missing field {column}")]
    MissingField { line: usize, column: usize },
    #[error("line {line}, field {column}: '{token}' is not a number")]
    BadField {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line}, field {column}: coordinate '{token}' is not finite")]
    NonFinite {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("cube contains no sample lines")]
    NoSamples,
    #[error("degenerate {axis} range: every sample shares {axis} = {value}")]
    DegenerateAxis { axis: Axis, value: f64 },
}
