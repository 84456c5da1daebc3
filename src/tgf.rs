//! Parsing for the Trivial Graph Format (TGF) files this engine's inputs are
//! shipped as: a dimension header line followed by `from to probability`
//! edge lines, 1-indexed. Unlike the format's original parser, malformed
//! input is reported instead of panicking or silently truncating — this is
//! the one place in the crate that deals with text from outside the engine's
//! own control.
use std::fmt;
use std::fs;
use std::path::Path;

use crate::matrix::AdjacencyMatrix;

/// Everything that can go wrong turning TGF text into an
/// [`AdjacencyMatrix`].
#[derive(Debug)]
pub enum TgfError {
    /// Could not read the file at all.
    Io(std::io::Error),
    /// The file was empty — no dimension header line.
    MissingDimension,
    /// The header line wasn't a valid non-negative integer.
    InvalidDimension(String),
    /// An edge line didn't split into `from to probability`.
    MalformedEdgeLine { line_number: usize, line: String },
    /// An edge line's `from`/`to` field wasn't a valid integer.
    InvalidVertexIndex { line_number: usize, field: String },
    /// An edge line's probability field wasn't a valid float.
    InvalidProbability { line_number: usize, field: String },
    /// A probability outside `[0, 1]`, or non-finite.
    ProbabilityOutOfRange { line_number: usize, value: f64 },
    /// A 1-indexed vertex index of `0`, or one beyond the header's
    /// dimension.
    VertexIndexOutOfRange { line_number: usize, index: usize, dimension: usize },
}

impl fmt::Display for TgfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TgfError::Io(err) => write!(f, "failed to read TGF file: {err}"),
            TgfError::MissingDimension => write!(f, "TGF input is empty, expected a dimension header"),
            TgfError::InvalidDimension(field) => {
                write!(f, "TGF header {field:?} is not a valid vertex count")
            }
            TgfError::MalformedEdgeLine { line_number, line } => {
                write!(f, "line {line_number}: expected `from to probability`, got {line:?}")
            }
            TgfError::InvalidVertexIndex { line_number, field } => {
                write!(f, "line {line_number}: {field:?} is not a valid vertex index")
            }
            TgfError::InvalidProbability { line_number, field } => {
                write!(f, "line {line_number}: {field:?} is not a valid probability")
            }
            TgfError::ProbabilityOutOfRange { line_number, value } => {
                write!(f, "line {line_number}: probability {value} is not within [0, 1]")
            }
            TgfError::VertexIndexOutOfRange { line_number, index, dimension } => {
                write!(
                    f,
                    "line {line_number}: vertex index {index} is out of range for a {dimension}-vertex graph"
                )
            }
        }
    }
}

impl std::error::Error for TgfError {}

impl From<std::io::Error> for TgfError {
    fn from(err: std::io::Error) -> Self {
        TgfError::Io(err)
    }
}

/// Reads and parses the TGF file at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<AdjacencyMatrix<f64>, TgfError> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses TGF text already held in memory.
///
/// The header line gives the vertex count; every following non-empty line
/// is `from to probability`, 1-indexed, converted to the 0-indexed scheme
/// [`AdjacencyMatrix`] uses. Each edge is written symmetrically.
pub fn parse_str(content: &str) -> Result<AdjacencyMatrix<f64>, TgfError> {
    let mut lines = content.lines();

    let dimension_line = lines.next().ok_or(TgfError::MissingDimension)?;
    let dimension: usize = dimension_line
        .trim()
        .parse()
        .map_err(|_| TgfError::InvalidDimension(dimension_line.trim().to_string()))?;

    let mut matrix = AdjacencyMatrix::<f64>::new(dimension);

    for (offset, raw_line) in lines.enumerate() {
        let line_number = offset + 2;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (from, to, probability) = match (fields.next(), fields.next(), fields.next()) {
            (Some(from), Some(to), Some(probability)) => (from, to, probability),
            _ => {
                return Err(TgfError::MalformedEdgeLine { line_number, line: line.to_string() });
            }
        };

        let from: usize = from
            .parse()
            .map_err(|_| TgfError::InvalidVertexIndex { line_number, field: from.to_string() })?;
        let to: usize = to
            .parse()
            .map_err(|_| TgfError::InvalidVertexIndex { line_number, field: to.to_string() })?;
        let probability: f64 = probability
            .parse()
            .map_err(|_| TgfError::InvalidProbability { line_number, field: probability.to_string() })?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(TgfError::ProbabilityOutOfRange { line_number, value: probability });
        }
        if from == 0 || from > dimension {
            return Err(TgfError::VertexIndexOutOfRange { line_number, index: from, dimension });
        }
        if to == 0 || to > dimension {
            return Err(TgfError::VertexIndexOutOfRange { line_number, index: to, dimension });
        }

        let (from, to) = (from - 1, to - 1);
        matrix.set_at(probability, from, to);
        matrix.set_at(probability, to, from);
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_four_cycle() {
        let tgf = "4\n1 2 0.9\n2 3 0.9\n3 4 0.9\n4 1 0.9\n";
        let matrix = parse_str(tgf).expect("valid TGF");
        assert_eq!(matrix.dimension(), 4);
        assert_eq!(matrix.at(0, 1), 0.9);
        assert_eq!(matrix.at(1, 2), 0.9);
        assert_eq!(matrix.at(3, 0), 0.9);
        assert!(matrix.is_connected(0, 1));
        assert!(!matrix.is_connected(0, 2));
    }

    #[test]
    fn ignores_blank_lines() {
        let tgf = "2\n\n1 2 0.5\n\n";
        let matrix = parse_str(tgf).expect("valid TGF");
        assert_eq!(matrix.at(0, 1), 0.5);
    }

    #[test]
    fn empty_input_is_missing_dimension() {
        assert!(matches!(parse_str(""), Err(TgfError::MissingDimension)));
    }

    #[test]
    fn non_integer_header_is_rejected() {
        assert!(matches!(parse_str("not-a-number\n"), Err(TgfError::InvalidDimension(_))));
    }

    #[test]
    fn malformed_edge_line_is_rejected() {
        let tgf = "2\n1 2\n";
        assert!(matches!(parse_str(tgf), Err(TgfError::MalformedEdgeLine { line_number: 2, .. })));
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        let tgf = "2\n1 3 0.5\n";
        assert!(matches!(
            parse_str(tgf),
            Err(TgfError::VertexIndexOutOfRange { line_number: 2, index: 3, dimension: 2 })
        ));
    }

    #[test]
    fn zero_vertex_index_is_rejected() {
        let tgf = "2\n0 1 0.5\n";
        assert!(matches!(
            parse_str(tgf),
            Err(TgfError::VertexIndexOutOfRange { line_number: 2, index: 0, dimension: 2 })
        ));
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let tgf = "2\n1 2 1.5\n";
        assert!(matches!(parse_str(tgf), Err(TgfError::ProbabilityOutOfRange { line_number: 2, .. })));
    }

    #[test]
    fn reading_a_missing_file_is_an_io_error() {
        let result = parse_file("/nonexistent/path/does-not-exist.tgf");
        assert!(matches!(result, Err(TgfError::Io(_))));
    }
}
