use std::error::Error;
use std::fmt;

/// An error type indicating genome content
/// that violates its configuration.
#[derive(Debug, PartialEq)]
pub enum GenomeError {
    /// A sub-genome's length differs from the configured length.
    LengthMismatch { expected: usize, found: usize },
    /// The width at this position lies outside the configured range.
    WidthOutOfRange(usize, f64),
    /// A genome record could not be parsed.
    MalformedRecord(String),
}

impl fmt::Display for GenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => write!(
                f,
                "sub-genome of length {} where {} was expected",
                found, expected
            ),
            Self::WidthOutOfRange(index, width) => {
                write!(f, "width {} at position {} is out of range", width, index)
            }
            Self::MalformedRecord(reason) => write!(f, "malformed genome record: {}", reason),
        }
    }
}

impl Error for GenomeError {}
