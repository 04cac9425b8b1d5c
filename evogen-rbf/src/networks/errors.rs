use std::error::Error;
use std::fmt;

/// An error type indicating invalid use
/// or construction of an RBF network.
#[derive(Debug, PartialEq)]
pub enum NetworkError {
    /// An input or center has the wrong number of components.
    InvalidDimension { expected: usize, found: usize },
    /// The window width of this hidden unit is zero,
    /// too close to zero, or not finite.
    ZeroWidth { unit: usize, width: f64 },
    /// The number of centers, windows and weights differ.
    InconsistentTopology {
        centers: usize,
        windows: usize,
        weights: usize,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { expected, found } => write!(
                f,
                "input of dimension {} given to a network of input dimension {}",
                found, expected
            ),
            Self::ZeroWidth { unit, width } => {
                write!(f, "hidden unit {} has invalid window width {}", unit, width)
            }
            Self::InconsistentTopology {
                centers,
                windows,
                weights,
            } => write!(
                f,
                "inconsistent topology with {} centers, {} windows and {} weights",
                centers, windows, weights
            ),
        }
    }
}

impl Error for NetworkError {}
