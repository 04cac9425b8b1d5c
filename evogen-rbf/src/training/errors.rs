use std::error::Error;
use std::fmt;

/// An error type indicating an invalid training set.
#[derive(Debug, PartialEq)]
pub enum TrainingSetError {
    /// The set holds no samples.
    Empty,
    /// This sample's input dimension differs from the first
    /// sample's, or is zero.
    InconsistentDimension {
        sample: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for TrainingSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "training set is empty"),
            Self::InconsistentDimension {
                sample,
                expected,
                found,
            } => write!(
                f,
                "training sample {} has input dimension {}, expected {}",
                sample, found, expected
            ),
        }
    }
}

impl Error for TrainingSetError {}

/// An error type indicating a genome
/// could not be decoded and fitted.
#[derive(Debug, PartialEq)]
pub enum FitError {
    /// The genome's length differs from the training set's.
    GenomeLength { expected: usize, found: usize },
    /// The genome decodes to fewer than two hidden units.
    DegenerateTopology(usize),
    /// The normal equations could not be solved reliably.
    SingularFit,
    /// An active unit's window width is too close to zero.
    ZeroWidth { unit: usize, width: f64 },
}

impl FitError {
    /// Returns whether the error describes a bad candidate,
    /// rather than a misuse of the trainer.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::GenomeLength { .. })
    }
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenomeLength { expected, found } => write!(
                f,
                "genome of length {} given to a trainer of {} samples",
                found, expected
            ),
            Self::DegenerateTopology(units) => {
                write!(f, "genome decodes to {} hidden units, need at least 2", units)
            }
            Self::SingularFit => write!(f, "normal equations are singular or ill-conditioned"),
            Self::ZeroWidth { unit, width } => {
                write!(f, "candidate {} has unusable window width {}", unit, width)
            }
        }
    }
}

impl Error for FitError {}
