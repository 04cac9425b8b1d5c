use std::error::Error;
use std::fmt;

/// An error type indicating the population
/// cannot be evolved in its current state.
#[derive(Debug)]
pub enum EvolutionError {
    /// The genome at this position has no fitness
    /// for its current content.
    UnevaluatedGenome(usize),
    /// The genome at this position has a NaN fitness.
    InvalidFitness(usize),
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnevaluatedGenome(index) => write!(
                f,
                "attempted evolution with unevaluated genome at position {}",
                index
            ),
            Self::InvalidFitness(index) => {
                write!(f, "genome at position {} has an invalid fitness", index)
            }
        }
    }
}

impl Error for EvolutionError {}
