use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::num::NonZeroUsize;

/// Direction in which fitness values are optimized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Lower fitness values are better.
    Minimize,
    /// Higher fitness values are better.
    Maximize,
}

impl Objective {
    /// Orders two fitness values so that the better one
    /// compares as [`Ordering::Less`].
    ///
    /// # Examples
    /// ```
    /// use evogen::Objective;
    /// use std::cmp::Ordering;
    ///
    /// assert_eq!(Objective::Minimize.rank(1.0, 2.0), Ordering::Less);
    /// assert_eq!(Objective::Maximize.rank(1.0, 2.0), Ordering::Greater);
    /// ```
    pub fn rank(self, first: f32, second: f32) -> Ordering {
        let ordering = first
            .partial_cmp(&second)
            .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"));
        match self {
            Objective::Minimize => ordering,
            Objective::Maximize => ordering.reverse(),
        }
    }

    /// Returns whether `first` is strictly better than `second`.
    pub fn is_better(self, first: f32, second: f32) -> bool {
        self.rank(first, second) == Ordering::Less
    }
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Whether fitness is minimized or maximized.
    pub objective: Objective,
    /// Top n genomes which are copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// Number of genomes competing in each
    /// parent selection tournament.
    pub tournament_size: NonZeroUsize,
    /// Chance that a pair of parents is crossed
    /// instead of being copied into the next generation.
    pub crossover_chance: f32,
    /// Per-element mutation rate passed to [`Genome::mutate`].
    ///
    /// [`Genome::mutate`]: crate::Genome::mutate
    pub mutation_rate: f32,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. The objective is minimization.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evogen::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     mutation_rate: 0.01,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            objective: Objective::Minimize,
            elitism: 0,
            // SAFETY: 1 is a valid NonZeroUsize.
            tournament_size: unsafe { NonZeroUsize::new_unchecked(1) },
            crossover_chance: 0.0,
            mutation_rate: 0.0,
        }
    }
}
