use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize};

use std::num::NonZeroUsize;

/// Closed range of values a width allele may take.
///
/// Deserialization rejects non-finite bounds and
/// a lower bound above the upper one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlleleRange {
    pub lower: f64,
    pub upper: f64,
}

impl<'de> Deserialize<'de> for AlleleRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<AlleleRange, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename = "AlleleRange")]
        struct Bounds {
            lower: f64,
            upper: f64,
        }

        let Bounds { lower, upper } = Bounds::deserialize(deserializer)?;
        if !lower.is_finite() || !upper.is_finite() {
            return Err(de::Error::custom(format!(
                "allele range bounds must be finite, found [{}, {}]",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(de::Error::custom(format!(
                "allele range lower bound {} exceeds upper bound {}",
                lower, upper
            )));
        }
        Ok(AlleleRange { lower, upper })
    }
}

impl AlleleRange {
    /// Creates a new range. The bounds are swapped if
    /// given in decreasing order.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::AlleleRange;
    ///
    /// let range = AlleleRange::new(2.0, 0.5);
    /// assert_eq!(range.lower, 0.5);
    /// assert_eq!(range.span(), 1.5);
    /// ```
    pub fn new(lower: f64, upper: f64) -> AlleleRange {
        if lower <= upper {
            AlleleRange { lower, upper }
        } else {
            AlleleRange {
                lower: upper,
                upper: lower,
            }
        }
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Returns a uniformly distributed value in the range.
    pub(crate) fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.span() > 0.0 {
            rng.gen_range(self.lower..=self.upper)
        } else {
            self.lower
        }
    }
}

/// Crossover strategy applied to each sub-genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverKind {
    /// A single cut point; children swap tails.
    OnePoint,
    /// Two cut points; children swap the middle segment.
    TwoPoint,
    /// Every position is swapped with 50% chance.
    Uniform,
}

/// Configuration data for structure genome generation
/// and variation.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of candidate hidden units, which must
    /// match the size of the training set the genome
    /// is evaluated against.
    pub length: NonZeroUsize,
    /// Range of proposed window widths.
    pub width_range: AlleleRange,
    /// Chance that a candidate unit is active
    /// after initialization.
    pub initial_activation_chance: f32,
    /// Standard deviation of the gaussian
    /// perturbation applied to mutated widths.
    pub width_mutation_power: f64,
    /// Crossover strategy used by the default operators.
    pub crossover: CrossoverKind,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. Crossover is one-point.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig};
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     width_range: AlleleRange::new(0.0, 3.0),
    ///     initial_activation_chance: 0.5,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            length: unsafe { NonZeroUsize::new_unchecked(1) },
            width_range: AlleleRange {
                lower: 0.0,
                upper: 0.0,
            },
            initial_activation_chance: 0.0,
            width_mutation_power: 0.0,
            crossover: CrossoverKind::OnePoint,
        }
    }
}
