//! Structure genomes encode candidate RBF network topologies.
//!
//! Each position of a genome stands for one training sample:
//! a bit in the _activation mask_ says whether the sample becomes
//! an RBF center, and the matching value in the _width sequence_
//! proposes that center's window width. The two sequences are
//! varied by independent operators but always stay aligned.

mod config;
mod errors;
pub mod operators;

pub use config::{AlleleRange, CrossoverKind, GeneticConfig};
pub use errors::GenomeError;
pub use operators::Operators;

use std::fmt;
use std::sync::Arc;

/// A paired activation-mask and window-width genome.
#[derive(Clone, Debug)]
pub struct StructureGenome {
    mask: Vec<bool>,
    widths: Vec<f64>,
    config: Arc<GeneticConfig>,
    operators: Operators,
    fitness: f32,
    evaluated: bool,
}

impl StructureGenome {
    /// Creates a new, uninitialized genome using the default
    /// [operators]: all candidates inactive, and all widths at
    /// the lower bound of the configured range.
    ///
    /// [operators]: Operators
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig, StructureGenome};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let config = Arc::new(GeneticConfig {
    ///     length: NonZeroUsize::new(8).unwrap(),
    ///     width_range: AlleleRange::new(0.1, 2.0),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// let genome = StructureGenome::new(config);
    /// assert_eq!(genome.len(), 8);
    /// assert!(genome.mask().iter().all(|bit| !bit));
    /// assert!(genome.widths().iter().all(|w| *w == 0.1));
    /// assert!(!genome.is_evaluated());
    /// ```
    pub fn new(config: Arc<GeneticConfig>) -> StructureGenome {
        StructureGenome::with_operators(config, Operators::default())
    }

    /// Creates a new, uninitialized genome which will be varied
    /// through the passed operators.
    pub fn with_operators(config: Arc<GeneticConfig>, operators: Operators) -> StructureGenome {
        let length = config.length.get();
        StructureGenome {
            mask: vec![false; length],
            widths: vec![config.width_range.lower; length],
            config,
            operators,
            fitness: 0.0,
            evaluated: false,
        }
    }

    /// Creates a new genome with randomized content.
    pub fn random(config: Arc<GeneticConfig>) -> StructureGenome {
        let mut genome = StructureGenome::new(config);
        genome.initialize();
        genome
    }

    /// Creates a genome with the passed content, using the
    /// default operators.
    ///
    /// # Errors
    /// Returns an error if either sequence's length differs from
    /// the configured length, or a width is out of range.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig, StructureGenome};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let config = Arc::new(GeneticConfig {
    ///     length: NonZeroUsize::new(2).unwrap(),
    ///     width_range: AlleleRange::new(0.0, 1.0),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// let genome = StructureGenome::from_parts(config.clone(), vec![true, false], vec![0.5, 0.2]);
    /// assert!(genome.is_ok());
    ///
    /// let genome = StructureGenome::from_parts(config, vec![true], vec![0.5, 0.2]);
    /// assert!(genome.is_err());
    /// ```
    pub fn from_parts(
        config: Arc<GeneticConfig>,
        mask: Vec<bool>,
        widths: Vec<f64>,
    ) -> Result<StructureGenome, GenomeError> {
        Self::check_content(&config, &mask, &widths)?;
        Ok(StructureGenome {
            mask,
            widths,
            config,
            operators: Operators::default(),
            fitness: 0.0,
            evaluated: false,
        })
    }

    fn check_content(
        config: &GeneticConfig,
        mask: &[bool],
        widths: &[f64],
    ) -> Result<(), GenomeError> {
        let expected = config.length.get();
        for found in [mask.len(), widths.len()] {
            if found != expected {
                return Err(GenomeError::LengthMismatch { expected, found });
            }
        }
        match widths
            .iter()
            .position(|w| !config.width_range.contains(*w))
        {
            Some(i) => Err(GenomeError::WidthOutOfRange(i, widths[i])),
            None => Ok(()),
        }
    }

    /// Randomizes the genome through its initializer.
    pub fn initialize(&mut self) {
        (self.operators.initializer)(self)
    }

    /// Mutates the genome through its mutator, returning
    /// the number of elementary changes.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig, StructureGenome};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let config = Arc::new(GeneticConfig {
    ///     length: NonZeroUsize::new(10).unwrap(),
    ///     width_range: AlleleRange::new(0.0, 1.0),
    ///     width_mutation_power: 0.1,
    ///     ..GeneticConfig::zero()
    /// });
    /// let mut genome = StructureGenome::random(config);
    /// genome.set_fitness(1.0);
    ///
    /// // A zero rate never changes anything.
    /// assert_eq!(genome.mutate(0.0), 0);
    /// assert!(genome.is_evaluated());
    ///
    /// // A rate of one changes every bit and every width.
    /// assert_eq!(genome.mutate(1.0), 20);
    /// assert!(!genome.is_evaluated());
    /// ```
    pub fn mutate(&mut self, rate: f32) -> usize {
        (self.operators.mutator)(self, rate)
    }

    /// Returns the similarity to `other` given by the
    /// genome's comparator.
    pub fn compare(&self, other: &StructureGenome) -> f32 {
        (self.operators.comparator)(self, other)
    }

    /// Crosses `mom` and `dad` through `mom`'s crossover operator,
    /// writing into whichever offspring slots are supplied.
    /// Returns the number of offspring written.
    pub fn recombine(
        mom: &StructureGenome,
        dad: &StructureGenome,
        sis: Option<&mut StructureGenome>,
        bro: Option<&mut StructureGenome>,
    ) -> usize {
        (mom.operators.crossover)(mom, dad, sis, bro)
    }

    /// Returns the genome's length, i.e. the number
    /// of candidate hidden units.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Returns whether the genome has no candidates.
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Returns the activation mask.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Returns the proposed window widths.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Returns the genome's configuration.
    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Sets the genome's fitness value, marking
    /// the genome as evaluated.
    ///
    /// # Panics
    /// Panics if the fitness is negative or NaN.
    pub fn set_fitness(&mut self, fitness: f32) {
        assert!(fitness >= 0.0, "fitness function returned a negative value");
        self.fitness = fitness;
        self.evaluated = true;
    }

    /// Returns the genome's last assigned fitness.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns whether the fitness reflects the genome's current content.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Returns the genome's text record: the activation mask as a
    /// line of `0`/`1` digits, followed by a line of
    /// whitespace-separated widths.
    pub fn write_record(&self) -> String {
        let mask: String = self.mask.iter().map(|b| if *b { '1' } else { '0' }).collect();
        let widths: Vec<String> = self.widths.iter().map(|w| w.to_string()).collect();
        format!("{}\n{}\n", mask, widths.join(" "))
    }

    /// Replaces the genome's content with that of a text
    /// record, as written by [`write_record`].
    /// The genome is left untouched on failure.
    ///
    /// # Errors
    /// Returns an error if the record cannot be parsed,
    /// or its content does not fit the genome's configuration.
    ///
    /// [`write_record`]: StructureGenome::write_record
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig, StructureGenome};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let config = Arc::new(GeneticConfig {
    ///     length: NonZeroUsize::new(3).unwrap(),
    ///     width_range: AlleleRange::new(0.0, 1.0),
    ///     ..GeneticConfig::zero()
    /// });
    /// let mut genome = StructureGenome::new(config);
    ///
    /// genome.read_record("101\n0.5 0.25 1\n").unwrap();
    /// assert_eq!(genome.mask(), &[true, false, true]);
    /// assert_eq!(genome.widths(), &[0.5, 0.25, 1.0]);
    /// assert_eq!(genome.write_record(), "101\n0.5 0.25 1\n");
    /// ```
    pub fn read_record(&mut self, record: &str) -> Result<(), GenomeError> {
        let mut lines = record.lines().filter(|l| !l.trim().is_empty());
        let mask = lines
            .next()
            .ok_or_else(|| GenomeError::MalformedRecord("missing activation mask".into()))?
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(GenomeError::MalformedRecord(format!(
                    "unexpected mask digit {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<bool>, GenomeError>>()?;
        let widths = lines
            .flat_map(str::split_whitespace)
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    GenomeError::MalformedRecord(format!("invalid width {:?}", token))
                })
            })
            .collect::<Result<Vec<f64>, GenomeError>>()?;

        Self::check_content(&self.config, &mask, &widths)?;
        self.mask = mask;
        self.widths = widths;
        self.evaluated = false;
        Ok(())
    }
}

impl PartialEq for StructureGenome {
    /// Genomes are equal if their masks and widths are.
    fn eq(&self, other: &StructureGenome) -> bool {
        self.mask == other.mask && self.widths == other.widths
    }
}

impl fmt::Display for StructureGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.write_record())
    }
}

impl evogen::Genome for StructureGenome {
    fn initialize(&mut self) {
        StructureGenome::initialize(self)
    }

    fn mutate(&mut self, rate: f32) -> usize {
        StructureGenome::mutate(self, rate)
    }

    fn compare(&self, other: &Self) -> f32 {
        StructureGenome::compare(self, other)
    }

    fn recombine(mom: &Self, dad: &Self, sis: Option<&mut Self>, bro: Option<&mut Self>) -> usize {
        StructureGenome::recombine(mom, dad, sis, bro)
    }

    fn set_fitness(&mut self, fitness: f32) {
        StructureGenome::set_fitness(self, fitness)
    }

    fn fitness(&self) -> f32 {
        StructureGenome::fitness(self)
    }

    fn is_evaluated(&self) -> bool {
        StructureGenome::is_evaluated(self)
    }
}
