use super::Population;

use crate::genome::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    pub fitness: Stats,
    pub diversity: f32,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tfitness: {:?}\n\
            \tdiversity: {:?}\n\
            }}",
            &self.generation_number, &self.fitness, &self.diversity,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields NaN for every field.
    ///
    /// # Examples
    /// ```
    /// use evogen::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f32::NAN,
                minimum: f32::NAN,
                mean: f32::NAN,
                median: f32::NAN,
            };
        }
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f32;
        data.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Every genome in the population.
    Genomes(Vec<G>),
    /// Only the population champion.
    PopulationChampion(G),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::StructureGenome as G;
    /// use evogen::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of an evaluated population,
    /// and reports a one-line summary through the
    /// `log` facade at info level.
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::{GeneticConfig, StructureGenome as G};
    /// # use std::sync::Arc;
    /// use evogen::{Population, PopulationConfig};
    /// use evogen::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut logger = EvolutionLogger::<G>::new(ReportingLevel::PopulationChampion);
    /// # let prototype = G::new(Arc::new(GeneticConfig::zero()));
    /// let mut population = Population::new(PopulationConfig::zero(), &prototype);
    ///
    /// // Evaluate the population...
    /// population.evaluate_fitness(|_| 0.5);
    /// // Then log a snapshot.
    /// logger.log(&population);
    ///
    /// assert_eq!(logger.iter().count(), 1);
    /// ```
    pub fn log(&mut self, population: &Population<G>) {
        let fitness = Stats::from(population.genomes().map(|g| g.fitness()));
        let diversity = population.diversity();
        log::info!(
            "generation {}: best {} mean {} median {} diversity {}",
            population.generation(),
            population.champion().fitness(),
            fitness.mean,
            fitness.median,
            diversity
        );
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => {
                    GenerationMemberRecord::Genomes(population.genomes().cloned().collect())
                }
                ReportingLevel::PopulationChampion => {
                    GenerationMemberRecord::PopulationChampion(population.champion().clone())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            fitness,
            diversity,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot, if any.
    pub fn last(&self) -> Option<&Log<G>> {
        self.logs.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::tests::OneMax;
    use crate::PopulationConfig;

    #[test]
    fn stats_even_length() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
        assert_eq!(stats.maximum, 4.0);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn stats_empty() {
        let stats = Stats::from(std::iter::empty());
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn log_reporting_levels() {
        let config = PopulationConfig {
            size: std::num::NonZeroUsize::new(5).unwrap(),
            ..PopulationConfig::zero()
        };
        let mut population = Population::new(config, &OneMax::new(6));
        population.evaluate_fitness(|g| g.ones());

        let mut all = EvolutionLogger::new(ReportingLevel::AllGenomes);
        all.log(&population);
        match &all.last().unwrap().generation_sample {
            GenerationMemberRecord::Genomes(genomes) => assert_eq!(genomes.len(), 5),
            other => panic!("unexpected record {:?}", other),
        }

        let mut none = EvolutionLogger::new(ReportingLevel::NoGenomes);
        none.log(&population);
        assert!(matches!(
            none.last().unwrap().generation_sample,
            GenerationMemberRecord::None
        ));
        assert_eq!(none.last().unwrap().generation_number, 0);
    }
}
