//! A Population is a collection of genomes which
//! can be evolved using a genome evaluation function
//! as the source of selective pressure.
mod config;
mod errors;
pub mod logging;

use crate::Genome;
pub use config::{Objective, PopulationConfig};
pub use errors::EvolutionError;

use rand::prelude::{Rng, SliceRandom};

/// A population of genomes, evolved generation by
/// generation through tournament selection, crossover
/// and mutation.
#[derive(Clone, Debug)]
pub struct Population<G> {
    genomes: Vec<G>,
    generation: usize,
    config: PopulationConfig,
}

impl<G: Genome> Population<G> {
    /// Creates a new population of `config.size` clones of
    /// `prototype`, each of them randomized through
    /// [`Genome::initialize`].
    ///
    /// The prototype carries any genome-specific configuration
    /// (length, operators...), which is effectively opaque to
    /// the population.
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::{GeneticConfig, StructureGenome};
    /// # use std::sync::Arc;
    /// use evogen::{Population, PopulationConfig};
    ///
    /// let config = PopulationConfig {
    ///     size: std::num::NonZeroUsize::new(20).unwrap(),
    ///     ..PopulationConfig::zero()
    /// };
    /// # let prototype = StructureGenome::new(Arc::new(GeneticConfig::zero()));
    ///
    /// // With `prototype` a suitable type implementing `Genome`...
    /// let population = Population::new(config, &prototype);
    /// assert_eq!(population.genomes().count(), 20);
    /// ```
    pub fn new(config: PopulationConfig, prototype: &G) -> Population<G> {
        let genomes = (0..config.size.get())
            .map(|_| {
                let mut genome = prototype.clone();
                genome.initialize();
                genome
            })
            .collect();
        Population {
            genomes,
            generation: 0,
            config,
        }
    }

    /// Creates a new population from the passed genomes, as-is.
    ///
    /// Returns `None` if the number of genomes does not match
    /// the configured population size.
    pub fn new_seeded(config: PopulationConfig, genomes: Vec<G>) -> Option<Population<G>> {
        if genomes.len() != config.size.get() {
            return None;
        }
        Some(Population {
            genomes,
            generation: 0,
            config,
        })
    }

    /// Evaluates the fitness of each genome in the
    /// population whose current content has not been
    /// evaluated yet, using the passed evaluator.
    ///
    /// Genomes copied unchanged from the previous generation
    /// keep their fitness and are not evaluated again.
    ///
    /// # Panics
    /// This function will panic if the evaluator
    /// returns NaN.
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::{GeneticConfig, StructureGenome};
    /// # use std::sync::Arc;
    /// use evogen::{Genome, Population, PopulationConfig};
    ///
    /// # let prototype = StructureGenome::new(Arc::new(GeneticConfig::zero()));
    /// let mut population = Population::new(PopulationConfig::zero(), &prototype);
    ///
    /// population.evaluate_fitness(|g| {
    ///     // Compute genome's fitness...
    ///     # let fitness = 1.0;
    ///     fitness
    /// });
    ///
    /// assert!(population.genomes().all(|g| g.is_evaluated()));
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&mut G) -> f32,
    {
        let mut evaluated = 0;
        for genome in self.genomes.iter_mut().filter(|g| !g.is_evaluated()) {
            let fitness = evaluator(genome);
            assert!(!fitness.is_nan(), "fitness function returned NaN");
            genome.set_fitness(fitness);
            evaluated += 1;
        }
        log::debug!(
            "generation {}: evaluated {} of {} genomes",
            self.generation,
            evaluated,
            self.genomes.len()
        );
    }

    /// Evolves the population into its next generation.
    ///
    /// The [elite] are copied as-is. The remaining slots
    /// are filled with offspring of tournament-selected
    /// parents, crossed with [`crossover_chance`] probability
    /// and mutated with the configured [`mutation_rate`].
    ///
    /// # Errors
    /// Returns an error if any genome has not been
    /// evaluated, or has an invalid fitness.
    ///
    /// [elite]: PopulationConfig::elitism
    /// [`crossover_chance`]: PopulationConfig::crossover_chance
    /// [`mutation_rate`]: PopulationConfig::mutation_rate
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::{GeneticConfig, StructureGenome};
    /// # use std::sync::Arc;
    /// use evogen::{Population, PopulationConfig};
    ///
    /// # let prototype = StructureGenome::new(Arc::new(GeneticConfig::zero()));
    /// let mut population = Population::new(PopulationConfig::zero(), &prototype);
    ///
    /// // Evolving before evaluation fails.
    /// assert!(population.evolve().is_err());
    ///
    /// population.evaluate_fitness(|_| 1.0);
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// assert_eq!(population.generation(), 1);
    /// ```
    pub fn evolve(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.check_evaluated()?;
        self.sort_by_fitness();

        let size = self.config.size.get();
        let elite = self.config.elitism.min(size);
        let mut offspring: Vec<G> = Vec::with_capacity(size);
        offspring.extend_from_slice(&self.genomes[..elite]);

        let mut rng = rand::thread_rng();
        let mut mutations = 0;
        while offspring.len() < size {
            let mom = self.select_parent();
            let dad = self.select_parent();
            let mut sis = mom.clone();
            let mut bro = dad.clone();
            let wanted = (size - offspring.len()).min(2);
            if rng.gen::<f32>() < self.config.crossover_chance {
                if wanted == 2 {
                    G::recombine(mom, dad, Some(&mut sis), Some(&mut bro));
                } else {
                    G::recombine(mom, dad, Some(&mut sis), None);
                }
            }
            mutations += sis.mutate(self.config.mutation_rate);
            offspring.push(sis);
            if wanted == 2 {
                mutations += bro.mutate(self.config.mutation_rate);
                offspring.push(bro);
            }
        }

        log::debug!(
            "generation {}: kept {} elite, {} mutations in offspring",
            self.generation,
            elite,
            mutations
        );
        self.genomes = offspring;
        self.generation += 1;
        Ok(())
    }

    /// Checks every genome has a usable fitness value.
    fn check_evaluated(&self) -> Result<(), EvolutionError> {
        for (i, genome) in self.genomes.iter().enumerate() {
            if !genome.is_evaluated() {
                return Err(EvolutionError::UnevaluatedGenome(i));
            }
            if genome.fitness().is_nan() {
                return Err(EvolutionError::InvalidFitness(i));
            }
        }
        Ok(())
    }

    /// Sorts the genomes from best to worst.
    fn sort_by_fitness(&mut self) {
        let objective = self.config.objective;
        self.genomes
            .sort_by(|g1, g2| objective.rank(g1.fitness(), g2.fitness()));
    }

    /// Returns the best of `tournament_size` randomly
    /// chosen genomes.
    fn select_parent(&self) -> &G {
        let mut rng = rand::thread_rng();
        let objective = self.config.objective;
        (0..self.config.tournament_size.get())
            .map(|_| {
                self.genomes
                    .choose(&mut rng)
                    .expect("empty population has no parents")
            })
            .min_by(|g1, g2| objective.rank(g1.fitness(), g2.fitness()))
            .expect("tournament size is non-zero")
    }

    /// Resets the population to an initial randomized state,
    /// re-initializing every genome in place.
    pub fn reset(&mut self) {
        for genome in &mut self.genomes {
            genome.initialize();
        }
        self.generation = 0;
    }

    /// Returns the currently best-performing genome.
    ///
    /// # Panics
    /// Panics if any fitness is NaN.
    ///
    /// # Examples
    /// ```
    /// # use evogen_rbf::genomics::{GeneticConfig, StructureGenome};
    /// # use std::sync::Arc;
    /// use evogen::{Genome, Population, PopulationConfig};
    ///
    /// # let prototype = StructureGenome::new(Arc::new(GeneticConfig::zero()));
    /// let mut population = Population::new(
    ///     PopulationConfig {
    ///         size: std::num::NonZeroUsize::new(20).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     &prototype,
    /// );
    ///
    /// let mut fitness = 0.0;
    /// population.evaluate_fitness(move |_| {
    ///     fitness += 10.0;
    ///     fitness
    /// });
    ///
    /// // Fitness is minimized by default.
    /// assert_eq!(population.champion().fitness(), 10.0);
    /// ```
    pub fn champion(&self) -> &G {
        let objective = self.config.objective;
        self.genomes
            .iter()
            .min_by(|g1, g2| objective.rank(g1.fitness(), g2.fitness()))
            .expect("empty population has no champion")
    }

    /// Returns the average dissimilarity between all
    /// pairs of genomes, as given by [`Genome::compare`].
    /// 0.0 means every genome is identical.
    pub fn diversity(&self) -> f32 {
        let n = self.genomes.len();
        if n < 2 {
            return 0.0;
        }
        let mut similarity = 0.0;
        for (i, first) in self.genomes.iter().enumerate() {
            for second in &self.genomes[i + 1..] {
                similarity += first.compare(second);
            }
        }
        let pairs = (n * (n - 1) / 2) as f32;
        1.0 - similarity / pairs
    }

    /// Returns an iterator over all current genomes.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.genomes.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    /// Bit-string genome maximizing its count of set bits.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct OneMax {
        pub(crate) bits: Vec<bool>,
        pub(crate) fitness: f32,
        pub(crate) evaluated: bool,
    }

    impl OneMax {
        pub(crate) fn new(len: usize) -> OneMax {
            OneMax {
                bits: vec![false; len],
                fitness: 0.0,
                evaluated: false,
            }
        }

        pub(crate) fn ones(&self) -> f32 {
            self.bits.iter().filter(|b| **b).count() as f32
        }
    }

    impl Genome for OneMax {
        fn initialize(&mut self) {
            let mut rng = rand::thread_rng();
            self.bits.iter_mut().for_each(|b| *b = rng.gen());
            self.evaluated = false;
        }

        fn mutate(&mut self, rate: f32) -> usize {
            let mut rng = rand::thread_rng();
            let mut count = 0;
            for bit in &mut self.bits {
                if rng.gen::<f32>() < rate {
                    *bit = !*bit;
                    count += 1;
                }
            }
            if count > 0 {
                self.evaluated = false;
            }
            count
        }

        fn compare(&self, other: &Self) -> f32 {
            let same = self
                .bits
                .iter()
                .zip(&other.bits)
                .filter(|(a, b)| a == b)
                .count();
            same as f32 / self.bits.len() as f32
        }

        fn recombine(
            mom: &Self,
            dad: &Self,
            sis: Option<&mut Self>,
            bro: Option<&mut Self>,
        ) -> usize {
            let cut = mom.bits.len() / 2;
            let mut n = 0;
            if let Some(sis) = sis {
                sis.bits = mom.bits[..cut].iter().chain(&dad.bits[cut..]).copied().collect();
                sis.evaluated = false;
                n += 1;
            }
            if let Some(bro) = bro {
                bro.bits = dad.bits[..cut].iter().chain(&mom.bits[cut..]).copied().collect();
                bro.evaluated = false;
                n += 1;
            }
            n
        }

        fn set_fitness(&mut self, fitness: f32) {
            self.fitness = fitness;
            self.evaluated = true;
        }

        fn fitness(&self) -> f32 {
            self.fitness
        }

        fn is_evaluated(&self) -> bool {
            self.evaluated
        }
    }

    fn config(size: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            objective: Objective::Maximize,
            elitism: 1,
            tournament_size: NonZeroUsize::new(2).unwrap(),
            crossover_chance: 0.9,
            mutation_rate: 0.05,
        }
    }

    #[test]
    fn new_initializes_every_genome() {
        let population = Population::new(config(10), &OneMax::new(32));
        assert_eq!(population.genomes().count(), 10);
        assert!(population.genomes().all(|g| !g.is_evaluated()));
        assert_eq!(population.generation(), 0);
    }

    #[test]
    fn new_seeded_requires_matching_size() {
        assert!(Population::new_seeded(config(3), vec![OneMax::new(4); 2]).is_none());
        assert!(Population::new_seeded(config(2), vec![OneMax::new(4); 2]).is_some());
    }

    #[test]
    fn evaluate_skips_evaluated_genomes() {
        let mut population = Population::new(config(10), &OneMax::new(8));
        let mut calls = 0;
        population.evaluate_fitness(|g| {
            calls += 1;
            g.ones()
        });
        assert_eq!(calls, 10);
        population.evaluate_fitness(|g| {
            calls += 1;
            g.ones()
        });
        assert_eq!(calls, 10);
    }

    #[test]
    fn evolve_unevaluated() {
        let mut population = Population::new(config(4), &OneMax::new(8));
        let error = population.evolve().unwrap_err();
        assert!(error.to_string().contains("unevaluated"));
        assert_eq!(population.generation(), 0);
    }

    #[test]
    fn evolve_keeps_size_and_elite() {
        for size in 1..8 {
            let mut population = Population::new(config(size), &OneMax::new(16));
            population.evaluate_fitness(|g| g.ones());
            let champion = population.champion().clone();
            population.evolve().unwrap();
            assert_eq!(population.genomes().count(), size);
            assert!(population
                .genomes()
                .any(|g| g.is_evaluated() && g.fitness() == champion.fitness()));
        }
    }

    #[test]
    fn evolution_improves_onemax() {
        let mut population = Population::new(config(30), &OneMax::new(20));
        population.evaluate_fitness(|g| g.ones());
        let initial = population.champion().fitness();
        for _ in 0..60 {
            population.evolve().unwrap();
            population.evaluate_fitness(|g| g.ones());
        }
        assert!(population.champion().fitness() >= initial);
        assert_eq!(population.generation(), 60);
    }

    #[test]
    fn champion_respects_objective() {
        let genomes = (0..4)
            .map(|i| {
                let mut g = OneMax::new(1);
                g.set_fitness(i as f32);
                g
            })
            .collect::<Vec<_>>();
        let mut cfg = config(4);
        let population = Population::new_seeded(cfg.clone(), genomes.clone()).unwrap();
        assert_eq!(population.champion().fitness(), 3.0);
        cfg.objective = Objective::Minimize;
        let population = Population::new_seeded(cfg, genomes).unwrap();
        assert_eq!(population.champion().fitness(), 0.0);
    }

    #[test]
    fn diversity_of_identical_genomes() {
        let population = Population::new_seeded(config(3), vec![OneMax::new(5); 3]).unwrap();
        assert_eq!(population.diversity(), 0.0);
    }

    #[test]
    fn reset_restarts_generations() {
        let mut population = Population::new(config(4), &OneMax::new(8));
        population.evaluate_fitness(|g| g.ones());
        population.evolve().unwrap();
        population.reset();
        assert_eq!(population.generation(), 0);
        assert!(population.genomes().all(|g| !g.is_evaluated()));
    }
}
