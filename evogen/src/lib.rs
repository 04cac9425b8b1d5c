//! A small generational genetic algorithm.
//!
//! Genomes are supplied by the user through the [`Genome`] trait,
//! which exposes the four variation primitives the engine needs
//! (initialize, mutate, compare, recombine) along with fitness
//! bookkeeping. A [`Population`] evaluates the genomes it holds with
//! a user-supplied fitness function, then breeds the next generation
//! through tournament selection, elitism, crossover and mutation.
//! Generational statistics can be recorded with the [`logging`] module.
//!
//! An RBF network structure genome is supplied by the `evogen-rbf` crate.
//!
//! # Example usage: evolving RBF network structures with `evogen-rbf`
//! ```
//! use evogen::{Objective, Population, PopulationConfig};
//! use evogen_rbf::genomics::{AlleleRange, CrossoverKind, GeneticConfig, StructureGenome};
//! use evogen_rbf::training::{Trainer, TrainingSet};
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! let samples = TrainingSet::new((0..20).map(|i| {
//!     let x = i as f64 / 4.0;
//!     (vec![x], x.sin())
//! }))
//! .unwrap();
//!
//! let genetic_config = Arc::new(GeneticConfig {
//!     length: NonZeroUsize::new(samples.len()).unwrap(),
//!     width_range: AlleleRange::new(0.0, 2.0),
//!     initial_activation_chance: 0.3,
//!     width_mutation_power: 0.2,
//!     crossover: CrossoverKind::OnePoint,
//! });
//!
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(30).unwrap(),
//!     objective: Objective::Minimize,
//!     elitism: 1,
//!     tournament_size: NonZeroUsize::new(2).unwrap(),
//!     crossover_chance: 0.9,
//!     mutation_rate: 0.05,
//! };
//!
//! let mut trainer = Trainer::new(&samples);
//! let mut population = Population::new(population_config, &StructureGenome::new(genetic_config));
//! for _ in 0..10 {
//!     population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//! population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
//! println!("Best residual: {}", population.champion().fitness());
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
