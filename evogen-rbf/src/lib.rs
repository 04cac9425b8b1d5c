//! # evogen-rbf
//! Evolutionary structure search for radial basis function networks,
//! implementing the [`evogen`] crate's `Genome` trait.
//!
//! Provides a [`StructureGenome`] type usable in `evogen` `Population`s,
//! which selects, among the samples of a [`TrainingSet`], the centers
//! of an [`RbfNetwork`] along with their window widths. A [`Trainer`]
//! decodes such genomes, fits the network's output weights in closed
//! form, and scores them by their residual error.
//! Trained networks can be saved and loaded as plain text records.
//!
//! [`StructureGenome`]: crate::genomics::StructureGenome
//! [`TrainingSet`]: crate::training::TrainingSet
//! [`RbfNetwork`]: crate::networks::RbfNetwork
//! [`Trainer`]: crate::training::Trainer
//!
//! # Example usage: approximating a parabola
//! ```
//! use evogen::{Objective, Population, PopulationConfig};
//! use evogen_rbf::{
//!     genomics::{AlleleRange, CrossoverKind, GeneticConfig, StructureGenome},
//!     networks::RbfNetwork,
//!     training::{Trainer, TrainingSet, SENTINEL_FITNESS},
//! };
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! let samples = TrainingSet::new((-10..=10).map(|i| {
//!     let x = i as f64 / 10.0;
//!     (vec![x], x * x)
//! }))
//! .unwrap();
//!
//! let genetic_config = Arc::new(GeneticConfig {
//!     length: NonZeroUsize::new(samples.len()).unwrap(),
//!     width_range: AlleleRange::new(0.05, 1.5),
//!     initial_activation_chance: 0.25,
//!     width_mutation_power: 0.1,
//!     crossover: CrossoverKind::TwoPoint,
//! });
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(40).unwrap(),
//!     objective: Objective::Minimize,
//!     elitism: 2,
//!     tournament_size: NonZeroUsize::new(3).unwrap(),
//!     crossover_chance: 0.8,
//!     mutation_rate: 0.05,
//! };
//!
//! let mut trainer = Trainer::new(&samples);
//! let mut population = Population::new(population_config, &StructureGenome::new(genetic_config));
//! for _ in 0..20 {
//!     population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
//!     population.evolve().unwrap();
//! }
//! population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
//!
//! let champion = population.champion();
//! if champion.fitness() < SENTINEL_FITNESS {
//!     // Refit the champion, then save its network.
//!     trainer.fit(champion).unwrap();
//!     let mut record = vec![];
//!     trainer.network().save(&mut record).unwrap();
//!     let network = RbfNetwork::load(record.as_slice()).unwrap();
//!     assert_eq!(&network, trainer.network());
//! }
//! ```

pub mod genomics;
pub mod networks;
pub mod training;
