//! Decoding, fitting and scoring of structure genomes.
//!
//! A [`Trainer`] turns a [`StructureGenome`] into an [`RbfNetwork`]:
//! every training sample whose mask bit is set and whose proposed
//! width exceeds the trainer's pruning threshold becomes a hidden
//! unit centered on that sample's input. The output weights are then
//! fitted by ordinary least squares through the normal equations, and
//! the genome is scored by the network's root-mean-square residual
//! over the training set.
mod errors;

pub use errors::{FitError, TrainingSetError};

use crate::genomics::StructureGenome;
use crate::networks::{RbfNetwork, MIN_WINDOW};

use nalgebra::{DMatrix, DVector};

use std::num::NonZeroUsize;

/// Fitness given to genomes which cannot be fitted.
/// Worse than any real residual.
pub const SENTINEL_FITNESS: f32 = f32::MAX;
/// Widths at or below this value are pruned during decoding
/// by [`Trainer::new`].
pub const DEFAULT_WIDTH_THRESHOLD: f64 = 0.01;
/// Largest relative residual of the solved normal equations
/// for a fit to be accepted.
pub const SOLVE_TOLERANCE: f64 = 1e-6;

/// An ordered, non-empty set of `(input, target)` samples
/// sharing the same input dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingSet {
    inputs: Vec<DVector<f64>>,
    targets: DVector<f64>,
    input_size: NonZeroUsize,
}

impl TrainingSet {
    /// Collects a training set from `(input, target)` pairs.
    ///
    /// # Errors
    /// Returns an error if there are no samples, or the inputs
    /// are empty or differ in dimension.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::training::{TrainingSet, TrainingSetError};
    ///
    /// let samples = TrainingSet::new(vec![(vec![0.0, 1.0], 1.0), (vec![1.0, 0.0], -1.0)]).unwrap();
    /// assert_eq!(samples.len(), 2);
    /// assert_eq!(samples.input_size(), 2);
    ///
    /// assert_eq!(TrainingSet::new(vec![]), Err(TrainingSetError::Empty));
    /// assert!(TrainingSet::new(vec![(vec![0.0, 1.0], 1.0), (vec![1.0], -1.0)]).is_err());
    /// ```
    pub fn new<I>(samples: I) -> Result<TrainingSet, TrainingSetError>
    where
        I: IntoIterator<Item = (Vec<f64>, f64)>,
    {
        let mut inputs: Vec<DVector<f64>> = vec![];
        let mut targets = vec![];
        for (sample, (input, target)) in samples.into_iter().enumerate() {
            let expected = inputs.first().map_or(input.len(), |first| first.len());
            if input.is_empty() || input.len() != expected {
                return Err(TrainingSetError::InconsistentDimension {
                    sample,
                    expected: expected.max(1),
                    found: input.len(),
                });
            }
            inputs.push(DVector::from_vec(input));
            targets.push(target);
        }

        let input_size = inputs
            .first()
            .and_then(|input| NonZeroUsize::new(input.len()))
            .ok_or(TrainingSetError::Empty)?;
        Ok(TrainingSet {
            inputs,
            targets: DVector::from_vec(targets),
            input_size,
        })
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Always `false`: training sets hold at least one sample.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Returns the dimension of every sample's input.
    pub fn input_size(&self) -> usize {
        self.input_size.get()
    }

    /// Returns the samples' inputs.
    pub fn inputs(&self) -> &[DVector<f64>] {
        &self.inputs
    }

    /// Returns the samples' targets.
    pub fn targets(&self) -> &DVector<f64> {
        &self.targets
    }
}

/// Decodes, fits and scores structure genomes against
/// a borrowed training set, keeping the network of the
/// last successful fit.
#[derive(Clone, Debug)]
pub struct Trainer<'a> {
    samples: &'a TrainingSet,
    network: RbfNetwork,
    width_threshold: f64,
}

impl<'a> Trainer<'a> {
    /// Creates a trainer over `samples`, pruning candidate
    /// widths at or below [`DEFAULT_WIDTH_THRESHOLD`].
    pub fn new(samples: &'a TrainingSet) -> Trainer<'a> {
        Trainer::with_width_threshold(samples, DEFAULT_WIDTH_THRESHOLD)
    }

    /// Creates a trainer over `samples`, pruning candidate
    /// widths at or below `width_threshold`.
    pub fn with_width_threshold(samples: &'a TrainingSet, width_threshold: f64) -> Trainer<'a> {
        Trainer {
            samples,
            network: RbfNetwork::new(samples.input_size),
            width_threshold,
        }
    }

    /// Returns the training set.
    pub fn samples(&self) -> &'a TrainingSet {
        self.samples
    }

    /// Returns the pruning threshold.
    pub fn width_threshold(&self) -> f64 {
        self.width_threshold
    }

    /// Returns the network of the last successful fit,
    /// or an empty network if there was none.
    pub fn network(&self) -> &RbfNetwork {
        &self.network
    }

    /// Consumes the trainer, returning its network.
    pub fn into_network(self) -> RbfNetwork {
        self.network
    }

    /// Returns, in order, the indices of the candidates of
    /// `genome` which decode to hidden units: those whose
    /// mask bit is set and whose width exceeds the
    /// pruning threshold.
    pub fn active_units(&self, genome: &StructureGenome) -> Vec<usize> {
        genome
            .mask()
            .iter()
            .zip(genome.widths())
            .enumerate()
            .filter(|(_, (active, width))| **active && **width > self.width_threshold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Decodes `genome` into a topology, fits the output weights
    /// by least squares and returns the resulting root-mean-square
    /// residual over the training set.
    ///
    /// The trainer's network is replaced only if the fit succeeds.
    ///
    /// # Errors
    /// Returns an error if the genome's length differs from the
    /// training set's, the genome decodes to fewer than two units,
    /// an active width is unusable, or the normal equations cannot
    /// be solved reliably.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::genomics::{AlleleRange, GeneticConfig, StructureGenome};
    /// use evogen_rbf::training::{Trainer, TrainingSet};
    /// use std::num::NonZeroUsize;
    /// use std::sync::Arc;
    ///
    /// let samples = TrainingSet::new(vec![(vec![0.0], 0.0), (vec![1.0], 1.0)]).unwrap();
    /// let config = Arc::new(GeneticConfig {
    ///     length: NonZeroUsize::new(2).unwrap(),
    ///     width_range: AlleleRange::new(0.0, 1.0),
    ///     ..GeneticConfig::zero()
    /// });
    /// let genome = StructureGenome::from_parts(config, vec![true, true], vec![0.5, 0.5]).unwrap();
    ///
    /// let mut trainer = Trainer::new(&samples);
    /// let residual = trainer.fit(&genome).unwrap();
    /// assert!(residual < 1e-9);
    /// assert!(trainer.network().evaluate_scalar(0.0).unwrap().abs() < 1e-9);
    /// assert!((trainer.network().evaluate_scalar(1.0).unwrap() - 1.0).abs() < 1e-9);
    /// ```
    pub fn fit(&mut self, genome: &StructureGenome) -> Result<f64, FitError> {
        if genome.len() != self.samples.len() {
            return Err(FitError::GenomeLength {
                expected: self.samples.len(),
                found: genome.len(),
            });
        }

        let units = self.active_units(genome);
        if units.len() < 2 {
            return Err(FitError::DegenerateTopology(units.len()));
        }
        let widths = genome.widths();
        if let Some(&unit) = units
            .iter()
            .find(|&&i| !widths[i].is_finite() || widths[i] <= MIN_WINDOW)
        {
            return Err(FitError::ZeroWidth {
                unit,
                width: widths[unit],
            });
        }

        let inputs = self.samples.inputs();
        let centers: Vec<DVector<f64>> = units.iter().map(|&i| inputs[i].clone()).collect();
        let windows = DVector::from_iterator(units.len(), units.iter().map(|&i| widths[i]));
        let design = DMatrix::from_fn(inputs.len(), units.len(), |r, j| {
            RbfNetwork::activation(inputs[r].as_slice(), centers[j].as_slice(), windows[j])
        });

        let targets = self.samples.targets();
        let weights = solve_normal_equations(&design, targets).ok_or(FitError::SingularFit)?;
        let residual = (&design * &weights - targets).norm() / (inputs.len() as f64).sqrt();

        self.network
            .rebuild(centers, windows, weights)
            .unwrap_or_else(|e| unreachable!("decoded an invalid topology: {}", e));
        Ok(residual)
    }

    /// Fits `genome` and assigns it its residual as fitness,
    /// which is also returned. Genomes which cannot be fitted
    /// get [`SENTINEL_FITNESS`].
    ///
    /// # Panics
    /// Panics if the genome's length differs from the training set's.
    pub fn evaluate_fitness(&mut self, genome: &mut StructureGenome) -> f32 {
        let fitness = match self.fit(genome) {
            Ok(residual) => (residual as f32).min(SENTINEL_FITNESS),
            Err(e @ FitError::DegenerateTopology(_)) => {
                log::trace!("rejected candidate: {}", e);
                SENTINEL_FITNESS
            }
            Err(e) if e.is_recoverable() => {
                log::debug!("rejected candidate: {}", e);
                SENTINEL_FITNESS
            }
            Err(e) => panic!("{}", e),
        };
        genome.set_fitness(fitness);
        fitness
    }

    /// Returns the root-mean-square residual of the
    /// current network over the training set.
    pub fn residual(&self) -> f64 {
        let squares: f64 = self
            .samples
            .inputs()
            .iter()
            .zip(self.samples.targets().iter())
            .map(|(input, target)| {
                let output = self
                    .network
                    .evaluate(input.as_slice())
                    .expect("training inputs match the network's input size");
                (output - target).powi(2)
            })
            .sum();
        (squares / self.samples.len() as f64).sqrt()
    }
}

/// Solves `AᵀA w = Aᵀy` for `w`, returning `None` if `AᵀA`
/// cannot be inverted or the solution is not accurate enough.
fn solve_normal_equations(design: &DMatrix<f64>, targets: &DVector<f64>) -> Option<DVector<f64>> {
    let gram = design.tr_mul(design);
    let moments = design.tr_mul(targets);
    let weights = gram.clone().try_inverse()? * &moments;
    if !weights.iter().all(|w| w.is_finite()) {
        return None;
    }

    let error = (&gram * &weights - &moments).norm();
    let scale = gram.norm() * weights.norm() + moments.norm();
    if error <= SOLVE_TOLERANCE * scale {
        Some(weights)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{AlleleRange, GeneticConfig};
    use evogen::{Objective, Population, PopulationConfig};
    use nalgebra::dvector;
    use std::sync::Arc;

    fn config(length: usize) -> Arc<GeneticConfig> {
        Arc::new(GeneticConfig {
            length: NonZeroUsize::new(length).unwrap(),
            width_range: AlleleRange::new(0.0, 1.0),
            initial_activation_chance: 0.5,
            width_mutation_power: 0.1,
            ..GeneticConfig::zero()
        })
    }

    fn genome(mask: Vec<bool>, widths: Vec<f64>) -> StructureGenome {
        StructureGenome::from_parts(config(mask.len()), mask, widths).unwrap()
    }

    fn line(n: usize) -> TrainingSet {
        TrainingSet::new((0..n).map(|i| (vec![i as f64], (i as f64 * 0.7).sin()))).unwrap()
    }

    #[test]
    fn training_set_errors() {
        assert_eq!(
            TrainingSet::new(std::iter::empty()),
            Err(TrainingSetError::Empty)
        );
        assert_eq!(
            TrainingSet::new(vec![(vec![], 1.0)]),
            Err(TrainingSetError::InconsistentDimension {
                sample: 0,
                expected: 1,
                found: 0
            })
        );
        assert_eq!(
            TrainingSet::new(vec![(vec![1.0, 2.0], 1.0), (vec![3.0], 2.0)]),
            Err(TrainingSetError::InconsistentDimension {
                sample: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn training_set_accessors() {
        let samples = line(4);
        assert_eq!(samples.len(), 4);
        assert!(!samples.is_empty());
        assert_eq!(samples.input_size(), 1);
        assert_eq!(samples.inputs()[3], dvector![3.0]);
        assert_eq!(samples.targets()[3], (3.0 * 0.7f64).sin());
    }

    #[test]
    fn two_sample_interpolation() {
        let samples = TrainingSet::new(vec![(vec![0.0], 0.0), (vec![1.0], 1.0)]).unwrap();
        let mut trainer = Trainer::new(&samples);
        let mut genome = genome(vec![true, true], vec![0.5, 0.5]);

        let fitness = trainer.evaluate_fitness(&mut genome);
        assert!(fitness < 1e-6);
        assert!(genome.is_evaluated());
        assert_eq!(genome.fitness(), fitness);

        let network = trainer.network();
        assert_eq!(network.hidden_size(), 2);
        assert_eq!(network.windows(), &dvector![0.5, 0.5]);
        assert!(network.evaluate(&[0.0]).unwrap().abs() < 1e-9);
        assert!((network.evaluate(&[1.0]).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn exact_representation() {
        let source = RbfNetwork::from_parts(
            NonZeroUsize::new(1).unwrap(),
            vec![dvector![0.0], dvector![2.0]],
            dvector![0.8, 0.8],
            dvector![1.5, -2.0],
        )
        .unwrap();
        let samples = TrainingSet::new(
            (0..4).map(|i| (vec![i as f64], source.evaluate_scalar(i as f64).unwrap())),
        )
        .unwrap();

        let mut trainer = Trainer::new(&samples);
        let residual = trainer
            .fit(&genome(vec![true, false, true, false], vec![0.8, 0.3, 0.8, 0.3]))
            .unwrap();
        assert!(residual < 1e-9);
        assert!((trainer.residual() - residual).abs() < 1e-9);

        let network = trainer.into_network();
        assert_eq!(network.centers(), source.centers());
        assert!((network.weights()[0] - 1.5).abs() < 1e-9);
        assert!((network.weights()[1] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn residual_matches_fit() {
        let samples = line(12);
        let mut trainer = Trainer::new(&samples);
        let mut mask = vec![false; 12];
        for i in [0, 3, 6, 9, 11] {
            mask[i] = true;
        }
        let residual = trainer.fit(&genome(mask, vec![0.9; 12])).unwrap();
        assert!(residual > 0.0);
        assert!((trainer.residual() - residual).abs() < 1e-9);
    }

    #[test]
    fn empty_network_residual() {
        let samples = TrainingSet::new(vec![(vec![0.0], 3.0), (vec![1.0], -4.0)]).unwrap();
        let trainer = Trainer::new(&samples);
        assert_eq!(trainer.network().hidden_size(), 0);
        assert!((trainer.residual() - 12.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn active_units_pruned() {
        let samples = line(5);
        let trainer = Trainer::new(&samples);
        let genome = genome(
            vec![true, true, false, true, true],
            vec![0.5, 0.005, 0.5, DEFAULT_WIDTH_THRESHOLD, 0.011],
        );
        assert_eq!(trainer.active_units(&genome), vec![0, 4]);
        assert_eq!(trainer.width_threshold(), DEFAULT_WIDTH_THRESHOLD);

        let trainer = Trainer::with_width_threshold(&samples, 0.0);
        assert_eq!(trainer.active_units(&genome), vec![0, 1, 3, 4]);
    }

    #[test]
    fn degenerate_topology() {
        let samples = line(4);
        let mut trainer = Trainer::new(&samples);
        trainer
            .fit(&genome(vec![true, true, true, false], vec![0.6; 4]))
            .unwrap();
        let fitted = trainer.network().clone();

        for mask in [vec![false; 4], vec![false, false, true, false]] {
            let mut genome = genome(mask, vec![0.6; 4]);
            assert!(matches!(
                trainer.fit(&genome),
                Err(FitError::DegenerateTopology(_))
            ));
            assert_eq!(trainer.evaluate_fitness(&mut genome), SENTINEL_FITNESS);
            assert_eq!(genome.fitness(), SENTINEL_FITNESS);
            assert!(genome.is_evaluated());
            assert_eq!(trainer.network(), &fitted);
        }
    }

    #[test]
    fn pruned_widths_are_degenerate() {
        let samples = line(4);
        let mut trainer = Trainer::new(&samples);
        assert_eq!(
            trainer.fit(&genome(vec![true; 4], vec![0.005; 4])),
            Err(FitError::DegenerateTopology(0))
        );
    }

    #[test]
    fn duplicate_centers_are_singular() {
        let samples = TrainingSet::new(vec![(vec![0.5], 0.0), (vec![0.5], 1.0)]).unwrap();
        let mut trainer = Trainer::new(&samples);
        let mut genome = genome(vec![true, true], vec![0.4, 0.4]);

        assert_eq!(trainer.fit(&genome), Err(FitError::SingularFit));
        assert_eq!(trainer.evaluate_fitness(&mut genome), SENTINEL_FITNESS);
        assert_eq!(trainer.network().hidden_size(), 0);
    }

    #[test]
    fn zero_width() {
        let samples = line(3);
        let mut trainer = Trainer::with_width_threshold(&samples, 0.0);
        let mut genome = genome(vec![true, true, true], vec![0.5, 1e-9, 0.5]);

        let error = trainer.fit(&genome).unwrap_err();
        assert_eq!(
            error,
            FitError::ZeroWidth {
                unit: 1,
                width: 1e-9
            }
        );
        assert!(error.is_recoverable());
        assert_eq!(trainer.evaluate_fitness(&mut genome), SENTINEL_FITNESS);
    }

    #[test]
    fn genome_length_mismatch() {
        let samples = line(3);
        let mut trainer = Trainer::new(&samples);
        let error = trainer.fit(&genome(vec![true; 4], vec![0.5; 4])).unwrap_err();
        assert_eq!(
            error,
            FitError::GenomeLength {
                expected: 3,
                found: 4
            }
        );
        assert!(!error.is_recoverable());
    }

    #[test]
    #[should_panic]
    fn genome_length_mismatch_panics() {
        let samples = line(3);
        let mut trainer = Trainer::new(&samples);
        trainer.evaluate_fitness(&mut genome(vec![true; 2], vec![0.5; 2]));
    }

    #[test]
    fn evolution_never_loses_champion() {
        let samples = line(16);
        let mut trainer = Trainer::new(&samples);
        let mut population = Population::new(
            PopulationConfig {
                size: NonZeroUsize::new(20).unwrap(),
                objective: Objective::Minimize,
                elitism: 1,
                tournament_size: NonZeroUsize::new(3).unwrap(),
                crossover_chance: 0.8,
                mutation_rate: 0.1,
            },
            &StructureGenome::new(config(16)),
        );

        let mut best = SENTINEL_FITNESS;
        for _ in 0..8 {
            population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
            let champion = population.champion().fitness();
            assert!(champion <= best);
            assert!(population.genomes().all(|g| g.fitness() >= champion));
            best = champion;
            population.evolve().unwrap();
        }
    }
}
