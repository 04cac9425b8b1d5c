use evogen::logging::{EvolutionLogger, ReportingLevel, Stats};
use evogen::{Objective, Population, PopulationConfig};
use evogen_rbf::genomics::{AlleleRange, CrossoverKind, GeneticConfig, StructureGenome};
use evogen_rbf::networks::RbfNetwork;
use evogen_rbf::training::{Trainer, TrainingSet, DEFAULT_WIDTH_THRESHOLD, SENTINEL_FITNESS};

use serde::{Deserialize, Serialize};

use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::{env, fs};

/// Settings of a sinc approximation run, loaded
/// from the RON file passed as first argument.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct ExperimentConfig {
    /// Number of evenly spaced training samples.
    samples: usize,
    /// Bounds of the sampled interval.
    domain: (f64, f64),
    generations: usize,
    /// Residual at which the search stops early.
    target_residual: f32,
    width_threshold: f64,
    population: PopulationConfig,
    /// The genome length is overridden by the sample count.
    genetic: GeneticConfig,
    output: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> ExperimentConfig {
        ExperimentConfig {
            samples: 41,
            domain: (-10.0, 10.0),
            generations: 200,
            target_residual: 1e-3,
            width_threshold: DEFAULT_WIDTH_THRESHOLD,
            population: PopulationConfig {
                size: NonZeroUsize::new(60).unwrap(),
                objective: Objective::Minimize,
                elitism: 2,
                tournament_size: NonZeroUsize::new(3).unwrap(),
                crossover_chance: 0.85,
                mutation_rate: 0.03,
            },
            genetic: GeneticConfig {
                width_range: AlleleRange::new(0.0, 4.0),
                initial_activation_chance: 0.3,
                width_mutation_power: 0.25,
                crossover: CrossoverKind::TwoPoint,
                ..GeneticConfig::zero()
            },
            output: PathBuf::from("sinc.rbf"),
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

fn sample_sinc(config: &ExperimentConfig) -> Result<TrainingSet, Box<dyn Error>> {
    let (lower, upper) = config.domain;
    let step = if config.samples > 1 {
        (upper - lower) / (config.samples - 1) as f64
    } else {
        0.0
    };
    let samples = TrainingSet::new((0..config.samples).map(|i| {
        let x = lower + step * i as f64;
        (vec![x], sinc(x))
    }))?;
    Ok(samples)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config: ExperimentConfig = match env::args().nth(1) {
        Some(path) => ron::from_str(&fs::read_to_string(path)?)?,
        None => ExperimentConfig::default(),
    };
    let samples = sample_sinc(&config)?;
    let genetic_config = Arc::new(GeneticConfig {
        length: NonZeroUsize::new(samples.len()).ok_or("no training samples")?,
        ..config.genetic.clone()
    });

    let mut trainer = Trainer::with_width_threshold(&samples, config.width_threshold);
    let mut population = Population::new(
        config.population.clone(),
        &StructureGenome::new(genetic_config),
    );
    let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);

    for _ in 0..config.generations {
        population.evaluate_fitness(|g| trainer.evaluate_fitness(g));
        logger.log(&population);
        if population.champion().fitness() <= config.target_residual {
            break;
        }
        population.evolve()?;
    }
    population.evaluate_fitness(|g| trainer.evaluate_fitness(g));

    let champion = population.champion().clone();
    if champion.fitness() >= SENTINEL_FITNESS {
        return Err("no fittable network structure was found".into());
    }
    let residual = trainer.fit(&champion)?;
    log::info!("champion structure:\n{}", champion);

    let network = trainer.into_network();
    network.save_to_path(&config.output)?;
    let reloaded = RbfNetwork::load_from_path(&config.output)?;
    if reloaded != network {
        return Err(format!("{} does not hold the saved network", config.output.display()).into());
    }

    let best = Stats::from(logger.iter().map(|log| log.fitness.minimum));
    println!(
        "Best residual {} with {} hidden units after {} generations (per-generation best: {:?})",
        residual,
        network.hidden_size(),
        population.generation(),
        best
    );
    let (lower, upper) = config.domain;
    for i in 0..=8 {
        let x = lower + (upper - lower) * i as f64 / 8.0;
        println!(
            "sinc({:>6.2}) = {:>8.5}, network: {:>8.5}",
            x,
            sinc(x),
            reloaded.evaluate_scalar(x)?
        );
    }
    println!("Network saved to {}", config.output.display());
    Ok(())
}
