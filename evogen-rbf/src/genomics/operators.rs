use super::{CrossoverKind, StructureGenome};

use rand::Rng;
use rand_distr::{Distribution, Normal};

use std::fmt;

/// Randomizes a genome's content.
pub type Initializer = fn(&mut StructureGenome);
/// Mutates a genome at the passed rate, returning the number of changes.
pub type Mutator = fn(&mut StructureGenome, f32) -> usize;
/// Returns the similarity of two genomes in [0.0, 1.0].
pub type Comparator = fn(&StructureGenome, &StructureGenome) -> f32;
/// Crosses two parents into the supplied offspring slots,
/// returning the number of offspring written.
pub type Crossover = fn(
    &StructureGenome,
    &StructureGenome,
    Option<&mut StructureGenome>,
    Option<&mut StructureGenome>,
) -> usize;

/// The set of variation operators a genome is
/// constructed with.
///
/// The default operators vary the activation mask and the
/// width sequence independently, while always keeping both
/// sequences positionally aligned.
#[derive(Clone, Copy)]
pub struct Operators {
    pub initializer: Initializer,
    pub mutator: Mutator,
    pub comparator: Comparator,
    pub crossover: Crossover,
}

impl Default for Operators {
    fn default() -> Operators {
        Operators {
            initializer: initialize,
            mutator: mutate,
            comparator: compare,
            crossover,
        }
    }
}

impl fmt::Debug for Operators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operators").finish_non_exhaustive()
    }
}

/// Sets each mask bit with `initial_activation_chance` probability,
/// and draws each width uniformly from the configured range.
pub fn initialize(genome: &mut StructureGenome) {
    let mut rng = rand::thread_rng();
    let chance = genome.config.initial_activation_chance;
    let range = genome.config.width_range;
    for bit in &mut genome.mask {
        *bit = rng.gen::<f32>() < chance;
    }
    for width in &mut genome.widths {
        *width = range.sample(&mut rng);
    }
    genome.evaluated = false;
}

/// Flips each mask bit, and nudges each width by a gaussian
/// amount clamped into the configured range, each with
/// probability `rate`. Only widths whose value actually
/// changes are counted.
pub fn mutate(genome: &mut StructureGenome, rate: f32) -> usize {
    let mut rng = rand::thread_rng();
    let range = genome.config.width_range;
    let noise = Normal::new(0.0, genome.config.width_mutation_power).ok();

    let mut count = 0;
    for bit in &mut genome.mask {
        if rng.gen::<f32>() < rate {
            *bit = !*bit;
            count += 1;
        }
    }
    for width in &mut genome.widths {
        if rng.gen::<f32>() < rate {
            let mutated = match &noise {
                Some(noise) => range.clamp(*width + noise.sample(&mut rng)),
                None => range.sample(&mut rng),
            };
            // Nudges of zero, or clamped back onto the same bound, change nothing.
            if mutated != *width {
                *width = mutated;
                count += 1;
            }
        }
    }

    if count > 0 {
        genome.evaluated = false;
    }
    count
}

/// Averages the similarity of the masks (fraction of equal bits)
/// and of the widths (one minus the mean difference relative to
/// the width range's span).
///
/// # Panics
/// Panics if the genomes have different lengths.
pub fn compare(first: &StructureGenome, second: &StructureGenome) -> f32 {
    assert_eq!(
        first.len(),
        second.len(),
        "compared genomes of different lengths"
    );
    let len = first.len() as f64;

    let equal_bits = first
        .mask
        .iter()
        .zip(&second.mask)
        .filter(|(a, b)| a == b)
        .count();
    let mask_similarity = equal_bits as f64 / len;

    let span = first.config.width_range.span();
    let width_similarity = if span > 0.0 {
        let difference: f64 = first
            .widths
            .iter()
            .zip(&second.widths)
            .map(|(a, b)| (a - b).abs())
            .sum();
        (1.0 - difference / len / span).clamp(0.0, 1.0)
    } else {
        1.0
    };

    (0.5 * (mask_similarity + width_similarity)) as f32
}

/// Crosses the parents' masks, then independently their widths,
/// using the parent's configured [`CrossoverKind`].
///
/// # Panics
/// Panics if the parents, or the supplied offspring,
/// have different lengths.
pub fn crossover(
    mom: &StructureGenome,
    dad: &StructureGenome,
    sis: Option<&mut StructureGenome>,
    bro: Option<&mut StructureGenome>,
) -> usize {
    assert_eq!(mom.len(), dad.len(), "crossed genomes of different lengths");
    if sis.is_none() && bro.is_none() {
        return 0;
    }

    let mut rng = rand::thread_rng();
    let kind = mom.config.crossover;
    let (sis_mask, bro_mask) = cross(&mom.mask, &dad.mask, kind, &mut rng);
    let (sis_widths, bro_widths) = cross(&mom.widths, &dad.widths, kind, &mut rng);

    let mut n = 0;
    if let Some(sis) = sis {
        assert_eq!(sis.len(), mom.len(), "crossed into a child of different length");
        sis.mask = sis_mask;
        sis.widths = sis_widths;
        sis.evaluated = false;
        n += 1;
    }
    if let Some(bro) = bro {
        assert_eq!(bro.len(), mom.len(), "crossed into a child of different length");
        bro.mask = bro_mask;
        bro.widths = bro_widths;
        bro.evaluated = false;
        n += 1;
    }
    n
}

/// Crosses two equal-length sequences, returning two children
/// whose element `i` is taken from element `i` of either parent.
pub(super) fn cross<T: Copy>(
    first: &[T],
    second: &[T],
    kind: CrossoverKind,
    rng: &mut impl Rng,
) -> (Vec<T>, Vec<T>) {
    let len = first.len();
    let swapped: Vec<bool> = match kind {
        CrossoverKind::OnePoint => {
            let cut = rng.gen_range(0..=len);
            (0..len).map(|i| i >= cut).collect()
        }
        CrossoverKind::TwoPoint => {
            let a = rng.gen_range(0..=len);
            let b = rng.gen_range(0..=len);
            let segment = a.min(b)..a.max(b);
            (0..len).map(|i| segment.contains(&i)).collect()
        }
        CrossoverKind::Uniform => (0..len).map(|_| rng.gen::<bool>()).collect(),
    };

    let pick = |own: &[T], other: &[T]| -> Vec<T> {
        own.iter()
            .zip(other)
            .zip(&swapped)
            .map(|((own, other), swap)| if *swap { *other } else { *own })
            .collect()
    };
    (pick(first, second), pick(second, first))
}
