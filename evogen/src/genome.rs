/// An interface for genomes that can be evolved by a [`Population`].
///
/// Implementors keep track of whether their current content has been
/// scored: any operation that changes the genome must clear the
/// _evaluated_ flag, and [`set_fitness`] must set it.
///
/// [`Population`]: crate::Population
/// [`set_fitness`]: Genome::set_fitness
pub trait Genome: Clone {
    /// Randomizes the genome's content.
    fn initialize(&mut self);

    /// Mutates each element of the genome with probability `rate`.
    /// Returns the number of elementary changes made.
    fn mutate(&mut self, rate: f32) -> usize;

    /// Returns the similarity between two genomes, in the range
    /// [0.0, 1.0], where 1.0 means identical.
    fn compare(&self, other: &Self) -> f32;

    /// Crosses `mom` and `dad`, writing offspring into whichever
    /// of `sis` and `bro` are supplied. Returns the number of
    /// offspring written.
    fn recombine(mom: &Self, dad: &Self, sis: Option<&mut Self>, bro: Option<&mut Self>)
        -> usize;

    /// Sets the genome's fitness value, marking it as evaluated.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f32;

    /// Returns whether the genome's fitness reflects its current content.
    fn is_evaluated(&self) -> bool;
}
