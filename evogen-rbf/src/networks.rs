//! An RBF network is the phenotype of a structure genome:
//! a layer of gaussian hidden units, each centered on a
//! training input with its own window width, feeding a
//! single linear output.
//!
//! Networks are built by a [`Trainer`] when it decodes and
//! fits a genome, and can be saved to and loaded from a
//! plain text record (see [`persistence`]).
//!
//! [`Trainer`]: crate::training::Trainer
mod errors;
pub mod persistence;

pub use errors::NetworkError;
pub use persistence::RecordError;

use nalgebra::DVector;

use std::num::NonZeroUsize;

/// Smallest window width a hidden unit may have.
/// Narrower widths are clamped to it by [`RbfNetwork::activation`].
pub const MIN_WINDOW: f64 = 1e-8;

/// A two-layer radial basis function network
/// with a single output.
#[derive(Clone, Debug, PartialEq)]
pub struct RbfNetwork {
    input_size: usize,
    centers: Vec<DVector<f64>>,
    windows: DVector<f64>,
    weights: DVector<f64>,
}

impl RbfNetwork {
    /// Returns a network without hidden units,
    /// which evaluates to 0 everywhere.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::RbfNetwork;
    /// use std::num::NonZeroUsize;
    ///
    /// let network = RbfNetwork::new(NonZeroUsize::new(2).unwrap());
    /// assert_eq!(network.hidden_size(), 0);
    /// assert_eq!(network.evaluate(&[0.5, 1.0]), Ok(0.0));
    /// ```
    pub fn new(input_size: NonZeroUsize) -> RbfNetwork {
        RbfNetwork {
            input_size: input_size.get(),
            centers: vec![],
            windows: DVector::zeros(0),
            weights: DVector::zeros(0),
        }
    }

    /// Returns a network with the passed topology and weights.
    ///
    /// # Errors
    /// Returns an error if the centers, windows and weights
    /// differ in number, a center's dimension is not `input_size`,
    /// or a window is not a finite width above [`MIN_WINDOW`].
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::RbfNetwork;
    /// use nalgebra::dvector;
    /// use std::num::NonZeroUsize;
    ///
    /// let network = RbfNetwork::from_parts(
    ///     NonZeroUsize::new(1).unwrap(),
    ///     vec![dvector![0.0], dvector![1.0]],
    ///     dvector![0.5, 0.5],
    ///     dvector![2.0, -1.0],
    /// )
    /// .unwrap();
    ///
    /// // At a center, its own unit responds fully.
    /// let expected = 2.0 - (-4.0f64).exp();
    /// assert!((network.evaluate_scalar(0.0).unwrap() - expected).abs() < 1e-12);
    /// ```
    pub fn from_parts(
        input_size: NonZeroUsize,
        centers: Vec<DVector<f64>>,
        windows: DVector<f64>,
        weights: DVector<f64>,
    ) -> Result<RbfNetwork, NetworkError> {
        let mut network = RbfNetwork::new(input_size);
        network.rebuild(centers, windows, weights)?;
        Ok(network)
    }

    /// Replaces the network's whole topology and weights,
    /// resizing it to the number of centers passed.
    /// The network is left untouched on failure.
    pub(crate) fn rebuild(
        &mut self,
        centers: Vec<DVector<f64>>,
        windows: DVector<f64>,
        weights: DVector<f64>,
    ) -> Result<(), NetworkError> {
        if centers.len() != windows.len() || centers.len() != weights.len() {
            return Err(NetworkError::InconsistentTopology {
                centers: centers.len(),
                windows: windows.len(),
                weights: weights.len(),
            });
        }
        if let Some(center) = centers.iter().find(|c| c.len() != self.input_size) {
            return Err(NetworkError::InvalidDimension {
                expected: self.input_size,
                found: center.len(),
            });
        }
        if let Some((unit, width)) = windows
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= MIN_WINDOW)
        {
            return Err(NetworkError::ZeroWidth {
                unit,
                width: *width,
            });
        }

        self.centers = centers;
        self.windows = windows;
        self.weights = weights;
        Ok(())
    }

    /// Returns the dimension of the network's inputs.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Returns the number of hidden units.
    pub fn hidden_size(&self) -> usize {
        self.centers.len()
    }

    /// Returns the hidden units' centers.
    pub fn centers(&self) -> &[DVector<f64>] {
        &self.centers
    }

    /// Returns the hidden units' window widths.
    pub fn windows(&self) -> &DVector<f64> {
        &self.windows
    }

    /// Returns the output layer's weights.
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Returns every hidden unit's response to `input`.
    ///
    /// # Errors
    /// Returns an error if `input` is not of dimension [`input_size`].
    ///
    /// [`input_size`]: RbfNetwork::input_size
    pub fn hidden_layer(&self, input: &[f64]) -> Result<DVector<f64>, NetworkError> {
        self.check_dimension(input.len())?;
        Ok(DVector::from_iterator(
            self.hidden_size(),
            self.centers
                .iter()
                .zip(self.windows.iter())
                .map(|(center, window)| Self::activation(input, center.as_slice(), *window)),
        ))
    }

    /// Returns the network's output for `input`: the hidden
    /// layer's response weighted by the output weights.
    /// A network without hidden units outputs 0.
    ///
    /// # Errors
    /// Returns an error if `input` is not of dimension [`input_size`].
    ///
    /// [`input_size`]: RbfNetwork::input_size
    pub fn evaluate(&self, input: &[f64]) -> Result<f64, NetworkError> {
        let hidden = self.hidden_layer(input)?;
        if self.hidden_size() == 0 {
            return Ok(0.0);
        }
        Ok(hidden.dot(&self.weights))
    }

    /// Returns the network's output for a single scalar input.
    ///
    /// # Errors
    /// Returns an [`InvalidDimension`] error unless the network's
    /// input size is 1.
    ///
    /// [`InvalidDimension`]: NetworkError::InvalidDimension
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::{NetworkError, RbfNetwork};
    /// use std::num::NonZeroUsize;
    ///
    /// let network = RbfNetwork::new(NonZeroUsize::new(3).unwrap());
    /// assert_eq!(
    ///     network.evaluate_scalar(1.0),
    ///     Err(NetworkError::InvalidDimension { expected: 3, found: 1 })
    /// );
    /// ```
    pub fn evaluate_scalar(&self, input: f64) -> Result<f64, NetworkError> {
        self.evaluate(&[input])
    }

    fn check_dimension(&self, found: usize) -> Result<(), NetworkError> {
        if found == self.input_size {
            Ok(())
        } else {
            Err(NetworkError::InvalidDimension {
                expected: self.input_size,
                found,
            })
        }
    }

    /// Gaussian radial basis function `exp(-‖x - c‖² / w²)`.
    ///
    /// `w` is taken in absolute value and clamped to at least
    /// [`MIN_WINDOW`]. `x` and `c` must have the same length.
    ///
    /// # Examples
    /// ```
    /// use evogen_rbf::networks::RbfNetwork;
    ///
    /// // Zero distance always yields a full response.
    /// assert_eq!(RbfNetwork::activation(&[1.0, 2.0], &[1.0, 2.0], 0.3), 1.0);
    ///
    /// // Wider windows respond more strongly at a fixed distance.
    /// let narrow = RbfNetwork::activation(&[0.0], &[1.0], 0.5);
    /// let wide = RbfNetwork::activation(&[0.0], &[1.0], 2.0);
    /// assert!(narrow < wide);
    /// ```
    pub fn activation(x: &[f64], c: &[f64], w: f64) -> f64 {
        debug_assert_eq!(x.len(), c.len(), "input and center dimensions differ");
        let distance: f64 = x
            .iter()
            .zip(c)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        let w = w.abs().max(MIN_WINDOW);
        (-distance / (w * w)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn one() -> NonZeroUsize {
        NonZeroUsize::new(1).unwrap()
    }

    #[test]
    fn activation_at_center() {
        for w in [1e-6, 0.1, 1.0, 10.0, 1e6] {
            assert_eq!(RbfNetwork::activation(&[3.0, -1.0], &[3.0, -1.0], w), 1.0);
        }
    }

    #[test]
    fn activation_monotonic_in_width() {
        let x = [0.3, 0.7];
        let c = [-0.2, 1.1];
        let widths = [0.1, 0.2, 0.5, 1.0, 2.0, 5.0];
        for pair in widths.windows(2) {
            assert!(
                RbfNetwork::activation(&x, &c, pair[0]) < RbfNetwork::activation(&x, &c, pair[1])
            );
        }
    }

    #[test]
    fn activation_value() {
        let value = RbfNetwork::activation(&[0.0, 0.0], &[1.0, 1.0], 2.0);
        assert!((value - (-0.5f64).exp()).abs() < 1e-15);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn activation_dimension_mismatch() {
        RbfNetwork::activation(&[0.0, 1.0], &[0.0], 1.0);
    }

    #[test]
    fn activation_zero_width() {
        assert_eq!(RbfNetwork::activation(&[0.0], &[0.0], 0.0), 1.0);
        assert_eq!(RbfNetwork::activation(&[0.0], &[1.0], 0.0), 0.0);
        assert!(!RbfNetwork::activation(&[0.0], &[1.0], f64::NAN).is_nan());
    }

    #[test]
    fn evaluate_weighted_sum() {
        let network = RbfNetwork::from_parts(
            NonZeroUsize::new(2).unwrap(),
            vec![dvector![0.0, 0.0], dvector![1.0, 0.0]],
            dvector![1.0, 1.0],
            dvector![3.0, 2.0],
        )
        .unwrap();
        let output = network.evaluate(&[0.0, 0.0]).unwrap();
        assert!((output - (3.0 + 2.0 * (-1.0f64).exp())).abs() < 1e-12);
        assert_eq!(network.hidden_size(), 2);
        assert_eq!(network.input_size(), 2);
    }

    #[test]
    fn evaluate_wrong_dimension() {
        let network = RbfNetwork::new(NonZeroUsize::new(2).unwrap());
        assert_eq!(
            network.evaluate(&[1.0]),
            Err(NetworkError::InvalidDimension {
                expected: 2,
                found: 1
            })
        );
        assert!(network.evaluate_scalar(1.0).is_err());
        assert!(network.hidden_layer(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn evaluate_scalar_matches_vector() {
        let network = RbfNetwork::from_parts(
            one(),
            vec![dvector![0.0], dvector![2.0]],
            dvector![0.7, 1.3],
            dvector![1.5, -0.5],
        )
        .unwrap();
        for x in [-1.0, 0.0, 0.5, 2.0, 4.0] {
            assert_eq!(network.evaluate_scalar(x), network.evaluate(&[x]));
        }
    }

    #[test]
    fn empty_network_outputs_zero() {
        let network = RbfNetwork::new(one());
        assert_eq!(network.evaluate_scalar(12.0), Ok(0.0));
        assert_eq!(network.hidden_layer(&[1.0]).unwrap().len(), 0);
    }

    #[test]
    fn from_parts_inconsistent() {
        assert_eq!(
            RbfNetwork::from_parts(one(), vec![dvector![0.0]], dvector![1.0, 1.0], dvector![1.0]),
            Err(NetworkError::InconsistentTopology {
                centers: 1,
                windows: 2,
                weights: 1
            })
        );
        assert_eq!(
            RbfNetwork::from_parts(one(), vec![dvector![0.0, 1.0]], dvector![1.0], dvector![1.0]),
            Err(NetworkError::InvalidDimension {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            RbfNetwork::from_parts(
                one(),
                vec![dvector![0.0], dvector![1.0]],
                dvector![1.0, 0.0],
                dvector![1.0, 1.0]
            ),
            Err(NetworkError::ZeroWidth {
                unit: 1,
                width: 0.0
            })
        );
    }

    #[test]
    fn rebuild_failure_keeps_network() {
        let mut network =
            RbfNetwork::from_parts(one(), vec![dvector![0.5]], dvector![1.0], dvector![2.0])
                .unwrap();
        let before = network.clone();
        assert!(network
            .rebuild(vec![dvector![0.0]], dvector![-1.0], dvector![1.0])
            .is_err());
        assert_eq!(network, before);
    }
}
