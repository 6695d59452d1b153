//! Method-of-images series
//!
//! Walls of the enclosure are no-flux boundaries. Along one axis of length
//! `L`, a source at `s` observed at `x` is reflected into an infinite lattice
//! of image sources; the one-dimensional kernel becomes
//!
//! ```text
//! Σ_k  exp(−(x − s + 2kL)² / 4Dτ) + exp(−(x + s + 2kL)² / 4Dτ)
//! ```
//!
//! Term `k = 0` is the real source plus its reflection in the `x = 0` wall.
//! Each further mirror pair adds `k = +m` and `k = −m`.
//!
//! # Truncation
//!
//! - **Manual**: a fixed number of mirror pairs on each side of zero.
//! - **Auto**: add pairs until the geometric variance between two
//!   successive partial sums, `exp(mean((ln old − ln new)²))`, drops below
//!   `1 + CONVERGENCE_TOLERANCE`, or [`MAX_MIRROR_PAIRS`] is reached.

/// Hard cap on mirror pairs in automatic mode
pub const MAX_MIRROR_PAIRS: usize = 20;

/// Geometric-variance tolerance in automatic mode
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// How the image series is truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageTruncation {
    /// Fixed number of mirror pairs on each side of zero
    Manual { pairs: usize },

    /// Add pairs until converged or capped
    #[default]
    Auto,
}

/// Partial sum of the image series at a set of positions
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSum {
    /// Series value per position
    pub values: Vec<f64>,

    /// Mirror pairs added beyond the `k = 0` term
    pub mirror_pairs: usize,

    /// False when automatic mode stopped at the cap
    pub converged: bool,
}

/// Image series evaluator along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageSeries {
    truncation: ImageTruncation,
}

impl ImageSeries {
    pub fn new(truncation: ImageTruncation) -> Self {
        Self { truncation }
    }

    /// Evaluate the series at every position
    ///
    /// # Arguments
    ///
    /// * `positions` - Observation coordinates along the axis \[m\]
    /// * `source` - Source coordinate along the axis \[m\]
    /// * `length` - Enclosure length along the axis \[m\]
    /// * `spread` - `4·D·τ` \[m²\], must be positive
    pub fn sum(&self, positions: &[f64], source: f64, length: f64, spread: f64) -> ImageSum {
        let mut values = vec![0.0; positions.len()];
        add_mirror(&mut values, positions, source, 0.0, spread);

        match self.truncation {
            ImageTruncation::Manual { pairs } => {
                for k in 1..=pairs {
                    add_pair(&mut values, positions, source, length, k, spread);
                }
                ImageSum {
                    values,
                    mirror_pairs: pairs,
                    converged: true,
                }
            }
            ImageTruncation::Auto => {
                for k in 1..=MAX_MIRROR_PAIRS {
                    let previous = values.clone();
                    add_pair(&mut values, positions, source, length, k, spread);

                    if geometric_variance(&previous, &values) < 1.0 + CONVERGENCE_TOLERANCE {
                        return ImageSum {
                            values,
                            mirror_pairs: k,
                            converged: true,
                        };
                    }
                }
                ImageSum {
                    values,
                    mirror_pairs: MAX_MIRROR_PAIRS,
                    converged: false,
                }
            }
        }
    }
}

/// Add mirror pair `k` (images at `+2kL` and `−2kL`)
fn add_pair(values: &mut [f64], positions: &[f64], source: f64, length: f64, k: usize, spread: f64) {
    let shift = 2.0 * k as f64 * length;
    add_mirror(values, positions, source, shift, spread);
    add_mirror(values, positions, source, -shift, spread);
}

/// Add the two images displaced by `shift`
fn add_mirror(values: &mut [f64], positions: &[f64], source: f64, shift: f64, spread: f64) {
    for (value, &x) in values.iter_mut().zip(positions) {
        let direct = x - source + shift;
        let reflected = x + source + shift;
        *value += (-direct * direct / spread).exp() + (-reflected * reflected / spread).exp();
    }
}

/// `exp(mean((ln old − ln new)²))`
///
/// Positions whose partial sum did not change contribute zero, so sums that
/// underflowed to 0 do not keep the series from converging.
pub fn geometric_variance(old: &[f64], new: &[f64]) -> f64 {
    if old.is_empty() {
        return 1.0;
    }

    let total: f64 = old
        .iter()
        .zip(new)
        .map(|(&a, &b)| {
            if a == b {
                0.0
            } else {
                let d = a.ln() - b.ln();
                d * d
            }
        })
        .sum();

    (total / old.len() as f64).exp()
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zeroth_term() {
        let series = ImageSeries::new(ImageTruncation::Manual { pairs: 0 });
        let sum = series.sum(&[1.0], 1.0, 3.0, 0.4);

        // exp(0) + exp(-(2)²/0.4)
        let expected = 1.0 + (-4.0f64 / 0.4).exp();
        assert_relative_eq!(sum.values[0], expected, epsilon = 1e-15);
        assert_eq!(sum.mirror_pairs, 0);
    }

    #[test]
    fn test_manual_pairs_are_added() {
        let one = ImageSeries::new(ImageTruncation::Manual { pairs: 1 }).sum(&[0.5], 1.0, 3.0, 40.0);
        let zero = ImageSeries::new(ImageTruncation::Manual { pairs: 0 }).sum(&[0.5], 1.0, 3.0, 40.0);

        assert!(one.values[0] > zero.values[0]);
        assert_eq!(one.mirror_pairs, 1);
    }

    #[test]
    fn test_auto_converges_quickly_for_small_spread() {
        let sum = ImageSeries::default().sum(&[0.5, 1.5, 2.5], 1.0, 3.0, 0.4);

        assert!(sum.converged);
        assert!(sum.mirror_pairs <= 2);
    }

    #[test]
    fn test_auto_needs_more_pairs_for_large_spread() {
        let narrow = ImageSeries::default().sum(&[0.5], 1.0, 3.0, 0.4);
        let wide = ImageSeries::default().sum(&[0.5], 1.0, 3.0, 400.0);

        assert!(wide.mirror_pairs > narrow.mirror_pairs);
    }

    #[test]
    fn test_auto_is_stable_once_converged() {
        let positions = [0.0, 0.7, 1.9, 3.0];
        let auto = ImageSeries::default().sum(&positions, 1.2, 3.0, 25.0);
        assert!(auto.converged);

        let extended = ImageSeries::new(ImageTruncation::Manual {
            pairs: auto.mirror_pairs + 1,
        })
        .sum(&positions, 1.2, 3.0, 25.0);

        assert!(geometric_variance(&auto.values, &extended.values) < 1.0 + CONVERGENCE_TOLERANCE);
    }

    #[test]
    fn test_auto_reports_cap() {
        // Spread so large that every image contributes ~1
        let sum = ImageSeries::default().sum(&[1.0], 1.0, 1.0, 1e12);

        assert!(!sum.converged);
        assert_eq!(sum.mirror_pairs, MAX_MIRROR_PAIRS);
    }

    #[test]
    fn test_series_is_symmetric_about_walls() {
        // No-flux walls: kernel at the wall equals that mirrored across the source midpoint
        let series = ImageSeries::new(ImageTruncation::Manual { pairs: 5 });
        let left = series.sum(&[0.0], 1.0, 4.0, 2.0).values[0];
        let right = series.sum(&[4.0], 3.0, 4.0, 2.0).values[0];

        assert_relative_eq!(left, right, epsilon = 1e-12);
    }

    #[test]
    fn test_geometric_variance() {
        assert_eq!(geometric_variance(&[1.0, 2.0], &[1.0, 2.0]), 1.0);
        assert_eq!(geometric_variance(&[0.0], &[0.0]), 1.0);
        assert_eq!(geometric_variance(&[], &[]), 1.0);

        let v = geometric_variance(&[1.0], &[std::f64::consts::E]);
        assert_relative_eq!(v, std::f64::consts::E, epsilon = 1e-12);
    }
}
