//! Sampling data types
//!
//! This module provides the containers the dispersion models are evaluated
//! on: the simulated time axis, the enclosing volume and the flattened list
//! of sample positions belonging to one monitored location.

use nalgebra::{Point3, Vector3};
use std::fmt;

// =================================================================================================
// Time axis
// =================================================================================================

/// Uniformly sampled simulation time
///
/// The step is `dt = total_time / samples` and sample `i` sits at `i · dt`,
/// so the axis always starts at zero and the same `dt` drives every
/// cumulative integration along it.
///
/// # Example
///
/// ```rust
/// use disperse_rs::physics::TimeAxis;
///
/// let axis = TimeAxis::new(10.0, 5);
/// assert_eq!(axis.dt(), 2.0);
/// assert_eq!(axis.times(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    /// Total simulated time \[s\]
    pub total_time: f64,

    /// Number of time samples
    pub samples: usize,
}

impl TimeAxis {
    pub fn new(total_time: f64, samples: usize) -> Self {
        Self { total_time, samples }
    }

    /// Fixed time step \[s\]
    pub fn dt(&self) -> f64 {
        self.total_time / self.samples as f64
    }

    /// Sample times, computed from the index to avoid accumulated rounding
    pub fn times(&self) -> Vec<f64> {
        let dt = self.dt();
        (0..self.samples).map(|i| i as f64 * dt).collect()
    }

    /// Time elapsed since `start` at every sample (negative before `start`)
    pub fn elapsed_since(&self, start: f64) -> Vec<f64> {
        let dt = self.dt();
        (0..self.samples).map(|i| i as f64 * dt - start).collect()
    }

    /// Time of sample `index`
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.dt()
    }
}

// =================================================================================================
// Directions and volume
// =================================================================================================

/// Cartesian direction of the enclosure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    X,
    Y,
    Z,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Y, Direction::Z];

    /// Component index (x → 0, y → 1, z → 2)
    pub const fn index(self) -> usize {
        match self {
            Direction::X => 0,
            Direction::Y => 1,
            Direction::Z => 2,
        }
    }

    /// The two remaining directions, in axis order
    pub const fn others(self) -> [Direction; 2] {
        match self {
            Direction::X => [Direction::Y, Direction::Z],
            Direction::Y => [Direction::X, Direction::Z],
            Direction::Z => [Direction::X, Direction::Y],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::X => write!(f, "x"),
            Direction::Y => write!(f, "y"),
            Direction::Z => write!(f, "z"),
        }
    }
}

/// Rectangular enclosure spanning `[0, Lx] × [0, Ly] × [0, Lz]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    dimensions: Vector3<f64>,
}

impl Volume {
    /// Create from the three side lengths \[m\]
    pub fn new(lx: f64, ly: f64, lz: f64) -> Self {
        Self {
            dimensions: Vector3::new(lx, ly, lz),
        }
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Side length along `direction` \[m\]
    pub fn length(&self, direction: Direction) -> f64 {
        self.dimensions[direction.index()]
    }

    /// Enclosed volume \[m³\]
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// True if `point` lies inside or on the walls
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        Direction::ALL.iter().all(|&d| {
            let c = point[d.index()];
            (0.0..=self.length(d)).contains(&c)
        })
    }
}

// =================================================================================================
// Sample positions
// =================================================================================================

/// Flattened sample positions of one monitored location
///
/// `points` is stored in row-major order over `shape`. A single point has an
/// empty shape, a line `[n]`, a plane `[n_u, n_v]` and the full domain
/// `[nx, ny, nz]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePositions {
    shape: Vec<usize>,
    points: Vec<Point3<f64>>,
}

impl SamplePositions {
    /// Create from a spatial shape and row-major points
    ///
    /// # Panics
    ///
    /// Panics when the number of points does not match the shape.
    pub fn new(shape: Vec<usize>, points: Vec<Point3<f64>>) -> Self {
        assert_eq!(
            shape.iter().product::<usize>(),
            points.len(),
            "Sample shape {:?} does not hold {} points",
            shape,
            points.len()
        );
        Self { shape, points }
    }

    /// A single sample position (empty spatial shape)
    pub fn single(point: Point3<f64>) -> Self {
        Self {
            shape: Vec::new(),
            points: vec![point],
        }
    }

    /// Spatial shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Coordinates of every point along `direction`
    pub fn coordinates(&self, direction: Direction) -> Vec<f64> {
        self.points.iter().map(|p| p[direction.index()]).collect()
    }

    /// Shape of a time-major grid over these positions
    pub fn grid_shape(&self, time_samples: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.shape.len() + 1);
        shape.push(time_samples);
        shape.extend_from_slice(&self.shape);
        shape
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
///
/// A single sample sits at `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

// ==================== Tests ====================
