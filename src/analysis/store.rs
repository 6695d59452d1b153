//! Grid store and its queries
//!
//! A [`DataStore`] maps `(geometry, location id)` to a sample grid. Axis 0 of
//! every grid is time; the remaining axes are spatial. The rank of a grid is
//! fixed by its geometry class and checked on insertion:
//!
//! | Geometry | Rank |
//! |----------|------|
//! | Point    | 1    |
//! | Line     | 2    |
//! | Plane    | 3    |
//! | Domain   | 4    |
//!
//! NaN marks a sample without data. Every query skips NaN instead of letting
//! it poison the reduction.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::error::StoreError;

// =================================================================================================
// Geometry classes
// =================================================================================================

/// Geometry class of a monitored location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Geometry {
    Point,
    Line,
    Plane,
    Domain,
}

impl Geometry {
    /// Table order
    pub const ALL: [Geometry; 4] = [Geometry::Point, Geometry::Line, Geometry::Plane, Geometry::Domain];

    /// Grid rank (time axis included)
    pub const fn rank(self) -> usize {
        self.index() + 1
    }

    /// True for classes with at least one spatial axis
    pub const fn is_spatial(self) -> bool {
        !matches!(self, Geometry::Point)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Geometry::Point => "point",
            Geometry::Line => "line",
            Geometry::Plane => "plane",
            Geometry::Domain => "domain",
        }
    }

    const fn index(self) -> usize {
        match self {
            Geometry::Point => 0,
            Geometry::Line => 1,
            Geometry::Plane => 2,
            Geometry::Domain => 3,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Data store
// =================================================================================================

/// Sample grids keyed by geometry class and location id
///
/// Populated once per run, read-only afterwards. Each run owns its store, so
/// parallel runs never share one.
///
/// # Example
///
/// ```rust
/// use disperse_rs::analysis::{DataStore, Geometry};
/// use ndarray::{ArrayD, IxDyn};
///
/// let mut store = DataStore::new();
/// let grid = ArrayD::from_shape_vec(IxDyn(&[4]), vec![0.0, 2.0, 7.0, 1.0]).unwrap();
/// store.insert(Geometry::Point, "desk", grid).unwrap();
///
/// assert_eq!(store.exceeds(Geometry::Point, "desk", 5.0).unwrap(), Some(vec![2]));
/// assert_eq!(store.maximum(Geometry::Point, "desk").unwrap(), (Some(vec![2]), 7.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    grids: [BTreeMap<String, ArrayD<f64>>; 4],
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a grid, rejecting rank mismatches and duplicate keys
    pub fn insert(&mut self, geometry: Geometry, id: impl Into<String>, grid: ArrayD<f64>) -> Result<(), StoreError> {
        let id = id.into();
        if grid.ndim() != geometry.rank() {
            return Err(StoreError::RankMismatch {
                geometry,
                expected: geometry.rank(),
                found: grid.ndim(),
            });
        }

        let table = &mut self.grids[geometry.index()];
        if table.contains_key(&id) {
            return Err(StoreError::DuplicateLocation { geometry, id });
        }
        table.insert(id, grid);
        Ok(())
    }

    pub fn get(&self, geometry: Geometry, id: &str) -> Result<&ArrayD<f64>, StoreError> {
        self.grids[geometry.index()]
            .get(id)
            .ok_or_else(|| StoreError::UnknownLocation {
                geometry,
                id: id.to_string(),
            })
    }

    /// Location ids of one geometry class, sorted
    pub fn ids(&self, geometry: Geometry) -> impl Iterator<Item = &str> {
        self.grids[geometry.index()].keys().map(String::as_str)
    }

    /// Grids of one geometry class, sorted by id
    pub fn iter(&self, geometry: Geometry) -> impl Iterator<Item = (&str, &ArrayD<f64>)> {
        self.grids[geometry.index()].iter().map(|(id, grid)| (id.as_str(), grid))
    }

    /// Total number of grids
    pub fn len(&self) -> usize {
        self.grids.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ==================== Queries ====================

    /// Largest non-NaN value and its index
    ///
    /// Ties keep the first index in row-major order. A grid without data
    /// gives `(None, NaN)`.
    pub fn maximum(&self, geometry: Geometry, id: &str) -> Result<(Option<Vec<usize>>, f64), StoreError> {
        let grid = self.get(geometry, id)?;

        let mut best: Option<(usize, f64)> = None;
        for (flat, &value) in grid.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, current)| value > current) {
                best = Some((flat, value));
            }
        }

        Ok(match best {
            Some((flat, value)) => (Some(unravel_index(flat, grid.shape())), value),
            None => (None, f64::NAN),
        })
    }

    /// Index of the first value `≥ threshold` in time-major order
    pub fn exceeds(&self, geometry: Geometry, id: &str, threshold: f64) -> Result<Option<Vec<usize>>, StoreError> {
        let grid = self.get(geometry, id)?;

        Ok(grid
            .iter()
            .position(|&value| value >= threshold)
            .map(|flat| unravel_index(flat, grid.shape())))
    }

    /// First time index at which at least `percent` % of the non-NaN spatial
    /// samples are `≥ threshold`
    pub fn percentage_exceeds(
        &self,
        geometry: Geometry,
        id: &str,
        threshold: f64,
        percent: f64,
    ) -> Result<Option<usize>, StoreError> {
        let grid = self.get(geometry, id)?;

        Ok(grid
            .axis_iter(Axis(0))
            .enumerate()
            .find(|(_, step)| exceeding_percent(step, threshold).is_some_and(|p| p >= percent))
            .map(|(t, _)| t))
    }

    /// Time index and value of the largest exceeding percentage
    ///
    /// Ties keep the earliest time step. Gives `(None, 0.0)` when no sample
    /// ever exceeds the threshold.
    pub fn percentage_exceeds_max(
        &self,
        geometry: Geometry,
        id: &str,
        threshold: f64,
    ) -> Result<(Option<usize>, f64), StoreError> {
        let grid = self.get(geometry, id)?;

        let mut best = (None, 0.0);
        for (t, step) in grid.axis_iter(Axis(0)).enumerate() {
            if let Some(percent) = exceeding_percent(&step, threshold)
                && percent > best.1
            {
                best = (Some(t), percent);
            }
        }
        Ok(best)
    }
}

/// Percentage of non-NaN samples `≥ threshold`, `None` without data
fn exceeding_percent(step: &ArrayViewD<'_, f64>, threshold: f64) -> Option<f64> {
    let (valid, above) = step.iter().fold((0usize, 0usize), |(valid, above), &value| {
        if value.is_nan() {
            (valid, above)
        } else {
            (valid + 1, above + usize::from(value >= threshold))
        }
    });

    (valid > 0).then(|| 100.0 * above as f64 / valid as f64)
}

/// Row-major multi-index of flat position `flat`
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (slot, &extent) in index.iter_mut().zip(shape).rev() {
        *slot = flat % extent;
        flat /= extent;
    }
    index
}

// =================================================================================================
// Tests
// =================================================================================================
