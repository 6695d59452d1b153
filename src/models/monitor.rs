//! Monitored locations
//!
//! A monitored location is where the concentration grid is sampled. Its
//! kind fixes the geometry class and therefore the rank of the grid:
//!
//! | Kind     | Spatial shape    | Grid rank |
//! |----------|------------------|-----------|
//! | `Point`  | `[]`             | 1         |
//! | `Line`   | `[n_dir]`        | 2         |
//! | `Plane`  | `[n_u, n_v]`     | 3         |
//! | `Domain` | `[nx, ny, nz]`   | 4         |
//!
//! Lattice coordinates along an axis of length `L` with `n` samples are
//! `linspace(0, L, n)`.

use nalgebra::Point3;

use crate::analysis::Geometry;
use crate::physics::{linspace, Direction, SamplePositions, Volume};

/// Shape of a monitored location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorKind {
    /// Single position
    Point { position: Point3<f64> },

    /// Line parallel to `direction`, fixed at `(a, b)` along the two other
    /// directions (in axis order)
    Line { direction: Direction, a: f64, b: f64 },

    /// Plane normal to `normal`, at `offset` along it
    Plane { normal: Direction, offset: f64 },

    /// Whole enclosure
    Domain,
}

/// Named monitored location
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorLocation {
    pub id: String,
    pub kind: MonitorKind,
}

impl MonitorLocation {
    pub fn point(id: impl Into<String>, position: Point3<f64>) -> Self {
        Self {
            id: id.into(),
            kind: MonitorKind::Point { position },
        }
    }

    pub fn line(id: impl Into<String>, direction: Direction, a: f64, b: f64) -> Self {
        Self {
            id: id.into(),
            kind: MonitorKind::Line { direction, a, b },
        }
    }

    pub fn plane(id: impl Into<String>, normal: Direction, offset: f64) -> Self {
        Self {
            id: id.into(),
            kind: MonitorKind::Plane { normal, offset },
        }
    }

    pub fn domain(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MonitorKind::Domain,
        }
    }

    /// Geometry class of the grids this location produces
    pub fn geometry(&self) -> Geometry {
        match self.kind {
            MonitorKind::Point { .. } => Geometry::Point,
            MonitorKind::Line { .. } => Geometry::Line,
            MonitorKind::Plane { .. } => Geometry::Plane,
            MonitorKind::Domain => Geometry::Domain,
        }
    }

    /// True if every fixed coordinate of the location lies inside `volume`
    pub fn within(&self, volume: &Volume) -> bool {
        match self.kind {
            MonitorKind::Point { position } => volume.contains(&position),
            MonitorKind::Line { direction, a, b } => {
                let [u, v] = direction.others();
                (0.0..=volume.length(u)).contains(&a) && (0.0..=volume.length(v)).contains(&b)
            }
            MonitorKind::Plane { normal, offset } => (0.0..=volume.length(normal)).contains(&offset),
            MonitorKind::Domain => true,
        }
    }

    /// Sample positions of this location, row-major over its spatial shape
    ///
    /// `samples` holds the lattice size along x, y and z.
    ///
    /// # Example
    ///
    /// ```rust
    /// use disperse_rs::models::MonitorLocation;
    /// use disperse_rs::physics::{Direction, Volume};
    ///
    /// let volume = Volume::new(4.0, 3.0, 2.0);
    /// let plane = MonitorLocation::plane("floor", Direction::Z, 0.0);
    ///
    /// let positions = plane.positions(&volume, [5, 4, 3]);
    /// assert_eq!(positions.shape(), &[5, 4]);
    /// assert_eq!(positions.points()[1].y, 1.0);
    /// ```
    pub fn positions(&self, volume: &Volume, samples: [usize; 3]) -> SamplePositions {
        let axis = |d: Direction| linspace(0.0, volume.length(d), samples[d.index()]);

        match self.kind {
            MonitorKind::Point { position } => SamplePositions::single(position),
            MonitorKind::Line { direction, a, b } => {
                let [u, v] = direction.others();
                let along = axis(direction);
                let points = along
                    .iter()
                    .map(|&s| {
                        let mut p = Point3::origin();
                        p[direction.index()] = s;
                        p[u.index()] = a;
                        p[v.index()] = b;
                        p
                    })
                    .collect();
                SamplePositions::new(vec![along.len()], points)
            }
            MonitorKind::Plane { normal, offset } => {
                let [u, v] = normal.others();
                let (us, vs) = (axis(u), axis(v));
                let mut points = Vec::with_capacity(us.len() * vs.len());
                for &su in &us {
                    for &sv in &vs {
                        let mut p = Point3::origin();
                        p[normal.index()] = offset;
                        p[u.index()] = su;
                        p[v.index()] = sv;
                        points.push(p);
                    }
                }
                SamplePositions::new(vec![us.len(), vs.len()], points)
            }
            MonitorKind::Domain => {
                let [xs, ys, zs] = Direction::ALL.map(axis);
                let mut points = Vec::with_capacity(xs.len() * ys.len() * zs.len());
                for &x in &xs {
                    for &y in &ys {
                        for &z in &zs {
                            points.push(Point3::new(x, y, z));
                        }
                    }
                }
                SamplePositions::new(vec![xs.len(), ys.len(), zs.len()], points)
            }
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
