//! Eddy-diffusion model with reflecting walls
//!
//! Spatially resolved closed-form solution of the diffusion equation in a
//! rectangular enclosure with no-flux walls and first-order removal by
//! fresh-air exchange.
//!
//! # Mathematical Background
//!
//! The response at position (x, y, z) to a unit mass released at
//! (sx, sy, sz) a time τ earlier is
//!
//! ```text
//! p(τ) = c(τ) · S(x, τ, Lx, sx) · S(y, τ, Ly, sy) · S(z, τ, Lz, sz)
//!
//! c(τ) = exp(−τ · Q / V) / (8 · (π · D · τ)^(3/2))
//! ```
//!
//! where `S` is the method-of-images series (see [`images`](crate::models::images)),
//! `Q` the fresh-air rate, `V` the volume and `D` the eddy diffusion
//! coefficient.
//!
//! # Source Superposition
//!
//! - **Instantaneous**: `mass · p(t − t_release)` for every `t > t_release`
//! - **Continuous**: `rate · ∫₀^(t − t_release) p(τ) dτ`, integrated by the
//!   configured [`TimeIntegrator`]
//! - **FixedDuration**: the continuous response started at `start_time`
//!   minus the continuous response started at `end_time`
//!
//! All contributions add into independent grid elements, so the order in
//! which sources are visited does not matter.
//!
//! # Singular Points
//!
//! Terms with `τ ≤ 0` are skipped. At the source position the response of
//! a continuous release diverges; whatever the integrator returns there
//! (large, infinite or NaN) is kept as data. The adaptive integrator warns
//! when it meets such a point.
//!
//! Image series that stop at the mirror-pair cap are counted per source and
//! reported with a single warning per evaluation.

use log::{debug, warn};
use nalgebra::Point3;
use ndarray::{Array2, ArrayD, IxDyn};
use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::diffusion::DiffusionCoefficient;
use crate::models::images::{ImageSeries, ImageSum, ImageTruncation, MAX_MIRROR_PAIRS};
use crate::models::source::{Emission, SourceTerm};
use crate::physics::{Direction, DispersionModel, SamplePositions, TimeAxis, Volume};
use crate::solver::{sample_response, CumulativeTrapezoid, ImpulseResponse, TimeIntegrator};

/// Eddy-diffusion dispersion model
#[derive(Debug)]
pub struct EddyDiffusion {
    volume: Volume,
    diffusion: DiffusionCoefficient,
    fresh_air_rate: f64,
    sources: Vec<SourceTerm>,
    images: ImageSeries,
    integrator: Box<dyn TimeIntegrator>,
}

impl EddyDiffusion {
    /// Create a model with automatic image truncation and trapezoidal time integration
    ///
    /// # Example
    ///
    /// ```rust
    /// use disperse_rs::models::{DiffusionCoefficient, EddyDiffusion, SourceTerm};
    /// use disperse_rs::physics::{DispersionModel, SamplePositions, TimeAxis, Volume};
    /// use nalgebra::Point3;
    ///
    /// let source = SourceTerm::instantaneous("puff", Point3::new(1.0, 1.0, 1.0), 1.0, 0.0);
    /// let model = EddyDiffusion::new(
    ///     Volume::new(3.0, 3.0, 3.0),
    ///     DiffusionCoefficient::explicit(0.1),
    ///     0.0,
    ///     vec![source],
    /// );
    ///
    /// let grid = model.evaluate(&TimeAxis::new(10.0, 5), &SamplePositions::single(Point3::new(1.0, 1.0, 1.0)));
    /// assert_eq!(grid.shape(), &[5]);
    /// ```
    pub fn new(
        volume: Volume,
        diffusion: DiffusionCoefficient,
        fresh_air_rate: f64,
        sources: Vec<SourceTerm>,
    ) -> Self {
        Self {
            volume,
            diffusion,
            fresh_air_rate,
            sources,
            images: ImageSeries::new(ImageTruncation::Auto),
            integrator: Box::new(CumulativeTrapezoid),
        }
    }

    /// Replace the image-series truncation policy
    pub fn with_images(mut self, images: ImageSeries) -> Self {
        self.images = images;
        self
    }

    /// Replace the time-integration strategy
    pub fn with_integrator(mut self, integrator: Box<dyn TimeIntegrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Prefactor `exp(−τ·Q/V) / (8·(π·D·τ)^(3/2))`
    pub fn coefficient(&self, tau: f64) -> f64 {
        let removal = (-tau * self.fresh_air_rate / self.volume.volume()).exp();
        removal / (8.0 * (PI * self.diffusion.value() * tau).powf(1.5))
    }

    /// Unit-mass response at the given coordinates, τ after release
    ///
    /// The coordinate slices hold the x, y and z components of the same
    /// points and must have equal length. Returns zeros for `τ ≤ 0`.
    ///
    /// `mirror_pairs` is the largest count over the three axes; the result is
    /// converged only if every axis is.
    pub fn pointwise(&self, source: &Point3<f64>, coordinates: [&[f64]; 3], tau: f64) -> ImageSum {
        let n = coordinates[0].len();
        if tau <= 0.0 {
            return ImageSum {
                values: vec![0.0; n],
                mirror_pairs: 0,
                converged: true,
            };
        }

        let spread = 4.0 * self.diffusion.value() * tau;
        let mut product = ImageSum {
            values: vec![self.coefficient(tau); n],
            mirror_pairs: 0,
            converged: true,
        };

        for direction in Direction::ALL {
            let axis = self.images.sum(
                coordinates[direction.index()],
                source[direction.index()],
                self.volume.length(direction),
                spread,
            );
            for (value, factor) in product.values.iter_mut().zip(axis.values) {
                *value *= factor;
            }
            product.mirror_pairs = product.mirror_pairs.max(axis.mirror_pairs);
            product.converged &= axis.converged;
        }

        product
    }

    /// Contribution of a single source, shape `[time, point]`, and the number
    /// of response samples whose image series was capped
    fn source_field(&self, source: &SourceTerm, time: &TimeAxis, coordinates: &[Vec<f64>; 3]) -> (Array2<f64>, usize) {
        let response = SourceResponse {
            model: self,
            position: source.position,
            coordinates,
            capped: AtomicUsize::new(0),
        };
        let dt = time.dt();

        let field = match source.emission {
            Emission::Instantaneous { mass, release_time } => {
                let elapsed = time.elapsed_since(release_time);
                let mut field = sample_response(&response, &elapsed);
                field *= mass;
                field
            }
            Emission::Continuous { rate, release_time } => {
                let elapsed = time.elapsed_since(release_time);
                let mut field = self.integrator.integrate(&response, &elapsed, dt);
                field *= rate;
                field
            }
            Emission::FixedDuration {
                rate,
                start_time,
                end_time,
            } => {
                let on = self.integrator.integrate(&response, &time.elapsed_since(start_time), dt);
                let off = self.integrator.integrate(&response, &time.elapsed_since(end_time), dt);
                (on - off) * rate
            }
        };

        (field, response.capped.into_inner())
    }
}

impl DispersionModel for EddyDiffusion {
    fn evaluate(&self, time: &TimeAxis, positions: &SamplePositions) -> ArrayD<f64> {
        let coordinates = Direction::ALL.map(|d| positions.coordinates(d));
        let mut field = Array2::<f64>::zeros((time.samples, positions.len()));

        for source in &self.sources {
            debug!(
                "eddy diffusion: {} source '{}' over {} points",
                source.emission.kind(),
                source.name,
                positions.len()
            );
            let (contribution, capped) = self.source_field(source, time, &coordinates);
            if capped > 0 {
                warn!(
                    "image series for source '{}' capped at {} mirror pairs in {} samples",
                    source.name, MAX_MIRROR_PAIRS, capped
                );
            }
            field += &contribution;
        }

        field
            .into_shape_with_order(IxDyn(&positions.grid_shape(time.samples)))
            .expect("grid shape matches the number of sample positions")
    }

    fn name(&self) -> &str {
        "Eddy Diffusion"
    }
}

/// Unit-mass response of one source at a fixed set of points
struct SourceResponse<'a> {
    model: &'a EddyDiffusion,
    position: Point3<f64>,
    coordinates: &'a [Vec<f64>; 3],
    capped: AtomicUsize,
}

impl SourceResponse<'_> {
    fn record(&self, sum: ImageSum) -> Vec<f64> {
        if !sum.converged {
            self.capped.fetch_add(1, Ordering::Relaxed);
        }
        sum.values
    }
}

impl ImpulseResponse for SourceResponse<'_> {
    fn len(&self) -> usize {
        self.coordinates[0].len()
    }

    fn sample(&self, tau: f64) -> Vec<f64> {
        let [x, y, z] = self.coordinates;
        self.record(self.model.pointwise(&self.position, [x.as_slice(), y.as_slice(), z.as_slice()], tau))
    }

    fn sample_point(&self, point: usize, tau: f64) -> f64 {
        let [x, y, z] = self.coordinates;
        let single = [&x[point..=point], &y[point..=point], &z[point..=point]];
        self.record(self.model.pointwise(&self.position, single, tau))[0]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
