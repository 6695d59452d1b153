//! Performance benchmarks for the eddy-diffusion kernel
//!
//! Compares the two time integrators and the two image-truncation policies
//! on identical scenarios.
//!
//! # What We're Measuring
//!
//! 1. **Cumulative trapezoid**:
//!    - One impulse-response evaluation per time sample and grid point
//!    - Cost ∝ steps × points
//!
//! 2. **Adaptive quadrature** (adaptive Simpson):
//!    - Dozens of evaluations per time interval and grid point (minimum
//!      refinement depth 4), more near the peak of the response
//!    - Expect one to two orders of magnitude above the trapezoid
//!
//! 3. **Image truncation**:
//!    - Manual: fixed number of mirror pairs, cost independent of τ
//!    - Auto: pairs added until converged, cheap at small τ, up to the cap at
//!      large τ
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all kernel benchmarks
//! cargo bench --bench kernel_performance
//!
//! # Only the integrator comparison
//! cargo bench --bench kernel_performance integrator
//!
//! # Sequential kernels, for comparison with the default parallel build
//! cargo bench --bench kernel_performance --no-default-features
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::Point3;
use std::hint::black_box;

use disperse_rs::models::{
    DiffusionCoefficient, EddyDiffusion, ImageSeries, ImageTruncation, MonitorLocation, SourceTerm,
};
use disperse_rs::physics::{Direction, DispersionModel, TimeAxis, Volume};
use disperse_rs::solver::{AdaptiveQuadrature, CumulativeTrapezoid, TimeIntegrator};

// =================================================================================================
// Benchmark Setup
// =================================================================================================

fn room() -> Volume {
    Volume::new(4.0, 3.0, 2.5)
}

/// Continuous leak in a ventilated room
fn leak_model(integrator: Box<dyn TimeIntegrator>, truncation: ImageTruncation) -> EddyDiffusion {
    EddyDiffusion::new(
        room(),
        DiffusionCoefficient::explicit(0.05),
        0.1,
        vec![SourceTerm::continuous("leak", Point3::new(1.0, 1.5, 0.5), 1e-4, 0.0)],
    )
    .with_images(ImageSeries::new(truncation))
    .with_integrator(integrator)
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// Trapezoid vs quadrature over growing lines of points
///
/// # Test Configuration
///
/// - **Points**: 5, 20, 50 along a line through the room
/// - **Time samples**: 60 over 120 s
/// - **Images**: 3 manual pairs, so only the integrator differs
fn benchmark_integrators(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrator");
    group.sample_size(20);

    let time = TimeAxis::new(120.0, 60);

    for points in [5usize, 20, 50] {
        let line = MonitorLocation::line("corridor", Direction::X, 1.5, 1.0)
            .positions(&room(), [points, 1, 1]);
        group.throughput(Throughput::Elements((points * time.samples) as u64));

        let trapezoid = leak_model(Box::new(CumulativeTrapezoid), ImageTruncation::Manual { pairs: 3 });
        group.bench_with_input(BenchmarkId::new("trapezoid", points), &line, |b, line| {
            b.iter(|| trapezoid.evaluate(black_box(&time), black_box(line)))
        });

        let quadrature = leak_model(Box::new(AdaptiveQuadrature::default()), ImageTruncation::Manual { pairs: 3 });
        group.bench_with_input(BenchmarkId::new("quadrature", points), &line, |b, line| {
            b.iter(|| quadrature.evaluate(black_box(&time), black_box(line)))
        });
    }

    group.finish();
}

/// Manual vs automatic image truncation on a full room lattice
///
/// # Test Configuration
///
/// - **Lattice**: 6 × 6 × 6 points
/// - **Time samples**: 30, 120 and 480 over 600 s, so τ reaches the regime
///   where the automatic series needs many pairs
fn benchmark_image_truncation(c: &mut Criterion) {
    let mut group = c.benchmark_group("images");
    group.sample_size(20);

    let domain = MonitorLocation::domain("room").positions(&room(), [6, 6, 6]);

    for samples in [30usize, 120, 480] {
        let time = TimeAxis::new(600.0, samples);
        group.throughput(Throughput::Elements((domain.len() * samples) as u64));

        for (label, truncation) in [
            ("manual-1", ImageTruncation::Manual { pairs: 1 }),
            ("manual-5", ImageTruncation::Manual { pairs: 5 }),
            ("auto", ImageTruncation::Auto),
        ] {
            let model = leak_model(Box::new(CumulativeTrapezoid), truncation);
            group.bench_with_input(BenchmarkId::new(label, samples), &domain, |b, domain| {
                b.iter(|| model.evaluate(black_box(&time), black_box(domain)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_integrators, benchmark_image_truncation);
criterion_main!(benches);
