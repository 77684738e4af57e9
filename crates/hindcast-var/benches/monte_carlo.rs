use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hindcast_core::ReturnSeries;
use hindcast_var::{MonteCarloConfig, SimulationSource, VarMethod, estimate_var};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use std::hint::black_box;

fn benchmark_series() -> ReturnSeries {
    let mut rng = StdRng::seed_from_u64(42);
    let values = (0..1000)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut rng);
            0.01 * z
        })
        .collect();
    ReturnSeries::from_values(values).expect("benchmark series should be valid")
}

fn bench_simulations(c: &mut Criterion) {
    let series = benchmark_series();
    let mut group = c.benchmark_group("monte_carlo_var");

    for source in [SimulationSource::Gaussian, SimulationSource::Bootstrap] {
        for simulations in [10_000, 100_000] {
            let method = VarMethod::MonteCarlo(MonteCarloConfig {
                simulations,
                source,
                ..Default::default()
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{source:?}"), simulations),
                &method,
                |b, method| {
                    b.iter(|| {
                        estimate_var(black_box(&series), 0.99, black_box(method), None)
                            .expect("estimate should succeed")
                            .latest()
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_horizon(c: &mut Criterion) {
    let series = benchmark_series();
    let mut group = c.benchmark_group("monte_carlo_horizon");

    for horizon in [1, 10, 20] {
        let method = VarMethod::MonteCarlo(MonteCarloConfig {
            horizon,
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &method, |b, method| {
            b.iter(|| {
                estimate_var(black_box(&series), 0.99, black_box(method), None)
                    .expect("estimate should succeed")
                    .latest()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulations, bench_horizon);
criterion_main!(benches);
