use criterion::{black_box, criterion_group, criterion_main, Criterion};

use adaptest_core::config::EstimatorSettings;
use adaptest_core::estimator::{
    eap_estimate, estimate_ability, newton_raphson, EstimationInput, ScoredResponse,
};
use adaptest_core::irt::{information, probability_correct};
use adaptest_core::model::IrtParams;

fn make_responses(n: usize) -> Vec<ScoredResponse> {
    (0..n)
        .map(|i| ScoredResponse {
            correct: i % 3 != 0,
            irt: IrtParams {
                difficulty: -1.5 + (i % 12) as f64 * 0.25,
                discrimination: 1.0 + (i % 5) as f64 * 0.2,
                guessing: 0.2,
            },
        })
        .collect()
}

fn bench_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("irt");

    group.bench_function("probability_correct", |b| {
        b.iter(|| {
            probability_correct(
                black_box(0.3),
                black_box(0.0),
                black_box(1.5),
                black_box(0.25),
            )
        })
    });

    group.bench_function("information", |b| {
        b.iter(|| information(black_box(0.3), black_box(0.0), black_box(1.5), black_box(0.25)))
    });

    group.finish();
}

fn bench_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_ability");
    let settings = EstimatorSettings::default();

    for n in [5, 15, 30] {
        let responses = make_responses(n);
        group.bench_function(format!("responses={n}"), |b| {
            b.iter(|| {
                estimate_ability(
                    black_box(EstimationInput {
                        theta: 0.2,
                        initial_theta: 0.0,
                        responses: &responses,
                    }),
                    black_box(&settings),
                )
            })
        });
    }

    let responses = make_responses(30);
    group.bench_function("newton_raphson", |b| {
        b.iter(|| newton_raphson(black_box(0.0), black_box(&responses), 0.3, &settings))
    });

    group.bench_function("eap", |b| {
        b.iter(|| eap_estimate(black_box(&responses), black_box(0.0), &settings))
    });

    group.finish();
}

criterion_group!(benches, bench_model, bench_estimation);
criterion_main!(benches);
