mod common;

use std::f32::consts::TAU;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use plant_patterns::prelude::{rand01, RangeSet};

const ARC_COUNTS: [usize; 4] = [4, 8, 16, 32];

fn range_set_subtract_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("angular/subtract_until_empty");

    for &arcs in &ARC_COUNTS {
        let mut rng = common::bench_rng(arcs as u64);
        let arcs_list: Vec<(f32, f32)> = (0..arcs * 8)
            .map(|_| {
                let center = rand01(&mut rng) * TAU;
                let half = TAU / arcs as f32 * 0.5;
                (center - half, center + half)
            })
            .collect();
        group.throughput(common::elements_throughput(arcs_list.len()));

        group.bench_with_input(BenchmarkId::from_parameter(arcs), &arcs_list, |b, list| {
            b.iter_batched(
                RangeSet::full_circle,
                |mut set| {
                    for &(lo, hi) in list {
                        if set.is_empty() {
                            break;
                        }
                        set.subtract(lo, hi).expect("well-formed arc");
                    }
                    black_box(set.count());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = range_set_subtract_benches
}
criterion_main!(benches);
