//! Criterion benchmarks for u-cnp.
//!
//! Uses synthetic random graphs with a fixed generator seed so the inputs
//! are identical across runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_cnp::graph::{ProblemData, ProblemType};
use u_cnp::memetic::MemeticSearch;
use u_cnp::random::create_rng;
use u_cnp::search::{LocalSearch, SearchConfig, SearchStrategy};
use u_cnp::stop::MaxIterations;

// ===========================================================================
// Synthetic instances
// ===========================================================================

/// Sparse random graph: a spanning path plus `extra` random chords.
fn random_graph(n: usize, extra: usize, seed: u64) -> ProblemData {
    let mut rng = create_rng(seed);
    let mut data = ProblemData::with_nodes(n);
    for v in 1..n {
        data.add_edge(v - 1, v);
    }
    for _ in 0..extra {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        data.add_edge(u, v);
    }
    data
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");
    group.sample_size(10);

    for &n in &[100usize, 250] {
        let data = random_graph(n, n / 2, 42);
        let budget = n / 10;
        let cnp = data.create_original_graph(ProblemType::Cnp, budget, 1).unwrap();
        let dcnp = data.create_original_graph(ProblemType::Dcnp, budget, 3).unwrap();

        for (strategy, original) in [
            (SearchStrategy::Cbns, &cnp),
            (SearchStrategy::Chns, &cnp),
            (SearchStrategy::Dlas, &cnp),
            (SearchStrategy::Bcls, &dcnp),
        ] {
            let search = LocalSearch::new(strategy).with_config(SearchConfig::for_strategy(strategy).with_max_idle_steps(100));
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), n), original, |b, g| {
                b.iter(|| {
                    let mut start = g.random_feasible_graph(&mut create_rng(7));
                    black_box(search.run(&mut start, 7).unwrap())
                })
            });
        }
    }
    group.finish();
}

fn bench_memetic_cnp(c: &mut Criterion) {
    let mut group = c.benchmark_group("memetic_cnp");
    group.sample_size(10);

    for &n in &[100usize, 200] {
        let data = random_graph(n, n / 2, 42);
        let search = MemeticSearch::builder(&data)
            .problem_type("CNP")
            .budget(n / 10)
            .seed(42)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &search, |b, s| {
            b.iter(|| {
                let mut stop = MaxIterations::new(10).unwrap();
                black_box(s.run(&mut stop, false, false).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_local_search, bench_memetic_cnp);
criterion_main!(benches);
