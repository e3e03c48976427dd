//! Performance benchmarks for planarity testing.
//!
//! Run with: `cargo bench --bench embedding`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Grid embedding | Linear in V | Sparse, many short back edges |
//! | Triangulation embedding | Linear in V | E = 3V - 6 |
//! | Non-planar rejection | Linear in V | Euler bound disabled |
//! | Cached test | Independent of V | LRU cache hit, fingerprint dominates |

use criterion::{
    black_box, criterion_group, criterion_main,
    BenchmarkId, Criterion, Throughput,
};

use planarity_kernel::{
    CacheConfig, CachedTester, InMemoryGraph, PlanarityPolicyV1, PlanarityTester, VertexId,
};

/// Square grid graph of `side` x `side` vertices.
fn grid(side: u32) -> InMemoryGraph {
    let id = |r: u32, c: u32| r * side + c;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                edges.push((id(r, c), id(r, c + 1)));
            }
            if r + 1 < side {
                edges.push((id(r, c), id(r + 1, c)));
            }
        }
    }
    InMemoryGraph::from_edges(edges).unwrap()
}

/// Grid with one diagonal per cell: a triangulated disk.
fn triangulated_grid(side: u32) -> InMemoryGraph {
    let mut graph = grid(side);
    for r in 0..side - 1 {
        for c in 0..side - 1 {
            graph
                .add_edge(VertexId::new(r * side + c), VertexId::new((r + 1) * side + c + 1))
                .unwrap();
        }
    }
    graph
}

/// Triangulated grid closed off by an apex over its boundary (a maximal
/// planar graph), plus one more edge.
fn non_planar_grid(side: u32) -> InMemoryGraph {
    let mut graph = triangulated_grid(side);
    let apex = VertexId::new(side * side);
    for r in 0..side {
        for c in 0..side {
            if r == 0 || c == 0 || r + 1 == side || c + 1 == side {
                graph.add_edge(apex, VertexId::new(r * side + c)).unwrap();
            }
        }
    }
    graph.add_edge(VertexId::new(0), VertexId::new(2 * side + 2)).unwrap();
    graph
}

fn bench_planar(c: &mut Criterion) {
    let tester = PlanarityTester::default();
    let mut group = c.benchmark_group("planar");

    for side in [8u32, 16, 32, 64] {
        let vertices = u64::from(side * side);
        for (name, graph) in [("grid", grid(side)), ("triangulated", triangulated_grid(side))] {
            group.throughput(Throughput::Elements(vertices));
            group.bench_with_input(BenchmarkId::new(name, side), &graph, |b, graph| {
                b.iter(|| {
                    let outcome = tester.test(black_box(graph), VertexId::new(0)).unwrap();
                    assert!(outcome.is_planar());
                    outcome
                })
            });
        }
    }

    group.finish();
}

/// Embedding self-check cost.
fn bench_verification_overhead(c: &mut Criterion) {
    let graph = triangulated_grid(32);
    let mut group = c.benchmark_group("verify_embedding");

    for verify in [false, true] {
        let tester = PlanarityTester::new(PlanarityPolicyV1::new(true, verify, None));
        group.bench_with_input(BenchmarkId::new("verify", verify), &graph, |b, graph| {
            b.iter(|| tester.test(black_box(graph), VertexId::new(0)).unwrap())
        });
    }

    group.finish();
}

fn bench_non_planar(c: &mut Criterion) {
    let tester = PlanarityTester::new(PlanarityPolicyV1::exhaustive());
    let mut group = c.benchmark_group("non_planar");

    for side in [8u32, 16, 32, 64] {
        let graph = non_planar_grid(side);
        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::new("triangulated_plus_edge", side), &graph, |b, graph| {
            b.iter(|| {
                let outcome = tester.test(black_box(graph), VertexId::new(0)).unwrap();
                assert!(!outcome.is_planar());
                outcome
            })
        });
    }

    group.finish();
}

/// Cached test (cache hit).
fn bench_cached(c: &mut Criterion) {
    let tester = CachedTester::new(PlanarityTester::default(), CacheConfig::default());
    let mut group = c.benchmark_group("cached");

    for side in [8u32, 32] {
        let graph = triangulated_grid(side);

        // Warm the cache
        assert!(!tester.test(&graph, VertexId::new(0)).unwrap().cache_hit);

        group.bench_with_input(BenchmarkId::new("hit", side), &graph, |b, graph| {
            b.iter(|| {
                let result = tester.test(black_box(graph), VertexId::new(0)).unwrap();
                assert!(result.cache_hit);
                result
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_planar,
    bench_verification_overhead,
    bench_non_planar,
    bench_cached,
);
criterion_main!(benches);
