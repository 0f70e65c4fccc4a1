//! Criterion benchmarks for operator dispatch.
//!
//! Measures resolution cost on a synthetic hierarchy: exact and memoized
//! hits, first-time misses that scan predicates and ancestors, and
//! selector-backed resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use u_genop::dispatch::{OperatorDispatcher, Wiring};
use u_genop::genotype::{Genotype, GenotypeHierarchy, GenotypeId, Variant};
use u_genop::operator::{Operator, OperatorKind, OperatorPredicate};
use u_genop::selection::{OperatorSelector, RandomSelector, SelectorKey};

struct BenchOp {
    name: String,
    target: String,
}

impl Operator for BenchOp {
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> OperatorKind {
        OperatorKind::MUTATE
    }
    fn target(&self) -> &str {
        &self.target
    }
}

struct BenchGenotype {
    id: GenotypeId,
    variant: Variant,
}

impl Genotype for BenchGenotype {
    fn variant(&self) -> Variant {
        self.variant
    }
    fn id(&self) -> GenotypeId {
        self.id
    }
}

/// A chain `Genotype <- L1 <- L2 <- ... <- Ldepth` plus a composite.
fn chain(depth: usize) -> (Arc<GenotypeHierarchy>, Vec<Variant>) {
    let mut builder = GenotypeHierarchy::builder("bench.Genotype");
    let mut parent = builder.root();
    let mut levels = vec![parent];
    for i in 1..=depth {
        parent = builder.add(&format!("bench.L{i}"), parent).unwrap();
        levels.push(parent);
    }
    builder.add_composite("bench.Composite", builder.root()).unwrap();
    (Arc::new(builder.build().unwrap()), levels)
}

fn dispatcher(
    hierarchy: &Arc<GenotypeHierarchy>,
    ops_on_root: usize,
    predicates: usize,
) -> OperatorDispatcher<BenchGenotype, BenchOp> {
    let mut wiring = Wiring::empty();
    for i in 0..ops_on_root {
        wiring = wiring.bind_all(
            OperatorPredicate::Void,
            vec![Arc::new(BenchOp {
                name: format!("op{i}"),
                target: "bench.Genotype".into(),
            })],
        );
    }
    for i in 0..predicates {
        wiring = wiring.bind(
            OperatorPredicate::custom(format!("never{i}"), |_: &BenchGenotype| false),
            Arc::new(BenchOp {
                name: format!("pred{i}"),
                target: "bench.Genotype".into(),
            }),
        );
    }
    let d = OperatorDispatcher::new(OperatorKind::MUTATE, Arc::clone(hierarchy), Vec::new());
    d.inject(&wiring).unwrap();
    d
}

fn bench_cache_hit(c: &mut Criterion) {
    let (hierarchy, levels) = chain(8);
    let d = dispatcher(&hierarchy, 1, 0);
    let g = BenchGenotype {
        id: GenotypeId::next(),
        variant: levels[8],
    };
    d.resolve(&g).unwrap();

    c.bench_function("dispatch_memoized_hit", |b| {
        b.iter(|| d.resolve(black_box(&g)).unwrap())
    });
}

fn bench_cache_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_first_miss");
    for depth in [4, 16, 64] {
        let (hierarchy, levels) = chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_with_setup(
                || dispatcher(&hierarchy, 1, 8),
                |d| {
                    let g = BenchGenotype {
                        id: GenotypeId::next(),
                        variant: levels[depth],
                    };
                    black_box(d.resolve(&g).unwrap())
                },
            )
        });
    }
    group.finish();
}

fn bench_selector(c: &mut Criterion) {
    let (hierarchy, levels) = chain(4);
    let d = dispatcher(&hierarchy, 4, 0);
    let selector: Arc<dyn OperatorSelector<BenchGenotype, BenchOp>> = Arc::new(RandomSelector::new(42));
    d.add_operator_selector(SelectorKey::new(levels[4], OperatorKind::MUTATE), selector);
    let g = BenchGenotype {
        id: GenotypeId::next(),
        variant: levels[4],
    };

    c.bench_function("dispatch_random_selector", |b| {
        b.iter(|| d.resolve(black_box(&g)).unwrap())
    });
}

criterion_group!(benches, bench_cache_hit, bench_cache_miss, bench_selector);
criterion_main!(benches);
