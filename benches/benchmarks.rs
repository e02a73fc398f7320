//! Benchmarks for lattice construction and merging.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use morphlattice::{BitVector, ContextConfig, ContextMatrix, ContextMatrixBuilder, MemorizingLattice};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// =============================================================================
// Fixtures
// =============================================================================

fn random_counts(contexts: usize, objects: usize, seed: u64) -> ContextMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = (0..contexts)
        .map(|_| {
            (0..objects)
                .map(|_| if rng.gen_bool(0.2) { rng.gen_range(1u32..10) as f64 } else { 0.0 })
                .collect()
        })
        .collect();
    ContextMatrix::from_rows(
        (0..contexts).map(|i| format!("c{}", i)),
        (0..objects).map(|i| format!("o{}", i)),
        rows,
    )
    .unwrap()
}

fn with_base_concepts(counts: ContextMatrix) -> MemorizingLattice {
    let mut lattice = MemorizingLattice::new(counts, 3.0);
    lattice.calculate_concepts().unwrap();
    lattice
}

// =============================================================================
// Kernel
// =============================================================================

fn benchmark_bit_ops(c: &mut Criterion) {
    let a = BitVector::from_indexes(1024, (0..1024).step_by(3));
    let b = BitVector::from_indexes(1024, (0..1024).step_by(5));

    c.bench_function("bits_and", |bench| bench.iter(|| black_box(&a).and(black_box(&b))));
    c.bench_function("bits_subset", |bench| {
        bench.iter(|| black_box(&a).is_subset_of(black_box(&b)))
    });
}

// =============================================================================
// Lattice
// =============================================================================

fn benchmark_base_concepts(c: &mut Criterion) {
    let counts = random_counts(120, 80, 7);

    c.bench_function("base_concepts_120x80", |b| {
        b.iter_batched(
            || MemorizingLattice::new(counts.clone(), 3.0),
            |mut lattice| {
                lattice.calculate_concepts().unwrap();
                lattice
            },
            BatchSize::SmallInput,
        )
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let base = with_base_concepts(random_counts(120, 80, 7));

    let mut group = c.benchmark_group("merge_120x80");
    for threshold in [0.0, 0.05, 0.2] {
        group.bench_function(format!("threshold_{}", threshold), |b| {
            b.iter_batched(
                || base.clone(),
                |mut lattice| {
                    lattice.calculate_superconcepts(black_box(threshold)).unwrap();
                    lattice
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

// =============================================================================
// Morphology
// =============================================================================

fn benchmark_context_extraction(c: &mut Criterion) {
    let words = [
        "hradINS(u)",
        "mDEL(ě)stoINS(a)",
        "INS(ne)chDEL(o)diINS(l)",
        "ženINS(ami)",
    ];

    c.bench_function("context_matrix_build", |b| {
        b.iter(|| {
            let mut builder = ContextMatrixBuilder::new(ContextConfig::default());
            for word in &words {
                builder.add_word(black_box(word)).unwrap();
            }
            builder.build().unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_bit_ops,
    benchmark_base_concepts,
    benchmark_merge,
    benchmark_context_extraction,
);

criterion_main!(benches);
