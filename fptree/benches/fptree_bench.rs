use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imgsig_fingerprint::{BitFingerprint, DEFAULT_WORDS};
use imgsig_fptree::{
    dedup_fingerprints, BuildConfig, Collection, FingerprintIndex, IndexConfig, Tree,
};

fn pseudo_random_fp(seed: u64) -> BitFingerprint {
    let mut state = seed;
    let words: Vec<u16> = (0..DEFAULT_WORDS)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 48) as u16
        })
        .collect();
    BitFingerprint::from_samples(&words)
}

fn collection(n: usize) -> Collection<BitFingerprint> {
    let mut c = Collection::new();
    for i in 0..n {
        c.push(format!("img{i:05}.jpg"), pseudo_random_fp(i as u64 + 1));
    }
    c
}

fn bench_dedup(c: &mut Criterion) {
    let input = collection(500);

    c.bench_function("fptree_dedup_500", |b| {
        b.iter(|| {
            let _ = black_box(dedup_fingerprints(black_box(input.clone())));
        });
    });
}

fn bench_build(c: &mut Criterion) {
    let input = collection(2_000);

    c.bench_function("fptree_build_exact_2000", |b| {
        b.iter(|| {
            let _ = black_box(Tree::build(black_box(&input)));
        });
    });

    // Random fingerprints all score close to 0.5 against each other, so a
    // wide band would copy almost every candidate to both sides.
    let small = collection(200);
    let narrow = BuildConfig::with_epsilon(0.005);
    c.bench_function("fptree_build_fuzzy_200", |b| {
        b.iter(|| {
            let _ = black_box(Tree::build_with(black_box(&small), &narrow));
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let input = collection(2_000);
    let member = input.entries()[1_234].fingerprint.clone();
    let stranger = pseudo_random_fp(999_999);
    let index = FingerprintIndex::build(input, &IndexConfig::default()).unwrap();

    c.bench_function("fptree_search_member_2000", |b| {
        b.iter(|| {
            let _ = black_box(index.search(black_box(&member)));
        });
    });

    c.bench_function("fptree_search_miss_2000", |b| {
        b.iter(|| {
            let _ = black_box(index.search(black_box(&stranger)));
        });
    });
}

criterion_group!(benches, bench_dedup, bench_build, bench_search);
criterion_main!(benches);
