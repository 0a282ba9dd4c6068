use atlas_core::{Corpus, Engine, MatchStrategy, NarrationRecord, SearchOptions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const WORDS: &[&str] = &[
    "إنما", "الأعمال", "بالنيات", "وإنما", "لكل", "امرئ", "ما", "نوى", "من", "كذب", "علي",
    "متعمدا", "فليتبوأ", "مقعده", "النار", "الصلاة", "الزكاة", "الصيام", "جنة", "الدين",
    "النصيحة", "قال", "رسول", "الله",
];

fn random_matn(rng: &mut StdRng) -> String {
    let len = rng.gen_range(4..30);
    (0..len)
        .map(|_| *WORDS.choose(rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_corpus(count: usize) -> Corpus {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|idx| {
            NarrationRecord::new(
                format!("u{}", idx % 500),
                "bench",
                idx.to_string(),
                format!("حدثنا راوي{} عن شيخ{}", idx % 13, idx % 5),
                random_matn(&mut rng),
            )
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let engine = Engine::new(build_corpus(10_000));
    let mut group = c.benchmark_group("search");

    for (name, options) in [
        ("core", SearchOptions::default()),
        ("loose", SearchOptions::loose()),
    ] {
        group.bench_function(BenchmarkId::new(name, engine.corpus().len()), |b| {
            b.iter(|| engine.search("إنما الأعمال بالنيات وإنما لكل امرئ ما نوى", &options))
        });
    }

    group.bench_function(BenchmarkId::new("analyze_unit", 20), |b| {
        b.iter(|| engine.analyze_unit("u7", &MatchStrategy::core()))
    });

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
