use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reelmatch_core::{Artifacts, CatalogRecord, EngineConfig, Recommender, RecommenderConfig};

const ROWS: usize = 8_000;
const DIM: usize = 384;

fn build(parallel_threshold: usize) -> Recommender {
    let mut rng = oorandom::Rand32::new(0x5eed);
    let artifacts = Artifacts {
        catalog: (0..ROWS)
            .map(|i| CatalogRecord::new(format!("Title Number {i}")))
            .collect(),
        embeddings: (0..ROWS)
            .map(|_| (0..DIM).map(|_| rng.rand_float() - 0.5).collect())
            .collect(),
        title_to_index: None,
    };
    let config = RecommenderConfig::new()
        .with_engine(EngineConfig::new().with_parallel_threshold(parallel_threshold));
    Recommender::new(artifacts, config).unwrap()
}

fn bench_recommend(c: &mut Criterion) {
    let sequential = build(usize::MAX);
    let parallel = build(1);

    c.bench_function("recommend_top12_sequential", |b| {
        b.iter(|| sequential.recommend(black_box("title number 4242"), 12));
    });

    c.bench_function("recommend_top12_parallel", |b| {
        b.iter(|| parallel.recommend(black_box("title number 4242"), 12));
    });

    c.bench_function("suggest_misspelled", |b| {
        b.iter(|| sequential.suggest(black_box("titel numbr 4242")));
    });
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
