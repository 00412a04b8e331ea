// Throughput of the two hot stages: TF-IDF fitting and the dense cosine matrix
use cinesim_core::{Corpus, ItemId};
use cinesim_similarity::SimilarityEngine;
use cinesim_text::{TfidfVectorizer, Tokenizer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

const WORDS: &[&str] = &[
    "heist", "bank", "crew", "detective", "murder", "space", "station", "orbit", "alien",
    "planet", "love", "wedding", "family", "war", "soldier", "island", "treasure", "pirate",
    "school", "professor", "dragon", "kingdom", "robot", "future", "city", "night", "ghost",
    "house", "road", "trip", "music", "band", "prison", "escape", "ocean", "storm",
];

fn generate_corpus(size: usize, words_per_doc: usize) -> Corpus {
    let mut rng = rand::rng();
    let ids = (0..size as u64).map(ItemId::Integer).collect();
    let documents = (0..size)
        .map(|_| {
            (0..words_per_doc)
                .map(|_| *WORDS.choose(&mut rng).unwrap())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Corpus::from_parts(ids, documents).unwrap()
}

fn benchmark_vectorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorize");
    let vectorizer = TfidfVectorizer::new(Tokenizer::default(), 5000).unwrap();

    for size in [100, 1000, 5000].iter() {
        let corpus = generate_corpus(*size, 40);
        group.bench_with_input(BenchmarkId::new("tfidf", size), &corpus, |b, corpus| {
            b.iter(|| black_box(vectorizer.fit_transform(corpus)));
        });
    }

    group.finish();
}

fn benchmark_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    group.sample_size(10);
    let vectorizer = TfidfVectorizer::new(Tokenizer::default(), 5000).unwrap();

    for size in [100, 1000, 2000].iter() {
        let weights = vectorizer.fit_transform(&generate_corpus(*size, 40));
        for (name, parallel) in [("parallel", true), ("sequential", false)] {
            let engine = SimilarityEngine::new(parallel);
            group.bench_with_input(BenchmarkId::new(name, size), &weights, |b, weights| {
                b.iter(|| black_box(engine.compute(weights).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_vectorize, benchmark_similarity);
criterion_main!(benches);
