//! Benchmarks for the discovery engines.
//!
//! Run with `cargo bench`. Corpora are generated from a fixed seed so runs
//! are comparable.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use falcata::autocomplete::AutocompleteEngine;
use falcata::recommend::find_neighbors;
use falcata::spelling::{SpellingDictionary, SpellingSuggester, edit_distance, fuzzy_match};
use falcata::vector::{Document, semantic_search};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

fn random_word(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let len = rng.random_range(min_len..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

fn random_words(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count).map(|_| random_word(&mut rng, 3, 12)).collect()
}

fn random_documents(count: usize, dimension: usize) -> Vec<Document> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let embedding = (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect();
            Document::new(format!("doc-{i}"), embedding)
        })
        .collect()
}

fn bench_autocomplete(c: &mut Criterion) {
    let mut group = c.benchmark_group("autocomplete");

    for size in [1_000, 10_000, 100_000] {
        let words = random_words(size);
        let mut engine = AutocompleteEngine::new();
        for (i, word) in words.iter().enumerate() {
            engine.insert(word, (i % 100) as u64 + 1);
        }

        group.bench_with_input(BenchmarkId::new("suggest", size), &engine, |b, engine| {
            b.iter(|| engine.suggest(black_box("ab"), 10).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("suggest_by_frequency", size),
            &engine,
            |b, engine| b.iter(|| engine.suggest_by_frequency(black_box("ab"), 10).unwrap()),
        );
    }

    group.bench_function("insert_10000", |b| {
        let words = random_words(10_000);
        b.iter(|| {
            let mut engine = AutocompleteEngine::new();
            for word in &words {
                engine.insert(word, 1);
            }
            engine
        })
    });

    group.finish();
}

fn bench_edit_distance(c: &mut Criterion) {
    let words = random_words(1_000);
    let mut group = c.benchmark_group("edit_distance");
    group.throughput(Throughput::Elements(words.len() as u64));

    group.bench_function("edit_distance", |b| {
        b.iter(|| {
            for word in &words {
                black_box(edit_distance(black_box("distance"), word));
            }
        })
    });
    group.bench_function("fuzzy_match", |b| {
        b.iter(|| fuzzy_match(black_box("distance"), &words, 3))
    });

    let suggester = SpellingSuggester::new(SpellingDictionary::from_words(
        words.iter().map(|word| (word, 1)),
    ));
    group.bench_function("spelling_suggest", |b| {
        b.iter(|| suggester.suggest(black_box("distanse")))
    });

    group.finish();
}

fn bench_semantic_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("semantic_search");

    for (count, dimension) in [(1_000, 128), (10_000, 128), (10_000, 384)] {
        let corpus = random_documents(count, dimension);
        let query = random_documents(1, dimension).remove(0).embedding;

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("dim{dimension}"), count),
            &corpus,
            |b, corpus| b.iter(|| semantic_search(black_box(&query), corpus, 10).unwrap()),
        );
    }

    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let matrix: Vec<Vec<f32>> = (0..1_000)
        .map(|_| {
            (0..50)
                .map(|_| {
                    if rng.random_bool(0.3) {
                        rng.random_range(1..=5) as f32
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    c.bench_function("find_neighbors_1000x50", |b| {
        b.iter(|| find_neighbors(black_box(0), &matrix, 10).unwrap())
    });
}

criterion_group!(
    benches,
    bench_autocomplete,
    bench_edit_distance,
    bench_semantic_search,
    bench_neighbors
);
criterion_main!(benches);
