//! Criterion benchmarks for Primer.
//!
//! Covers tag selection, morphological analysis and inflection, and FastTree
//! training and scoring.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use primer::data::view::{Column, DataView};
use primer::ml::fast_tree::{FastTreeOptions, FastTreeRegressionTrainer};
use primer::ml::pipeline::Transformer;
use primer::morphology::analyzer::Analyzer;
use primer::morphology::dictionary::ParadigmAnalyzer;
use primer::morphology::full_name::{FullName, FullNameInflector};
use primer::morphology::grammeme::{Category, case, gender, number, post};
use primer::morphology::selector::{by_power_ascending, has_gram, select_tag};
use primer::morphology::tag::Tag;
use std::hint::black_box;

/// Generate candidate tags with varying genders and powers.
fn generate_candidates(count: usize) -> Vec<Tag> {
    let genders = [gender::MASCULINE, gender::FEMININE, gender::NEUTER];
    (0..count)
        .map(|i| {
            Tag::builder()
                .post(post::NOUN)
                .gender(genders[i % genders.len()])
                .power(((i * 37) % 101) as f32 / 101.0)
                .build()
                .unwrap()
        })
        .collect()
}

/// Generate a regression data set with a few informative features.
fn generate_regression_data(rows: usize, features: usize) -> DataView {
    let vectors: Vec<Vec<f32>> = (0..rows)
        .map(|i| {
            (0..features)
                .map(|j| ((i * 31 + j * 17) % 97) as f32 * 0.1)
                .collect()
        })
        .collect();
    let labels: Vec<f32> = vectors
        .iter()
        .map(|v| 3.0 * v[0] + v[1] * v[1] + 2.0)
        .collect();

    DataView::new()
        .with_column("Label", Column::Number(labels))
        .unwrap()
        .with_column("Features", Column::Vector(vectors))
        .unwrap()
}

/// Benchmark tag selection.
fn bench_tag_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_selection");

    let candidates = generate_candidates(64);
    group.throughput(Throughput::Elements(candidates.len() as u64));
    group.bench_function("select_masculine_lowest_power", |b| {
        b.iter(|| {
            let tag = select_tag(
                black_box(&candidates),
                has_gram(Category::Gender, gender::MASCULINE),
                by_power_ascending,
            );
            black_box(tag.is_ok())
        })
    });

    group.finish();
}

/// Benchmark analysis and full-name inflection.
fn bench_morphology(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology");

    let analyzer = ParadigmAnalyzer::russian().unwrap();
    let words = ["Марковцом", "Дмитрий", "Олегович", "Зыкин", "Даниил"];

    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("parse_words", |b| {
        b.iter(|| black_box(analyzer.parse(black_box(&words)).unwrap()))
    });

    let inflector = FullNameInflector::new();
    let full_name = FullName::new("Марковцом", "Дмитрий", "Олегович");
    let dative = Tag::builder()
        .post(post::NOUN)
        .gender(gender::MASCULINE)
        .number(number::SINGULAR)
        .case(case::DATIVE)
        .build()
        .unwrap();
    group.bench_function("inflect_full_name", |b| {
        b.iter(|| {
            black_box(
                inflector
                    .inflect(&analyzer, black_box(&full_name), &dative)
                    .unwrap(),
            )
        })
    });

    group.finish();
}

/// Benchmark FastTree training and scoring.
fn bench_fast_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_tree");
    group.sample_size(10); // Training is slow

    let data = generate_regression_data(2000, 8);
    let trainer = FastTreeRegressionTrainer::new(FastTreeOptions {
        number_of_trees: 20,
        ..FastTreeOptions::default()
    });

    group.throughput(Throughput::Elements(data.num_rows() as u64));
    group.bench_function("train_20_trees", |b| {
        b.iter(|| black_box(trainer.train(black_box(&data)).unwrap()))
    });

    let model = trainer.train(&data).unwrap();
    group.throughput(Throughput::Elements(data.num_rows() as u64));
    group.bench_function("score_rows", |b| {
        b.iter(|| black_box(model.transform(black_box(&data)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_tag_selection, bench_morphology, bench_fast_tree);

criterion_main!(benches);
