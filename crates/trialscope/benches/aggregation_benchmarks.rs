//! Load and aggregation benchmarks.
//!
//! Measures typing a trials table and the per-interaction recomputations
//! (counts, explode, language summary, category view) across table sizes.

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use trialscope::aggregate::{
    count_categorical, explode_multi_value, parse_multi_value, summarize_language,
};
use trialscope::input::Parser;
use trialscope::{CategoryView, Column, Selector, TrialTable};

const CATEGORIES: [&str; 4] = [
    "Cancers",
    "Cardiovascular Diseases",
    "Metabolic & Weight-Related Disorders",
    "Neurocognitive & Mental Health",
];

/// Generate a synthetic trials CSV with the specified number of rows.
fn generate_trials(rows: usize) -> String {
    let mut data = String::from(
        "nct_id,category,sub_category,english_is_inclusion,non_english_is_exclusion,other_language_criteria,first_zipcode\n",
    );

    for row in 0..rows {
        let sub_category = match row % 4 {
            0 => "\"['Hypertension', 'Stroke']\"",
            1 => "Heart Failure",
            2 => "\"Atrial Fibrillation, Hypertension\"",
            _ => "",
        };
        let languages = match row % 3 {
            0 => "\"Spanish, Chinese\"",
            1 => "Spanish",
            _ => "",
        };
        data.push_str(&format!(
            "NCT{:08},{},{},{},{},{},{:05}\n",
            row,
            CATEGORIES[row % CATEGORIES.len()],
            sub_category,
            row % 2,
            (row / 2) % 2,
            languages,
            10_000 + row % 90_000
        ));
    }

    data
}

fn load(data: &str) -> TrialTable {
    let raw = Parser::new().parse_bytes(data.as_bytes(), b',').unwrap();
    TrialTable::from_raw(&raw, None).unwrap()
}

/// Benchmark parsing and typing tables of various sizes.
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_trials");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_trials(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(load(data)));
        });
    }

    group.finish();
}

/// Benchmark the aggregations run on every selection change.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for rows in [1_000, 10_000].iter() {
        let table = load(&generate_trials(*rows));
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("count_categorical", rows), &table, |b, t| {
            b.iter(|| black_box(count_categorical(t, Column::Category)));
        });
        group.bench_with_input(BenchmarkId::new("explode_sub_category", rows), &table, |b, t| {
            b.iter(|| black_box(explode_multi_value(t, Column::SubCategory, parse_multi_value)));
        });
        group.bench_with_input(BenchmarkId::new("summarize_language", rows), &table, |b, t| {
            b.iter(|| black_box(summarize_language(t)));
        });
        group.bench_with_input(BenchmarkId::new("category_view", rows), &table, |b, t| {
            let selector = Selector::Only("Cardiovascular Diseases".to_string());
            b.iter(|| black_box(CategoryView::build(t, &selector)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_aggregate);
criterion_main!(benches);
