//! Performance benchmarks for ccml
//!
//! Run with: cargo bench

use ccml::charset::compare_search;
use ccml::index::{address_of, DatabaseWriter, MethodReader};
use ccml::ringing::Method;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Cursor;
use tempfile::TempDir;

const WORDS: [&str; 12] = [
    "Bristol", "Cambridge", "Double", "Grandsire", "Kent", "London",
    "Norwich", "Plain", "Stedman", "Superlative", "Yorkshire", "Zanzibar",
];

/// Synthetic Major methods with two-word titles
fn sample_methods(count: usize) -> Vec<Method> {
    (0..count)
        .map(|i| Method {
            title: format!("{} {} {}", WORDS[i % WORDS.len()], WORDS[(i / 7) % WORDS.len()], i)
                .into_bytes(),
            stage: 8,
            notation: vec![0, 0b1000_0001],
            lead_count: 8,
            hunt_bells: 0,
        })
        .collect()
}

fn database(count: usize, depth: u8) -> Vec<u8> {
    let mut out = Vec::new();
    DatabaseWriter::new(8, depth)
        .write(&mut out, &sample_methods(count))
        .expect("Failed to write database");
    out
}

fn bench_compare(c: &mut Criterion) {
    let title = b"Yorkshire Surprise Major";
    let mut group = c.benchmark_group("compare_search");
    for key in ["y", "yorkshire s", "Yorkshire Surprise Major", "Zzz"] {
        group.bench_with_input(BenchmarkId::from_parameter(key), &key, |b, &k| {
            b.iter(|| compare_search(black_box(k.as_bytes()), black_box(title)))
        });
    }
    group.finish();
}

fn bench_addressing(c: &mut Criterion) {
    let mut group = c.benchmark_group("address_of");
    for depth in [1u32, 3, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &d| {
            b.iter(|| address_of(black_box(b"Cambridge Surprise"), d))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    // Deeper tables shorten the linear scan
    for depth in [0u8, 1, 2, 3] {
        let mut reader = MethodReader::from_source(Cursor::new(database(5000, depth)))
            .expect("Failed to open database");
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, _| {
            b.iter(|| reader.search(black_box(b"Stedman Kent")))
        });
    }
    group.finish();
}

fn bench_mapped_file(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("methods-8.ccml");
    DatabaseWriter::for_count(8, 20_000)
        .write_file(&path, &sample_methods(20_000))
        .expect("Failed to write database");

    c.bench_function("open_and_search", |b| {
        b.iter(|| {
            let mut reader = MethodReader::default();
            reader.open_path(black_box(&path))?;
            let offset = reader.search(b"London Plain")?;
            reader.read_method_at(offset)
        })
    });
}

criterion_group!(
    benches,
    bench_compare,
    bench_addressing,
    bench_search,
    bench_mapped_file,
);

criterion_main!(benches);
