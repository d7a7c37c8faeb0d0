use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use eegset::mat::{parse_mat, MatArray, MatWriter};
use eegset::load_seizure;

/// A 1×N struct array shaped like a seizure feature file.
fn seizure_bytes(n_windows: usize, n_features: usize, compress: bool) -> Vec<u8> {
    let elements = (0..n_windows)
        .map(|i| {
            let fv: Vec<f64> = (0..n_features).map(|j| (i * n_features + j) as f64 * 0.01).collect();
            vec![
                MatArray::row(&fv),
                MatArray::scalar((i % 2) as f64),
                MatArray::scalar((i / 10) as f64),
            ]
        })
        .collect();
    let mut w = MatWriter::new().compressed(compress);
    w.add("data", MatArray::struct_row(&["fv", "label", "Seizure"], elements));
    w.to_bytes().unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let raw = seizure_bytes(1000, 64, false);
    c.bench_function("parse_mat [1000 windows × 64]", |b| {
        b.iter(|| black_box(parse_mat(black_box(&raw)).unwrap().variables.len()))
    });

    let z = seizure_bytes(1000, 64, true);
    c.bench_function("parse_mat compressed [1000 windows × 64]", |b| {
        b.iter(|| black_box(parse_mat(black_box(&z)).unwrap().variables.len()))
    });
}

fn bench_load_seizure(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DV19_EEG_10sec_gmi_th=1.mat");
    std::fs::write(&path, seizure_bytes(1000, 64, true)).unwrap();
    c.bench_function("load_seizure [1000 windows × 64]", |b| {
        b.iter(|| black_box(load_seizure(black_box(&path), 3).unwrap().n_windows()))
    });
}

criterion_group!(benches, bench_parse, bench_load_seizure);
criterion_main!(benches);
