use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use trellis_core::{BBox, PageObjects, TableSettings, Word, extract_tables};

/// Build an n x n ruled grid with one word per cell, with slight jitter
/// on the line coordinates so snapping and joining do real work.
fn grid_page(n: usize) -> PageObjects {
    let cell = 20.0;
    let size = cell * n as f64;
    let mut lines = Vec::new();
    let mut words = Vec::new();
    for i in 0..=n {
        let c = cell * i as f64;
        let jitter = if i % 2 == 0 { 0.4 } else { -0.4 };
        lines.push(((c + jitter, 0.0), (c + jitter, size)));
        lines.push(((0.0, c + jitter), (size, c + jitter)));
    }
    for row in 0..n {
        for col in 0..n {
            let x0 = cell * col as f64 + 4.0;
            let top = cell * row as f64 + 4.0;
            words.push(Word {
                text: format!("r{row}c{col}"),
                x0,
                x1: x0 + 10.0,
                top,
                bottom: top + 8.0,
            });
        }
    }
    PageObjects {
        bbox: BBox {
            x0: 0.0,
            top: 0.0,
            x1: size,
            bottom: size,
        },
        lines,
        words,
        ..PageObjects::default()
    }
}

fn bench_table_extract(c: &mut Criterion) {
    let settings = TableSettings::default();

    let mut group = c.benchmark_group("table_extract_tables");
    for n in [5usize, 20, 50] {
        let page = grid_page(n);
        group.bench_with_input(BenchmarkId::new("grid", n), &page, |b, page| {
            b.iter(|| {
                let tables = extract_tables(page, &settings).expect("valid settings");
                black_box(tables.len());
            })
        });
    }
    group.finish();
}

fn bench_text_strategy(c: &mut Criterion) {
    let settings = TableSettings {
        vertical_strategy: "text".to_string(),
        horizontal_strategy: "text".to_string(),
        min_words_horizontal: 2,
        ..TableSettings::default()
    };

    let mut group = c.benchmark_group("table_text_strategy");
    for n in [5usize, 20] {
        let mut page = grid_page(n);
        page.lines.clear();
        group.bench_with_input(BenchmarkId::new("words", n), &page, |b, page| {
            b.iter(|| {
                let tables = extract_tables(page, &settings).expect("valid settings");
                black_box(tables.len());
            })
        });
    }
    group.finish();
}

criterion_group!(table_benches, bench_table_extract, bench_text_strategy);
criterion_main!(table_benches);
