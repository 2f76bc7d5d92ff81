use criterion::{black_box, criterion_group, criterion_main, Criterion};
use monthly_budget::{
    ledger::{Ledger, Partition, Row},
    storage::{decode, encode, mbf_backend},
    Aggregator,
};
use tempfile::tempdir;

const CATEGORIES: [&str; 4] = ["Food", "Rent", "Utility", "Clothing"];

fn build_sample_ledger(row_count: usize) -> Ledger {
    let mut ledger = Ledger::new();
    ledger.set_budget(2_500.0);
    for idx in 0..row_count {
        let partition = if idx % 4 == 0 {
            Partition::Fixed
        } else {
            Partition::Variable
        };
        let row = Row::new(
            format!("May {}", idx % 31 + 1),
            CATEGORIES[idx % CATEGORIES.len()],
            format!("Item {idx}"),
            format!("-{}.{:02}", idx % 90 + 1, idx % 100),
        );
        ledger.add_row(partition, row);
    }
    ledger
}

fn bench_codec(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let text = encode(&ledger);

    c.bench_function("encode_10k", |b| b.iter(|| black_box(encode(&ledger))));
    c.bench_function("decode_10k", |b| b.iter(|| black_box(decode(&text))));
}

fn bench_file_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ledger.mbf");

    c.bench_function("save_10k", |b| {
        b.iter(|| mbf_backend::save_to_path(&ledger, &path).expect("save ledger"))
    });

    mbf_backend::save_to_path(&ledger, &path).expect("seed");
    let defaults = ledger.categories().clone();
    c.bench_function("load_10k", |b| {
        b.iter(|| {
            let report = mbf_backend::load_from_path(&path, &defaults).expect("load ledger");
            black_box(report);
        })
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));

    c.bench_function("by_category_10k", |b| {
        b.iter(|| black_box(Aggregator::by_category(&ledger).expect("aggregate")))
    });
    c.bench_function("by_day_10k", |b| {
        b.iter(|| {
            black_box(
                Aggregator::by_day_in_month(&ledger, "Food", Partition::Variable, 31)
                    .expect("aggregate"),
            )
        })
    });
}

criterion_group!(benches, bench_codec, bench_file_io, bench_aggregation);
criterion_main!(benches);
