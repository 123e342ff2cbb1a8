//! Benchmarks for query buffer classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mosql_directive::classify;

/// Build a buffer with `plot_lines` directive lines followed by `sql_lines` of SQL
fn generate_buffer(plot_lines: usize, sql_lines: usize) -> String {
    let mut lines = Vec::with_capacity(plot_lines + sql_lines + 1);
    for i in 0..plot_lines {
        lines.push(format!("--!gnuplot set label {} 'point {}' at {},{}", i + 1, i, i, i * 2));
    }
    lines.push("--!text2sql revenue by nation and year".to_string());
    for i in 0..sql_lines {
        lines.push(format!("  union all select {} as year, sum(v) from t where y = {}", i, i));
    }
    lines.join("\n")
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [10, 100, 1_000, 10_000] {
        let buffer = generate_buffer(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &buffer, |b, buffer| {
            b.iter(|| classify(black_box(buffer)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
