//! Render-path benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heapwatch::{
    render_report, PauseHistory, ReportOptions, SampleStyle, SyntheticHeap, Workload,
    WorkloadConfig,
};

fn wrapped_history() -> PauseHistory {
    let mut ring = PauseHistory::new();
    for seq in 1..=1000u64 {
        ring.record(seq, seq * 1_000);
    }
    ring
}

fn benchmark_history_render(c: &mut Criterion) {
    let ring = wrapped_history();

    c.bench_function("history_render_full", |b| {
        b.iter(|| black_box(ring.render("PauseNs", 1000, None, SampleStyle::Duration)))
    });

    c.bench_function("history_render_capped_8", |b| {
        b.iter(|| black_box(ring.render("PauseNs", 1000, Some(8), SampleStyle::Duration)))
    });
}

fn benchmark_full_report(c: &mut Criterion) {
    let config = WorkloadConfig {
        batch_size: 500,
        seed: 3,
        ..WorkloadConfig::default()
    };
    let mut heap = SyntheticHeap::new(&config).expect("valid config");
    let mut workload = Workload::new(&config);
    for _ in 0..500 {
        workload.step(&mut heap);
    }
    let snapshot = heap.snapshot();
    let options = ReportOptions {
        overhead: true,
        ..ReportOptions::default()
    };

    c.bench_function("render_full_report", |b| {
        b.iter(|| black_box(render_report(&snapshot, &options)))
    });
}

criterion_group!(benches, benchmark_history_render, benchmark_full_report);
criterion_main!(benches);
