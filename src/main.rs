use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use heapwatch::{
    display_limit, render_report, ReportOptions, SyntheticHeap, Workload, WorkloadConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "heapwatch",
    about = "Periodic human-readable runtime memory and GC reports"
)]
struct Cli {
    /// Collect when allocation since the last collection reaches this
    /// percentage of live data.
    #[arg(long, default_value_t = 100)]
    gc_percent: u32,

    /// Print the memory summary section.
    #[arg(short = 'm', long, default_value_t = true, action = ArgAction::Set)]
    memory: bool,

    /// Print the system overhead section.
    #[arg(short = 'o', long, default_value_t = false, action = ArgAction::Set)]
    overhead: bool,

    /// Print per-size-class allocation counters.
    #[arg(short = 'a', long, default_value_t = true, action = ArgAction::Set)]
    alloc_stats: bool,

    /// Print GC pause duration and pause-end history.
    #[arg(short = 'g', long, default_value_t = true, action = ArgAction::Set)]
    gc_stats: bool,

    /// Most recent pause entries to print (0 or less prints all).
    #[arg(long, default_value_t = 8)]
    pauses: i64,

    /// Seconds between reports.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Report ticks before exiting (0 runs until interrupted).
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Allocations per workload step.
    #[arg(long, default_value_t = 1500)]
    batch: usize,

    /// Workload RNG seed (0 picks one).
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.interval.is_finite() || cli.interval < 0.0 {
        bail!("interval must be a non-negative number of seconds");
    }

    let config = WorkloadConfig {
        growth_percent: cli.gc_percent,
        batch_size: cli.batch,
        seed: cli.seed,
        ..WorkloadConfig::default()
    };
    let options = ReportOptions {
        memory: cli.memory,
        overhead: cli.overhead,
        size_classes: cli.alloc_stats,
        gc_history: cli.gc_stats,
        history_limit: display_limit(cli.pauses),
    };

    let mut heap =
        SyntheticHeap::new(&config).context("invalid workload configuration")?;
    let mut workload = Workload::new(&config);

    tracing::info!(
        gc_percent = config.growth_percent,
        batch = config.batch_size,
        pauses = cli.pauses,
        "heapwatch starting"
    );

    run(&mut heap, &mut workload, &options, cli.interval, cli.ticks)
}

fn run(
    heap: &mut SyntheticHeap,
    workload: &mut Workload,
    options: &ReportOptions,
    interval: f64,
    ticks: u64,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut tick = 0u64;
    loop {
        workload.step(heap);
        let snapshot = heap.snapshot();
        let report = render_report(&snapshot, options);
        stdout
            .write_all(report.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .and_then(|_| stdout.flush())
            .context("failed to write report")?;

        tick += 1;
        if ticks != 0 && tick >= ticks {
            break;
        }
        thread::sleep(Duration::from_secs_f64(interval));
    }

    // Sweep whatever the workload left behind so the final log line
    // reflects a quiesced heap.
    heap.force_collect();
    tracing::info!(
        collections = heap.collections(),
        live_blocks = workload.live(),
        "heapwatch exiting"
    );
    Ok(())
}
