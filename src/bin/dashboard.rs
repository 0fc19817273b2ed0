//! Dashboard Binary - Employee Login Analytics
//!
//! Reads a local dataset of login events and emits dashboard snapshots
//! (per-company counts, 5-minute login trend, recent logins, summary stats).
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin dashboard
//! cargo run --release --bin dashboard -- --backend jsonl --watch
//! ```
//!
//! `--watch` tails a JSONL dataset and re-aggregates whenever new events
//! arrive. Without it the dataset (JSON array or JSONL) is read once.
//!
//! ## Environment Variables
//!
//! - EVENTS_PATH - Login event dataset (default: demos/sample_events.jsonl)
//! - OUTPUT_PATH - Snapshot file for the JSONL backend (default: streams/dashboard/snapshots.jsonl)
//! - BUCKET_WIDTH_MINUTES - Login trend bucket width (default: 5)
//! - RECENT_LIMIT - Max events in the recent logins view (default: unlimited)
//! - EMISSION_INTERVAL_SECS - Watch mode recompute interval (default: 5)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Utc;
use loginflow::aggregator_core::{
    load_events, DashboardSnapshot, LiveDataset, SnapshotWriter, StartPosition, TailLine,
    TailReader,
};
use loginflow::config::{BackendType, DashboardConfig};
use std::env;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Duration};

fn parse_backend_from_args() -> BackendType {
    let args: Vec<String> = env::args().collect();
    if let Some(idx) = args.iter().position(|x| x == "--backend") {
        match args.get(idx + 1).and_then(|s| BackendType::from_str(s)) {
            Some(backend) => return backend,
            None => log::warn!("Unknown --backend value, falling back to stdout"),
        }
    }
    BackendType::Stdout
}

fn watch_requested() -> bool {
    env::args().any(|arg| arg == "--watch")
}

fn log_snapshot(snapshot: &DashboardSnapshot, rejected: usize) {
    let average = snapshot
        .stats
        .average_per_category
        .map(|avg| format!("{:.1}", avg))
        .unwrap_or_else(|| "n/a".to_string());

    log::info!(
        "✅ Snapshot: {} logins, {} companies, {} per company, {} trend buckets",
        snapshot.stats.total_count,
        snapshot.stats.unique_category_count,
        average,
        snapshot.time_trend.buckets.len()
    );

    if !snapshot.skipped().is_empty() {
        log::warn!(
            "⚠️  {} events skipped for malformed timestamps",
            snapshot.skipped().len()
        );
    }

    if rejected > 0 {
        log::warn!("⚠️  {} records rejected as undecodable", rejected);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = DashboardConfig::from_env()?;
    let backend = parse_backend_from_args();

    log::info!("🚀 Starting Login Dashboard");
    log::info!("   Events: {}", config.events_path.display());
    log::info!("   Bucket width: {}m", config.bucket_width.minutes());
    match config.recent_limit {
        Some(limit) => log::info!("   Recent logins: newest {}", limit),
        None => log::info!("   Recent logins: all"),
    }

    let writer = SnapshotWriter::new(backend, config.output_path.clone())?;
    log::info!("📊 Backend: {}", writer.backend_type());

    if watch_requested() {
        run_watch(config, writer).await
    } else {
        run_once(config, writer).await
    }
}

async fn run_once(
    config: DashboardConfig,
    mut writer: SnapshotWriter,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_events(&config.events_path).await?;

    let snapshot = DashboardSnapshot::compute(&report.events, config.snapshot_options());
    log_snapshot(&snapshot, report.rejected.len());

    writer.write(Utc::now().timestamp(), &snapshot).await?;
    writer.flush().await?;
    Ok(())
}

async fn run_watch(
    config: DashboardConfig,
    mut writer: SnapshotWriter,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel::<TailLine>(1000);

    let mut reader = TailReader::new(config.events_path.clone(), StartPosition::Beginning);
    reader.start().await?;

    // Reader runs in its own task so a half-read line is never dropped by select!
    tokio::spawn(async move {
        loop {
            match reader.read_line().await {
                Ok(line) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Event stream error: {}", e);
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    });

    let mut dataset = LiveDataset::new();
    let mut emission_ticker = interval(config.emission_interval);
    emission_ticker.tick().await; // Skip first immediate tick

    log::info!("✅ Dashboard watching for login events...");

    loop {
        tokio::select! {
            received = rx.recv() => {
                match received {
                    Some(line) => dataset.apply(line),
                    None => {
                        log::info!("Event stream closed");
                        break;
                    }
                }
            }

            _ = emission_ticker.tick() => {
                // Recompute only when the input changed since the last snapshot
                if !dataset.take_dirty() {
                    continue;
                }

                let snapshot = DashboardSnapshot::compute(dataset.events(), config.snapshot_options());
                log_snapshot(&snapshot, dataset.rejected());

                if let Err(e) = writer.write(Utc::now().timestamp(), &snapshot).await {
                    log::error!("Failed to write snapshot: {}", e);
                }
            }

            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    if dataset.take_dirty() {
        let snapshot = DashboardSnapshot::compute(dataset.events(), config.snapshot_options());
        log_snapshot(&snapshot, dataset.rejected());
        writer.write(Utc::now().timestamp(), &snapshot).await?;
    }
    writer.flush().await?;
    Ok(())
}
