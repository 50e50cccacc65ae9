//! Route dispatch demo.
//!
//! Registers `foo/bar/{b:int}/{a:guid}` with a handler that simulates work,
//! then fires a burst of concurrent runs against it and reports how many
//! handlers were executing at the peak.
//!
//! ```text
//!   spawned tasks ──▶ run_route ──▶ admission gate ──▶ lookup ──▶ handler
//!                                   (max_parallel)
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use uuid::Uuid;

use route_dispatch::config::{load_config, RouterConfig};
use route_dispatch::observability::{logging, metrics};
use route_dispatch::Router;

#[derive(Parser)]
#[command(name = "route-dispatch")]
#[command(about = "Run a burst of typed routes through a bounded dispatcher", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of runs.
    #[arg(short, long)]
    runs: Option<usize>,

    /// Override the concurrency cap (values below 1 mean unlimited).
    #[arg(short, long, allow_hyphen_values = true)]
    max_parallel: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(runs) = cli.runs {
        config.demo.runs = runs;
    }
    if let Some(max_parallel) = cli.max_parallel {
        config.dispatch.max_parallel_executions = max_parallel;
    }

    logging::init_tracing(&config.observability)?;
    tracing::info!("route-dispatch v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = Arc::new(Router::new(&config.dispatch));
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    {
        let active = active.clone();
        let peak = peak.clone();
        let (min_ms, max_ms) = (config.demo.min_work_ms, config.demo.max_work_ms);
        router.register_async_route("foo/bar/{b:int}/{a:guid}", &["a", "b"], move |a: Uuid, b: i64| {
            let active = active.clone();
            let peak = peak.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tracing::debug!(a = %a, b = b + 1, "Handler started");

                tokio::time::sleep(Duration::from_millis(fastrand::u64(min_ms..=max_ms))).await;

                active.fetch_sub(1, Ordering::SeqCst);
                tracing::debug!(a = %a, "Handler done");
            }
        })?;
    }

    let started = Instant::now();
    let tasks: Vec<_> = (0..config.demo.runs)
        .map(|_| {
            let router = router.clone();
            tokio::spawn(async move {
                let route = format!("foo/bar/{}/{}", fastrand::i64(1..100), Uuid::new_v4());
                router.run_route(&route).await
            })
        })
        .collect();

    let mut ok = 0usize;
    let mut failed = 0usize;
    for task in tasks {
        match task.await {
            Ok(Ok(())) => ok += 1,
            Ok(Err(e)) => {
                failed += 1;
                tracing::warn!(error = %e, "Run failed");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, "Run task panicked");
            }
        }
    }

    tracing::info!(
        ok,
        failed,
        peak_in_flight = peak.load(Ordering::SeqCst),
        max_parallel = ?router.max_parallel(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Done"
    );
    Ok(())
}
