use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dining::config::{DEFAULT_MEALS, DEFAULT_PHILOSOPHERS};
use dining::{Backoff, Dinner, DinnerConfig, EventSink, NullSink, Strategy, TracingSink};

#[derive(Parser)]
#[command(name = "dining")]
#[command(version)]
#[command(about = "Dining philosophers simulation")]
struct Cli {
    /// try-acquire (a) or wait-notify (b)
    #[arg(long, env = "DINING_STRATEGY", default_value = "try-acquire")]
    strategy: String,

    /// Number of philosophers around the table
    #[arg(long, default_value_t = DEFAULT_PHILOSOPHERS)]
    philosophers: usize,

    /// Meals each philosopher eats
    #[arg(long, default_value_t = DEFAULT_MEALS)]
    meals: usize,

    /// What to do after a failed pick-up: spin, yield or jitter (try-acquire only)
    #[arg(long, default_value = "yield")]
    backoff: String,

    /// Upper bound of a jitter pause in microseconds
    #[arg(long, default_value_t = 50)]
    jitter_us: u64,

    /// How often a waiting philosopher rechecks its neighbors, 0 to wait
    /// for a wake-up only (wait-notify only)
    #[arg(long, default_value_t = 10)]
    recheck_ms: u64,

    /// Do not narrate every pick-up, meal and wake-up
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let strategy: Strategy = cli.strategy.parse()?;
    let backoff = Backoff::parse(&cli.backoff, Duration::from_micros(cli.jitter_us))?;
    let recheck = match cli.recheck_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    let config = DinnerConfig {
        philosophers: cli.philosophers,
        meals: cli.meals,
        strategy,
        backoff,
        recheck,
    };

    let sink: Arc<dyn EventSink> = if cli.quiet {
        Arc::new(NullSink)
    } else {
        Arc::new(TracingSink)
    };

    let report = Dinner::new(config)
        .with_sink(sink)
        .run()
        .context("dinner did not finish")?;

    info!(
        strategy = %report.strategy,
        total_meals = report.total_meals(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "all philosophers are done"
    );
    for (seat, meals) in report.meals.iter().enumerate() {
        info!(seat, meals, "meals eaten");
    }

    Ok(())
}
