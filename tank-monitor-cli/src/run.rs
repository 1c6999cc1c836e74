use crate::{
    output::{format_event, PrintFormat},
    replay::ReplayReader,
};
use clap::Parser;
use log::{info, warn};
use std::{
    io::Write,
    path::PathBuf,
    time::{Duration, Instant},
};
use tank_level::{Clock, DebouncedReader, TankMonitor};

#[derive(Parser)]
pub(super) struct Cli {
    /// Tank configuration file (TOML), the fresh and grey tanks are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File of input frames, one line of 0/1 channel levels per cycle, or - for stdin
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = PrintFormat::Text)]
    format: PrintFormat,

    /// Override the configured poll interval
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    /// Override the configured debounce time, 0 to disable
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl Cli {
    pub(super) async fn run(&self) -> anyhow::Result<()> {
        let config = crate::config::load(self.config.as_deref())?;
        let mut monitor = config.build()?;

        let interval_ms = self.interval_ms.unwrap_or(config.poll_interval_ms).max(1);
        let debounce_ms = self.debounce_ms.unwrap_or(config.debounce_ms);

        let frames = ReplayReader::open(&self.input)?;
        info!(
            "Replaying {} every {} ms, debounce {} ms",
            self.input.display(),
            interval_ms,
            debounce_ms
        );

        let start = Instant::now();
        let clock = move || start.elapsed().as_millis() as u64;
        let mut reader = DebouncedReader::new(frames, clock, debounce_ms);

        let changes = replay(
            &mut monitor,
            &mut reader,
            Duration::from_millis(interval_ms),
            self.format,
            &mut std::io::stdout().lock(),
        )
        .await?;

        info!("Input exhausted after {changes} level change(s)");
        Ok(())
    }
}

/// Samples the monitor once per frame, writing every level change to `out`.
async fn replay<C: Clock, W: Write>(
    monitor: &mut TankMonitor,
    reader: &mut DebouncedReader<ReplayReader, C>,
    period: Duration,
    format: PrintFormat,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mut ticker = tokio::time::interval(period);
    let mut changes = 0;

    while reader.inner_mut().advance()? {
        ticker.tick().await;

        match monitor.sample(reader) {
            Ok(events) => {
                for event in &events {
                    writeln!(out, "{}", format_event(format, event)?)?;
                }
                changes += events.len();
            }
            Err(e) => warn!(
                "Skipping frame {}: {e}",
                reader.inner().frame_number()
            ),
        }
    }

    Ok(changes)
}
