use clap::Parser;
use log::info;
use std::path::PathBuf;
use tank_level::{Level, MonitorConfig};

#[derive(Parser)]
pub(super) struct Cli {
    /// Tank configuration file (TOML)
    #[arg(short, long)]
    config: PathBuf,
}

impl Cli {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let config = crate::config::load(Some(&self.config))?;
        let monitor = config.build()?;

        info!(
            "Configuration is valid, {} tank(s) on {} channel(s)",
            monitor.tank_count(),
            config.channels().count()
        );
        print!("{}", describe(&config, &monitor));

        Ok(())
    }
}

fn describe(config: &MonitorConfig, monitor: &tank_level::TankMonitor) -> String {
    let mut s = format!(
        "poll interval: {} ms\ndebounce: {} ms\n",
        config.poll_interval_ms, config.debounce_ms
    );

    for (id, _, probe_count) in monitor.levels() {
        s.push_str(&format!("tank {id} ({probe_count} probes)\n"));

        let Some(probes) = monitor.probe_set(id) else {
            continue;
        };

        for probe in probes.probes() {
            let channel = probe.channel();
            let polarity: &'static str = channel.polarity().into();
            let level = Level::new(probe.rank() + 1);

            s.push_str(&format!(
                "  rank {} channel {} {} -> level {} ({}%)",
                probe.rank(),
                channel.id(),
                polarity,
                level,
                level.fill_percentage(probe_count)
            ));
            if let Some(label) = probe.label() {
                s.push_str(&format!(" {label}"));
            }
            s.push('\n');
        }
    }

    s
}
