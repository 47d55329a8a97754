mod influx;
mod inverter;
mod log;
mod tags;

use std::time::Duration;

use clap::Parser;

pub use self::{influx::InfluxArgs, inverter::InverterArgs, log::LogArgs, tags::TagArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Seconds between the starts of consecutive ticks.
    #[clap(
        long = "polling-interval",
        env = "POLLING_INTERVAL",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    polling_interval_secs: u64,

    #[clap(flatten)]
    pub log: LogArgs,

    #[clap(flatten)]
    pub inverter: InverterArgs,

    #[clap(flatten)]
    pub influx: InfluxArgs,

    #[clap(flatten)]
    pub tags: TagArgs,
}

impl Args {
    pub const fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }
}
