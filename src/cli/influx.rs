use clap::Parser;
use reqwest::Url;

use crate::{api::influx, prelude::*};

#[derive(Parser)]
pub struct InfluxArgs {
    /// InfluxDB base URL. For example: `http://localhost:8086`.
    #[clap(long = "influx-url", env = "INFLUX_URL")]
    pub url: Url,

    #[clap(long = "influx-token", env = "INFLUX_TOKEN", hide_env_values = true)]
    pub token: String,

    #[clap(long = "influx-org", env = "INFLUX_ORG")]
    pub org: String,

    #[clap(long = "influx-bucket", env = "INFLUX_BUCKET")]
    pub bucket: String,

    #[clap(long = "influx-measurement", env = "INFLUX_MEASUREMENT", default_value = "fronius_clean")]
    pub measurement: String,

    #[clap(
        id = "influx_timeout",
        long = "influx-timeout",
        env = "INFLUX_TIMEOUT",
        default_value = "10s"
    )]
    pub timeout: humantime::Duration,
}

impl InfluxArgs {
    pub fn connect(&self) -> Result<influx::Client> {
        influx::Client::new(&self.url, &self.token, &self.org, &self.bucket, self.timeout.into())
    }
}
