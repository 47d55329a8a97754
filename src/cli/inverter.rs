use clap::{Parser, builder::BoolishValueParser};
use reqwest::Url;

use crate::{api::fronius, prelude::*};

#[derive(Parser)]
pub struct InverterArgs {
    /// Inverter host name or address, optionally with a port.
    #[clap(long = "inverter-host", env = "FRONIUS_INVERTER_HOST", default_value = "fronius")]
    pub host: String,

    #[clap(
        long = "inverter-use-https",
        env = "FRONIUS_INVERTER_USE_HTTPS",
        value_parser = BoolishValueParser::new(),
    )]
    pub use_https: bool,

    /// Verify the inverter TLS certificate. The devices ship with self-signed ones.
    #[clap(
        long = "inverter-verify-tls",
        env = "FRONIUS_INVERTER_VERIFY_SSL",
        value_parser = BoolishValueParser::new(),
    )]
    pub verify_tls: bool,

    /// Inverter device ID to read the battery state of charge from.
    #[clap(long = "inverter-device-id", env = "FRONIUS_INVERTER_DEVICE_ID", default_value = "1")]
    pub device_id: u32,

    /// Smart meter device ID to read the energy totals from.
    #[clap(long = "meter-device-id", env = "FRONIUS_METER_DEVICE_ID", default_value = "0")]
    pub meter_device_id: u32,

    #[clap(
        id = "inverter_timeout",
        long = "inverter-timeout",
        env = "FRONIUS_INVERTER_TIMEOUT",
        default_value = "10s"
    )]
    pub timeout: humantime::Duration,
}

impl InverterArgs {
    pub fn base_url(&self) -> Result<Url> {
        let scheme = if self.use_https { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{}/", self.host))
            .with_context(|| format!("invalid inverter host `{}`", self.host))
    }

    pub fn connect(&self) -> Result<fronius::Client> {
        fronius::Client::new(
            &self.base_url()?,
            self.meter_device_id,
            self.timeout.into(),
            self.verify_tls,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_base_url() -> Result {
        let args = InverterArgs::try_parse_from([
            "inverter",
            "--inverter-host",
            "192.168.1.20:8443",
            "--inverter-use-https",
        ])?;
        assert_eq!(args.base_url()?.as_str(), "https://192.168.1.20:8443/");
        assert!(!args.verify_tls);
        Ok(())
    }

    #[test]
    fn test_invalid_host() -> Result {
        let args = InverterArgs::try_parse_from(["inverter", "--inverter-host", "fro nius"])?;
        assert!(args.base_url().is_err());
        Ok(())
    }
}
