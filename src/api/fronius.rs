//! Fronius Solar API v1 client.
//!
//! API docs: <https://www.fronius.com/~/downloads/Solar%20Energy/Operating%20Instructions/42,0410,2012.pdf>.

pub mod models;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::prelude::*;

const POWER_FLOW_PATH: &str = "solar_api/v1/GetPowerFlowRealtimeData.fcgi";
const METER_PATH: &str = "solar_api/v1/GetMeterRealtimeData.cgi";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to `{url}` timed out")]
    Timeout { url: Url },

    #[error("request to `{url}` failed: {source}")]
    Request { url: Url, source: reqwest::Error },

    #[error("`{url}` responded with HTTP {status}")]
    Status { url: Url, status: StatusCode },

    #[error("`{url}` returned malformed JSON: {source}")]
    Json { url: Url, source: serde_json::Error },

    #[error("`{url}` reported status code {code}: {reason}")]
    Device { url: Url, code: i64, reason: String },
}

impl FetchError {
    fn from_reqwest(url: &Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.clone() }
        } else {
            Self::Request { url: url.clone(), source }
        }
    }
}

/// Raw documents from one round of requests.
#[must_use]
pub struct RealtimeData {
    pub fetched_at: DateTime<Utc>,
    pub power_flow: Value,
    pub meter: Value,
}

pub struct Client {
    inner: reqwest::Client,
    power_flow_url: Url,
    meter_url: Url,
}

impl Client {
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(
        base_url: &Url,
        meter_device_id: u32,
        timeout: Duration,
        verify_tls: bool,
    ) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .danger_accept_invalid_hostnames(!verify_tls)
            .build()
            .context("failed to build the inverter HTTP client")?;
        let power_flow_url = base_url.join(POWER_FLOW_PATH)?;
        let mut meter_url = base_url.join(METER_PATH)?;
        meter_url
            .query_pairs_mut()
            .append_pair("Scope", "Device")
            .append_pair("DeviceId", &meter_device_id.to_string());
        if !verify_tls && base_url.scheme() == "https" {
            warn!("TLS certificate verification is disabled");
        }
        Ok(Self { inner, power_flow_url, meter_url })
    }

    /// Fetch the power flow and the smart meter readings.
    ///
    /// The timestamp is taken once both requests have completed.
    pub async fn get_realtime_data(&self) -> Result<RealtimeData, FetchError> {
        let power_flow = self.get_json(&self.power_flow_url).await?;
        let meter = self.get_json(&self.meter_url).await?;
        Ok(RealtimeData { fetched_at: Utc::now(), power_flow, meter })
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(url = %url))]
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        let response = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::from_reqwest(url, source))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.clone(), status });
        }
        let body = response.bytes().await.map_err(|source| FetchError::from_reqwest(url, source))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|source| FetchError::Json { url: url.clone(), source })?;

        // The API reports its own errors with HTTP 200:
        if let Some(code) = value.pointer("/Head/Status/Code").and_then(Value::as_i64)
            && code != 0
        {
            let reason = value
                .pointer("/Head/Status/Reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            return Err(FetchError::Device { url: url.clone(), code, reason });
        }

        debug!(n_bytes = body.len(), "fetched");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;

    fn new_client(server: &Server) -> Result<Client> {
        let base_url = Url::parse(&server.url())?;
        Client::new(&base_url, 0, Duration::from_secs(5), true)
    }

    #[tokio::test]
    async fn test_get_realtime_data_ok() -> Result {
        let mut server = Server::new_async().await;
        let power_flow_mock = server
            .mock("GET", "/solar_api/v1/GetPowerFlowRealtimeData.fcgi")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"Body": {"Data": {"Site": {"P_PV": 3370}}}}).to_string())
            .create_async()
            .await;
        let meter_mock = server
            .mock("GET", "/solar_api/v1/GetMeterRealtimeData.cgi")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Scope".into(), "Device".into()),
                Matcher::UrlEncoded("DeviceId".into(), "0".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "Body": {"Data": {"EnergyReal_WAC_Sum_Produced": 5_712_340}},
                    "Head": {"Status": {"Code": 0, "Reason": ""}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let data = new_client(&server)?.get_realtime_data().await?;
        assert_eq!(data.power_flow["Body"]["Data"]["Site"]["P_PV"], 3370);
        assert_eq!(data.meter["Body"]["Data"]["EnergyReal_WAC_Sum_Produced"], 5_712_340);

        power_flow_mock.assert_async().await;
        meter_mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/solar_api/v1/GetPowerFlowRealtimeData.fcgi")
            .with_status(500)
            .create_async()
            .await;

        let result = new_client(&server)?.get_realtime_data().await;
        assert!(matches!(
            result,
            Err(FetchError::Status { status: StatusCode::INTERNAL_SERVER_ERROR, .. })
        ));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_json() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/solar_api/v1/GetPowerFlowRealtimeData.fcgi")
            .with_status(200)
            .with_body("<html>Service Unavailable</html>")
            .create_async()
            .await;

        let result = new_client(&server)?.get_realtime_data().await;
        assert!(matches!(result, Err(FetchError::Json { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_device_status_error() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/solar_api/v1/GetPowerFlowRealtimeData.fcgi")
            .with_status(200)
            .with_body(
                json!({"Body": {"Data": {}}, "Head": {"Status": {"Code": 8, "Reason": "timeout"}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let result = new_client(&server)?.get_realtime_data().await;
        let Err(FetchError::Device { code, reason, .. }) = result else {
            bail!("expected a device error");
        };
        assert_eq!(code, 8);
        assert_eq!(reason, "timeout");
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout() -> Result {
        // Accepts connections into the backlog and never responds:
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let base_url = Url::parse(&format!("http://{}/", listener.local_addr()?))?;
        let client = Client::new(&base_url, 0, Duration::from_millis(200), true)?;
        let result = client.get_realtime_data().await;
        assert!(matches!(result, Err(FetchError::Timeout { .. })), "{:?}", result.err());
        drop(listener);
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_refused() -> Result {
        let base_url = Url::parse("http://127.0.0.1:1/")?;
        let client = Client::new(&base_url, 0, Duration::from_secs(1), true)?;
        let result = client.get_realtime_data().await;
        assert!(matches!(result, Err(FetchError::Request { .. } | FetchError::Timeout { .. })));
        Ok(())
    }
}
