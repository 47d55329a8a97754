//! InfluxDB v2 write API.
//!
//! API docs: <https://docs.influxdata.com/influxdb/v2/api/#operation/PostWrite>.

use std::time::Duration;

use influxdb::{InfluxDbWriteable, Query, Timestamp, WriteQuery};
use reqwest::{
    StatusCode,
    Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use thiserror::Error;

use crate::{core::point::Point, prelude::*};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode the point: {0}")]
    Encode(#[from] influxdb::Error),

    #[error("timestamp {0} precedes the Unix epoch")]
    Timestamp(i64),

    #[error("write request timed out")]
    Timeout,

    #[error("write request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("InfluxDB responded with HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl From<reqwest::Error> for PublishError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() { Self::Timeout } else { Self::Request(error) }
    }
}

pub struct Client {
    inner: reqwest::Client,
    write_url: Url,
}

impl Client {
    #[instrument(skip_all, fields(base_url = %base_url, org = org, bucket = bucket))]
    pub fn new(
        base_url: &Url,
        token: &str,
        org: &str,
        bucket: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut write_url = base_url.clone();
        write_url
            .path_segments_mut()
            .map_err(|()| anyhow!("invalid InfluxDB base URL"))?
            .pop_if_empty()
            .extend(["api", "v2", "write"]);
        write_url
            .query_pairs_mut()
            .append_pair("org", org)
            .append_pair("bucket", bucket)
            .append_pair("precision", "s");

        let mut authorization = HeaderValue::from_str(&format!("Token {token}"))
            .context("the InfluxDB token is not a valid header value")?;
        authorization.set_sensitive(true);
        let headers = HeaderMap::from_iter([
            (AUTHORIZATION, authorization),
            (CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
        ]);
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build the InfluxDB HTTP client")?;

        Ok(Self { inner, write_url })
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(measurement = %point.measurement))]
    pub async fn write(&self, point: &Point) -> Result<(), PublishError> {
        let body = to_write_query(point)?.build()?.get();
        debug!(%body, "writing…");
        let response = self.inner.post(self.write_url.clone()).body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status { status, body });
        }
        Ok(())
    }
}

/// Encode the point, adding a `<field>_unit` tag for every field.
fn to_write_query(point: &Point) -> Result<WriteQuery, PublishError> {
    let seconds = point.timestamp.timestamp();
    let seconds = u128::try_from(seconds).map_err(|_| PublishError::Timestamp(seconds))?;
    let mut query = Timestamp::Seconds(seconds).into_query(point.measurement.as_str());
    for (key, value) in &point.tags {
        query = query.add_tag(key.as_str(), value.as_str());
    }
    for field in &point.fields {
        query = query
            .add_field(field.name, field.value)
            .add_tag(format!("{}_unit", field.name), field.unit);
    }
    Ok(query)
}
