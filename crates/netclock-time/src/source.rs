//! Authoritative time sources

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use netclock_core::{EpochMillis, NetclockResult, Unavailable};

/// Public world-time endpoint answering with the current UTC time
pub const DEFAULT_ENDPOINT: &str = "https://worldtimeapi.org/api/timezone/Etc/UTC";

/// A remote clock that can be asked for the current time once
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Fetch one authoritative reading
    ///
    /// Every failure is reported as `NetclockError::TimeSourceUnavailable`.
    async fn fetch(&self) -> NetclockResult<EpochMillis>;

    /// Human readable origin, used in logs
    fn describe(&self) -> &str;
}

#[async_trait]
impl<S: TimeSource + ?Sized> TimeSource for Arc<S> {
    async fn fetch(&self) -> NetclockResult<EpochMillis> {
        (**self).fetch().await
    }

    fn describe(&self) -> &str {
        (**self).describe()
    }
}

/// Response body of the world-time API
/// Only `utc_datetime` is consumed
#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    utc_datetime: String,
}

/// HTTP world-time API client
///
/// Sends a single GET per `fetch`. No retry, no caching and no timeout
/// beyond the client default.
#[derive(Clone, Debug)]
pub struct WorldTimeApi {
    client: reqwest::Client,
    endpoint: String,
}

impl WorldTimeApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        WorldTimeApi {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for WorldTimeApi {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl TimeSource for WorldTimeApi {
    async fn fetch(&self) -> NetclockResult<EpochMillis> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Unavailable::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::Status(status.as_u16()).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Unavailable::Network(e.to_string()))?;

        parse_world_time(&body)
    }

    fn describe(&self) -> &str {
        &self.endpoint
    }
}

/// Decode a world-time API body into the instant it carries
pub fn parse_world_time(body: &[u8]) -> NetclockResult<EpochMillis> {
    let response: WorldTimeResponse =
        serde_json::from_slice(body).map_err(|e| Unavailable::Malformed(e.to_string()))?;
    parse_utc_datetime(&response.utc_datetime)
}

/// Parse an ISO-8601 / RFC 3339 timestamp such as `2024-01-01T00:00:10.123456+00:00`
pub fn parse_utc_datetime(raw: &str) -> NetclockResult<EpochMillis> {
    let dt = DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| Unavailable::Malformed(format!("{raw:?}: {e}")))?;
    Ok(EpochMillis::from_datetime(&dt))
}
