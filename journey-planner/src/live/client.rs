//! Timetable API HTTP client.
//!
//! Every request carries the developer id and an HMAC-SHA1 signature of its
//! path and query, keyed by the API key.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Url;
use serde::de::DeserializeOwned;
use sha1::Sha1;
use tracing::debug;

use super::convert::{convert_departures, convert_pattern};
use super::error::LiveError;
use super::source::{DepartureQuery, LiveDeparture, LiveSource, PatternCall};
use super::types::{DeparturesResponse, PatternResponse};
use crate::domain::TransportMode;

/// Default base URL for the timetable API.
pub const DEFAULT_BASE_URL: &str = "https://timetableapi.ptv.vic.gov.au";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(300);

type HmacSha1 = Hmac<Sha1>;

/// Configuration for the live API client.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Base URL (defaults to production)
    pub base_url: String,
    /// Developer id sent as `devid`
    pub dev_id: String,
    /// Key used to sign requests
    pub api_key: String,
    /// Deadline for each outbound call
    pub timeout: Duration,
    /// Minimum spacing between calls once the burst is spent
    pub min_interval: Duration,
    /// Calls allowed back to back
    pub burst: u32,
}

impl LiveConfig {
    /// Create a config with the given credentials.
    pub fn new(dev_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dev_id: dev_id.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
            burst: 1,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst = burst;
        self
    }

    /// True when both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.dev_id.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Sign `message` with `key`, returning upper-case hex.
pub fn sign(key: &str, message: &str) -> Result<String, LiveError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| LiveError::NotConfigured(format!("invalid API key: {e}")))?;
    mac.update(message.as_bytes());
    Ok(hex::encode_upper(mac.finalize().into_bytes()))
}

/// Timetable API client.
///
/// Holds no rate limiting of its own; wrap it in
/// [`Guarded`](super::Guarded) to share a limiter and apply deadlines.
#[derive(Debug, Clone)]
pub struct PtvClient {
    http: reqwest::Client,
    base_url: Url,
    dev_id: String,
    api_key: String,
}

impl PtvClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &LiveConfig) -> Result<Self, LiveError> {
        if !config.is_configured() {
            return Err(LiveError::NotConfigured(
                "developer id and API key are required".to_string(),
            ));
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| LiveError::NotConfigured(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LiveError::NotConfigured(format!(
                "invalid base URL: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            dev_id: config.dev_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the signed URL for a departure board.
    fn departures_url(&self, query: &DepartureQuery) -> Result<Url, LiveError> {
        let mut url = self.base_url.clone();
        let route_type = query.mode.route_type().to_string();
        let stop = query.stop.get().to_string();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LiveError::NotConfigured("invalid base URL".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["v3", "departures", "route_type"])
                .push(&route_type)
                .push("stop")
                .push(&stop);
            if let Some(route) = query.route {
                segments.push("route").push(&route.to_string());
            }
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("max_results", &query.max_results.to_string());
            if let Some(after) = query.after {
                pairs.append_pair("date_utc", &after.format("%Y-%m-%dT%H:%M:%SZ").to_string());
            }
            pairs.append_pair("devid", &self.dev_id);
        }
        self.signed(url)
    }

    /// Build the signed URL for a run pattern.
    fn pattern_url(&self, run_ref: &str, mode: TransportMode) -> Result<Url, LiveError> {
        let mut url = self.base_url.clone();
        let route_type = mode.route_type().to_string();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LiveError::NotConfigured("invalid base URL".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["v3", "pattern", "run"])
                .push(run_ref)
                .push("route_type")
                .push(&route_type);
        }
        url.query_pairs_mut().append_pair("devid", &self.dev_id);
        self.signed(url)
    }

    /// Append the signature of the URL's path and query.
    fn signed(&self, mut url: Url) -> Result<Url, LiveError> {
        let message = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let signature = sign(&self.api_key, &message)?;
        url.query_pairs_mut().append_pair("signature", &signature);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LiveError> {
        debug!(path = url.path(), "live API request");
        let response = self.http.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(LiveError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LiveError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LiveError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| LiveError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl LiveSource for PtvClient {
    async fn departures(&self, query: &DepartureQuery) -> Result<Vec<LiveDeparture>, LiveError> {
        let url = self.departures_url(query)?;
        let response: DeparturesResponse = self.get_json(url).await?;
        Ok(convert_departures(&response))
    }

    async fn pattern(
        &self,
        run_ref: &str,
        mode: TransportMode,
    ) -> Result<Vec<PatternCall>, LiveError> {
        let url = self.pattern_url(run_ref, mode)?;
        let response: PatternResponse = self.get_json(url).await?;
        Ok(convert_pattern(&response))
    }
}
