use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::WeatherError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// api.weather.gov answers in GeoJSON; the geocoders sharing the client
// only speak plain JSON.
const ACCEPT: &str = "application/geo+json, application/json";

/// `(weather-cli/<version>, <contact>)`, the shape api.weather.gov asks for.
pub fn user_agent(contact: &str) -> String {
    format!("(weather-cli/{}, {})", env!("CARGO_PKG_VERSION"), contact)
}

pub fn build_client(contact: &str, timeout_secs: u64) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(ACCEPT),
    );

    Client::builder()
        .user_agent(user_agent(contact))
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` with `query`, fail on a non-success status, parse the body as `T`.
pub async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    what: &str,
) -> Result<T> {
    debug!(url, ?query, "GET {what}");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Could not connect to {} ({what})", host(url)))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(WeatherError::HttpStatus {
            status,
            url: url.to_string(),
            body: truncate_body(&body),
        }
        .into());
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

fn host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_string())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
