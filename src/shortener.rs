//! Link shortening with graceful fallback.
//!
//! Shortening is an enhancement, never a requirement: any failure hands
//! the original URL back and the caller cannot tell the difference.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ShortenerConfig;

/// Expected response body from the shortening service.
#[derive(Debug, Deserialize)]
struct ShortenResponse {
    shorturl: Option<String>,
}

#[derive(Debug, Error)]
enum ShortenError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("response body missing shorturl")]
    MissingField,
}

/// Client for the external shortening service.
pub struct Shortener {
    client: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

impl Shortener {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            enabled: true,
        }
    }

    /// Construct from config, honoring the enabled flag.
    pub fn from_config(config: &ShortenerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            enabled: config.enabled,
        }
    }

    /// Shorten `long_url`, returning it unchanged on any failure.
    ///
    /// Exactly one request, no retries. A `t` disambiguator is appended
    /// to the outgoing URL when missing so the service does not return a
    /// cached short code minted for a different voucher.
    pub async fn shorten(&self, long_url: &str) -> String {
        if !self.enabled {
            return long_url.to_string();
        }

        let target = append_disambiguator(long_url);
        match self.request_short_url(&target).await {
            Ok(short) => short,
            Err(e) => {
                tracing::debug!(error = %e, "URL shortening failed, using long URL");
                long_url.to_string()
            }
        }
    }

    async fn request_short_url(&self, long_url: &str) -> Result<String, ShortenError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("url", long_url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ShortenError::Status(response.status().as_u16()));
        }

        let body: ShortenResponse = response.json().await?;
        body.shorturl.ok_or(ShortenError::MissingField)
    }
}

/// Append a `t` timestamp query parameter when the URL carries none.
fn append_disambiguator(url: &str) -> String {
    if has_t_param(url) {
        return url.to_string();
    }
    let ts = Utc::now().timestamp_millis();
    if url.contains('?') {
        format!("{}&t={}", url, ts)
    } else {
        format!("{}?t={}", url, ts)
    }
}

fn has_t_param(url: &str) -> bool {
    url.split_once('?')
        .map(|(_, query)| query.split('&').any(|pair| pair.starts_with("t=")))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disambiguator_appended_once() {
        let url = "https://example.com/voucher/a?data=TOKEN";
        let out = append_disambiguator(url);
        assert!(out.starts_with("https://example.com/voucher/a?data=TOKEN&t="));

        let again = append_disambiguator(&out);
        assert_eq!(again, out);
    }

    #[test]
    fn disambiguator_starts_a_query_when_absent() {
        let out = append_disambiguator("https://example.com/voucher/a");
        assert!(out.starts_with("https://example.com/voucher/a?t="));
    }

    #[test]
    fn t_detection_is_not_fooled_by_suffixes() {
        assert!(!has_t_param("https://e.com/x?title=5"));
        assert!(has_t_param("https://e.com/x?t=5"));
        assert!(has_t_param("https://e.com/x?data=D&t=5"));
    }
}
