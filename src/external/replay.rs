// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP replay of captured requests

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};

use super::Replayer;
use crate::error::{Error, ErrorContext, Result};
use crate::exchange::{ExchangeRecord, RequestBody};

/// Default user agent for replays without a captured one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Headers the client manages itself and never copies from the capture
const MANAGED_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "connection",
    "accept-encoding",
    "transfer-encoding",
];

/// Replay client configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// User agent used when the capture has none
    pub user_agent: String,
    /// Per-request timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            max_redirects: 10,
            accept_invalid_certs: false,
            proxy: None,
        }
    }
}

impl ReplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// Replays captured requests over HTTP
#[derive(Clone)]
pub struct HttpReplayer {
    client: Client,
}

impl HttpReplayer {
    /// Create a replayer with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ReplayConfig::default())
    }

    pub fn with_config(config: ReplayConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Captured headers that can be re-sent
    fn replay_headers(record: &ExchangeRecord) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for entry in record.request_headers() {
            let Some(ref value) = entry.value else {
                continue;
            };
            if MANAGED_HEADERS
                .iter()
                .any(|m| entry.name.eq_ignore_ascii_case(m))
            {
                continue;
            }
            match (
                HeaderName::try_from(entry.name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::debug!(header = %entry.name, "Skipping unrepresentable header"),
            }
        }

        if matches!(record.request_body, Some(RequestBody::Form(_)))
            && !headers.contains_key(reqwest::header::CONTENT_TYPE)
        {
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
        }
        headers
    }
}

#[async_trait]
impl Replayer for HttpReplayer {
    async fn replay(&self, record: &ExchangeRecord) -> Result<String> {
        let url = record
            .url
            .as_deref()
            .ok_or_else(|| Error::replay("", "record has no URL"))?;
        let method = record.method.as_deref().unwrap_or("GET");
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|e| Error::replay(url, format!("invalid method {:?}: {}", method, e)))?;

        let start = Instant::now();
        let mut builder = self
            .client
            .request(method, url)
            .headers(Self::replay_headers(record));

        if let Some(ref body) = record.request_body {
            builder = builder.body(body.encode());
        }

        let response = builder.send().await.with_url(url)?;
        let status = response.status();
        let text = response.text().await.with_url(url)?;

        tracing::debug!(
            url,
            status = status.as_u16(),
            time_ms = start.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Replayed request"
        );
        Ok(text)
    }
}
