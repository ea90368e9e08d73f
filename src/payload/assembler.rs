// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Disclosure payload assembly

use serde::{Deserialize, Serialize};
use url::Url;

use super::PayloadHeaders;
use crate::exchange::{ExchangeRecord, HeaderEntry};
use crate::external::ConfigStore;
use crate::redaction::Redaction;

/// Fixed transcript budget handed to the prover
pub const DEFAULT_MAX_TRANSCRIPT_SIZE: usize = 16384;

/// Headers forced on every notarized request
///
/// The prover needs an uncompressed body on a connection that is not reused.
pub const FORCED_HEADERS: &[(&str, &str)] =
    &[("Accept-Encoding", "identity"), ("Connection", "close")];

/// Everything the prover needs to notarize one exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosurePayload {
    pub url: String,
    pub method: String,
    pub headers: PayloadHeaders,
    pub body: Option<String>,
    pub max_transcript_size: usize,
    pub secret_headers: Vec<String>,
    pub secret_resps: Vec<String>,
    pub notary_url: Option<String>,
    pub websocket_proxy_url: Option<String>,
}

/// Notary and proxy addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub notary_url: Option<String>,
    pub websocket_proxy_url: Option<String>,
}

impl ServiceEndpoints {
    /// Look both endpoints up; missing values stay `None`
    pub async fn resolve(store: &dyn ConfigStore, notary_key: &str, proxy_key: &str) -> Self {
        Self {
            notary_url: store.get(notary_key).await,
            websocket_proxy_url: store.get(proxy_key).await,
        }
    }
}

/// Header mapping sent to the prover
///
/// Starts from a `Host` derived from the URL, overlays the captured headers
/// in order, then forces [`FORCED_HEADERS`]. A header set again keeps its
/// first position. Headers captured without a value are skipped.
pub fn merged_headers(url: &str, captured: &[HeaderEntry]) -> PayloadHeaders {
    let mut headers = PayloadHeaders::new();

    if let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        headers.set("Host", host);
    }

    for entry in captured {
        if let Some(ref value) = entry.value {
            headers.set(entry.name.as_str(), value.as_str());
        }
    }

    for (name, value) in FORCED_HEADERS {
        headers.set(*name, *value);
    }
    headers
}

/// Build the payload for a redacted exchange
///
/// Returns `None` when the record lacks the URL or method.
pub fn assemble(
    record: &ExchangeRecord,
    redaction: Redaction,
    secret_headers: Vec<String>,
    endpoints: ServiceEndpoints,
    max_transcript_size: usize,
) -> Option<DisclosurePayload> {
    let url = record.url.clone()?;
    let method = record.method.clone()?;

    Some(DisclosurePayload {
        headers: merged_headers(&url, record.request_headers()),
        url,
        method,
        body: record.body_text().map(String::from),
        max_transcript_size,
        secret_headers,
        secret_resps: redaction.secret_resps,
        notary_url: endpoints.notary_url,
        websocket_proxy_url: endpoints.websocket_proxy_url,
    })
}
