// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host notifications contributing to an exchange record
//!
//! The host delivers one notification per lifecycle phase. They can arrive
//! in any order, concurrently, and some may never arrive at all.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::record::{ExchangeId, ExchangePatch, FormData, HeaderEntry, SessionId};

/// Preflight requests never contribute to the cache
pub const PREFLIGHT_METHOD: &str = "OPTIONS";

/// Request headers are about to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendHeaders {
    pub session_id: SessionId,
    pub exchange_id: ExchangeId,
    pub method: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub request_headers: Option<Vec<HeaderEntry>>,
}

impl SendHeaders {
    pub fn is_preflight(&self) -> bool {
        self.method == PREFLIGHT_METHOD
    }

    /// Envelope fields plus request headers (empty when the host sent none)
    pub fn to_patch(&self) -> ExchangePatch {
        ExchangePatch::new()
            .method(&self.method)
            .resource_type(&self.resource_type)
            .url(&self.url)
            .initiator(self.initiator.clone())
            .request_headers(self.request_headers.clone().unwrap_or_default())
    }
}

/// One element of a raw upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadChunk {
    #[serde(default)]
    pub bytes: Option<Bytes>,
    /// Uploads backed by a file carry a path instead of bytes
    #[serde(default)]
    pub file: Option<String>,
}

/// Request body as exposed by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyDetails {
    #[serde(default)]
    pub raw: Vec<UploadChunk>,
    #[serde(default)]
    pub form_data: Option<FormData>,
    /// Host-side error while reading the body
    #[serde(default)]
    pub error: Option<String>,
}

impl RequestBodyDetails {
    /// Raw body with all in-memory chunks concatenated
    ///
    /// Returns `None` if no chunk carries bytes.
    pub fn raw_bytes(&self) -> Option<Vec<u8>> {
        let mut chunks = self.raw.iter().filter_map(|c| c.bytes.as_ref()).peekable();
        chunks.peek()?;

        let mut out = Vec::new();
        for chunk in chunks {
            out.extend_from_slice(chunk);
        }
        Some(out)
    }
}

/// Request body became available
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeRequest {
    pub session_id: SessionId,
    pub exchange_id: ExchangeId,
    pub method: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    #[serde(default)]
    pub request_body: Option<RequestBodyDetails>,
}

impl BeforeRequest {
    pub fn is_preflight(&self) -> bool {
        self.method == PREFLIGHT_METHOD
    }
}

/// Exchange completed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completed {
    pub session_id: SessionId,
    pub exchange_id: ExchangeId,
    pub method: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
}

/// First response bytes arrived
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStarted {
    pub session_id: SessionId,
    pub exchange_id: ExchangeId,
    pub method: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub url: String,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub response_headers: Option<Vec<HeaderEntry>>,
}

impl ResponseStarted {
    pub fn is_preflight(&self) -> bool {
        self.method == PREFLIGHT_METHOD
    }

    /// Envelope fields plus response headers
    ///
    /// Request headers are not part of the patch; the handler fills them in
    /// with an empty list only if no earlier phase set them.
    pub fn to_patch(&self) -> ExchangePatch {
        let mut patch = ExchangePatch::new()
            .method(&self.method)
            .resource_type(&self.resource_type)
            .url(&self.url)
            .initiator(self.initiator.clone());
        patch.response_headers = self.response_headers.clone();
        patch
    }
}

/// Session ended; all of its exchanges go away
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRemoved {
    pub session_id: SessionId,
}

/// Any notification the service handles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    SendHeaders(SendHeaders),
    BeforeRequest(BeforeRequest),
    Completed(Completed),
    ResponseStarted(ResponseStarted),
    SessionRemoved(SessionRemoved),
}

impl Notification {
    pub fn session_id(&self) -> SessionId {
        match self {
            Notification::SendHeaders(n) => n.session_id,
            Notification::BeforeRequest(n) => n.session_id,
            Notification::Completed(n) => n.session_id,
            Notification::ResponseStarted(n) => n.session_id,
            Notification::SessionRemoved(n) => n.session_id,
        }
    }

    pub fn exchange_id(&self) -> Option<&str> {
        match self {
            Notification::SendHeaders(n) => Some(&n.exchange_id),
            Notification::BeforeRequest(n) => Some(&n.exchange_id),
            Notification::Completed(n) => Some(&n.exchange_id),
            Notification::ResponseStarted(n) => Some(&n.exchange_id),
            Notification::SessionRemoved(_) => None,
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SendHeaders(_) => "send_headers",
            Notification::BeforeRequest(_) => "before_request",
            Notification::Completed(_) => "completed",
            Notification::ResponseStarted(_) => "response_started",
            Notification::SessionRemoved(_) => "session_removed",
        }
    }
}
