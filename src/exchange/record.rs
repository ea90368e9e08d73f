// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exchange record and partial updates

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host-level session identifier (a browsing context)
pub type SessionId = i64;

/// Host-assigned identifier of one request/response exchange
pub type ExchangeId = String;

/// Session id the host uses for exchanges outside any real session
pub const NO_SESSION: SessionId = -1;

/// Structured form fields (field name -> values)
pub type FormData = HashMap<String, Vec<String>>;

/// A single captured header line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    /// Hosts may deliver a header without a textual value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Header that arrived with no value at all
    pub fn without_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Value, or the empty string when absent
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Request body as observed by the body-available phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestBody {
    /// Raw payload decoded as UTF-8
    Text(String),
    /// Structured form fields
    Form(FormData),
}

impl RequestBody {
    /// Body text, if the body was raw
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestBody::Text(text) => Some(text),
            RequestBody::Form(_) => None,
        }
    }

    /// Encode the body for re-sending
    ///
    /// Form fields are serialized as `application/x-www-form-urlencoded`,
    /// with field names sorted so the output is stable.
    pub fn encode(&self) -> String {
        match self {
            RequestBody::Text(text) => text.clone(),
            RequestBody::Form(fields) => {
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();

                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                for name in names {
                    for value in &fields[name] {
                        serializer.append_pair(name, value);
                    }
                }
                serializer.finish()
            }
        }
    }

    /// Whether this is a form body
    pub fn is_form(&self) -> bool {
        matches!(self, RequestBody::Form(_))
    }
}

/// Aggregated metadata of one exchange
///
/// Every field is populated by a different notification phase; none of them
/// is guaranteed to be present until the phase owning it has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    pub session_id: SessionId,
    pub exchange_id: ExchangeId,
    /// When the first notification for this exchange was merged
    pub first_seen: DateTime<Utc>,
    pub method: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub url: Option<String>,
    pub initiator: Option<String>,
    pub request_headers: Option<Vec<HeaderEntry>>,
    pub request_body: Option<RequestBody>,
    pub response_headers: Option<Vec<HeaderEntry>>,
}

impl ExchangeRecord {
    /// Create an empty record
    pub fn new(session_id: SessionId, exchange_id: impl Into<ExchangeId>) -> Self {
        Self {
            session_id,
            exchange_id: exchange_id.into(),
            first_seen: Utc::now(),
            method: None,
            resource_type: None,
            url: None,
            initiator: None,
            request_headers: None,
            request_body: None,
            response_headers: None,
        }
    }

    /// Merge a partial update
    ///
    /// Fields set in `patch` overwrite; fields left unset keep their value.
    pub fn apply(&mut self, patch: ExchangePatch) {
        let ExchangePatch {
            method,
            resource_type,
            url,
            initiator,
            request_headers,
            request_body,
            response_headers,
        } = patch;

        merge_field(&mut self.method, method);
        merge_field(&mut self.resource_type, resource_type);
        merge_field(&mut self.url, url);
        merge_field(&mut self.initiator, initiator);
        merge_field(&mut self.request_headers, request_headers);
        merge_field(&mut self.request_body, request_body);
        merge_field(&mut self.response_headers, response_headers);
    }

    /// Captured request headers (empty if never observed)
    pub fn request_headers(&self) -> &[HeaderEntry] {
        self.request_headers.as_deref().unwrap_or(&[])
    }

    /// Captured response headers (empty if never observed)
    pub fn response_headers(&self) -> &[HeaderEntry] {
        self.response_headers.as_deref().unwrap_or(&[])
    }

    /// Raw body text, if the body was decoded from bytes
    pub fn body_text(&self) -> Option<&str> {
        self.request_body.as_ref().and_then(RequestBody::as_text)
    }

    /// Look up a request header value (case-insensitive)
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers()
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .and_then(|h| h.value.as_deref())
    }
}

fn merge_field<T>(slot: &mut Option<T>, update: Option<T>) {
    if let Some(value) = update {
        *slot = Some(value);
    }
}

/// Partial update contributed by one notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangePatch {
    pub method: Option<String>,
    pub resource_type: Option<String>,
    pub url: Option<String>,
    pub initiator: Option<String>,
    pub request_headers: Option<Vec<HeaderEntry>>,
    pub request_body: Option<RequestBody>,
    pub response_headers: Option<Vec<HeaderEntry>>,
}

impl ExchangePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn initiator(mut self, initiator: Option<String>) -> Self {
        self.initiator = initiator;
        self
    }

    pub fn request_headers(mut self, headers: Vec<HeaderEntry>) -> Self {
        self.request_headers = Some(headers);
        self
    }

    pub fn request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn response_headers(mut self, headers: Vec<HeaderEntry>) -> Self {
        self.response_headers = Some(headers);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_patch() -> ExchangePatch {
        ExchangePatch::new()
            .method("POST")
            .resource_type("xmlhttprequest")
            .url("https://api.example.com/v1/me")
            .initiator(Some("https://example.com".to_string()))
            .request_headers(vec![HeaderEntry::new("Cookie", "sid=1")])
            .request_body(RequestBody::Text("{}".to_string()))
            .response_headers(vec![HeaderEntry::new("Content-Type", "application/json")])
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut record = ExchangeRecord::new(7, "42");
        record.apply(full_patch());
        let before = record.clone();

        record.apply(ExchangePatch::new());
        assert_eq!(record, before);
    }

    #[test]
    fn test_omitted_fields_survive_each_partial_update() {
        // For every field F: set everything, then merge a patch that only
        // omits F and changes the rest; F must keep its original value.
        let omitters: Vec<(&str, fn(&mut ExchangePatch))> = vec![
            ("method", |p| p.method = None),
            ("resource_type", |p| p.resource_type = None),
            ("url", |p| p.url = None),
            ("initiator", |p| p.initiator = None),
            ("request_headers", |p| p.request_headers = None),
            ("request_body", |p| p.request_body = None),
            ("response_headers", |p| p.response_headers = None),
        ];

        for (field, omit) in omitters {
            let mut record = ExchangeRecord::new(1, "a");
            record.apply(full_patch());
            let original = record.clone();

            let mut update = ExchangePatch::new()
                .method("GET")
                .resource_type("main_frame")
                .url("https://other.example.com/")
                .initiator(Some("https://other.example.com".to_string()))
                .request_headers(vec![])
                .request_body(RequestBody::Text("changed".to_string()))
                .response_headers(vec![]);
            omit(&mut update);
            record.apply(update);

            let kept = match field {
                "method" => record.method == original.method,
                "resource_type" => record.resource_type == original.resource_type,
                "url" => record.url == original.url,
                "initiator" => record.initiator == original.initiator,
                "request_headers" => record.request_headers == original.request_headers,
                "request_body" => record.request_body == original.request_body,
                "response_headers" => record.response_headers == original.response_headers,
                _ => unreachable!(),
            };
            assert!(kept, "field {} was overwritten by a patch omitting it", field);
        }
    }

    #[test]
    fn test_set_field_overwrites() {
        let mut record = ExchangeRecord::new(1, "a");
        record.apply(ExchangePatch::new().method("GET"));
        record.apply(ExchangePatch::new().method("POST"));
        assert_eq!(record.method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_form_body_encoding() {
        let mut fields = FormData::new();
        fields.insert("user".to_string(), vec!["alice smith".to_string()]);
        fields.insert("a".to_string(), vec!["1".to_string(), "2".to_string()]);

        let body = RequestBody::Form(fields);
        assert!(body.is_form());
        assert_eq!(body.as_text(), None);
        assert_eq!(body.encode(), "a=1&a=2&user=alice+smith");
    }

    #[test]
    fn test_request_header_lookup() {
        let mut record = ExchangeRecord::new(1, "a");
        record.apply(ExchangePatch::new().request_headers(vec![
            HeaderEntry::new("Authorization", "Bearer t"),
            HeaderEntry::without_value("X-Empty"),
        ]));

        assert_eq!(record.request_header("authorization"), Some("Bearer t"));
        assert_eq!(record.request_header("x-empty"), None);
        assert!(record.response_headers().is_empty());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut record = ExchangeRecord::new(3, "9");
        record.apply(ExchangePatch::new().resource_type("xmlhttprequest"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sessionId"], 3);
        assert_eq!(json["exchangeId"], "9");
        assert_eq!(json["type"], "xmlhttprequest");
        assert!(json["requestHeaders"].is_null());
    }
}
