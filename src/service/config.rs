// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture service configuration

use crate::payload::DEFAULT_MAX_TRANSCRIPT_SIZE;

/// Config key holding the notary endpoint
pub const NOTARY_API_KEY: &str = "notary-api";

/// Config key holding the websocket proxy endpoint
pub const PROXY_API_KEY: &str = "proxy-api";

/// Capture service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Transcript budget passed to the prover
    pub max_transcript_size: usize,
    /// Config store key for the notary URL
    pub notary_key: String,
    /// Config store key for the websocket proxy URL
    pub proxy_key: String,
    /// Per-session exchange cap (None = until the session ends)
    pub max_exchanges_per_session: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_transcript_size: DEFAULT_MAX_TRANSCRIPT_SIZE,
            notary_key: NOTARY_API_KEY.to_string(),
            proxy_key: PROXY_API_KEY.to_string(),
            max_exchanges_per_session: None,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transcript budget
    pub fn max_transcript_size(mut self, size: usize) -> Self {
        self.max_transcript_size = size;
        self
    }

    /// Set the config keys used to look up endpoints
    pub fn endpoint_keys(mut self, notary: impl Into<String>, proxy: impl Into<String>) -> Self {
        self.notary_key = notary.into();
        self.proxy_key = proxy.into();
        self
    }

    /// Cap exchanges kept per session
    pub fn max_exchanges_per_session(mut self, max: usize) -> Self {
        self.max_exchanges_per_session = Some(max);
        self
    }
}
