// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fire-and-forget prover dispatch

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::DisclosurePayload;
use crate::external::Prover;

/// Hands payloads to the prover on a detached task
#[derive(Clone)]
pub struct Dispatcher {
    prover: Arc<dyn Prover>,
}

impl Dispatcher {
    pub fn new(prover: Arc<dyn Prover>) -> Self {
        Self { prover }
    }

    /// Start a proof without waiting for it
    ///
    /// The returned handle may be dropped; the hand-off still runs.
    pub fn dispatch(&self, payload: DisclosurePayload) -> JoinHandle<()> {
        let prover = self.prover.clone();
        tokio::spawn(async move {
            let url = payload.url.clone();
            match prover.start_proof(payload).await {
                Ok(()) => tracing::info!(url = %url, "Proof request handed off"),
                Err(e) => tracing::warn!(url = %url, error = %e, "Prover rejected payload"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ChannelProver;
    use crate::payload::PayloadHeaders;

    #[tokio::test]
    async fn test_dispatch_is_detached() {
        let (prover, mut rx) = ChannelProver::new();
        let dispatcher = Dispatcher::new(Arc::new(prover));

        let payload = DisclosurePayload {
            url: "https://a.test/".to_string(),
            method: "GET".to_string(),
            headers: PayloadHeaders::new(),
            body: None,
            max_transcript_size: 16384,
            secret_headers: vec![],
            secret_resps: vec![],
            notary_url: None,
            websocket_proxy_url: None,
        };
        drop(dispatcher.dispatch(payload.clone()));

        let message = rx.recv().await.unwrap();
        assert_eq!(message.payload(), &payload);
    }
}
