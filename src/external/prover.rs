// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Channel hand-off to the notarization worker

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::Prover;
use crate::error::{Error, Result};
use crate::payload::DisclosurePayload;

/// Message understood by the notarization worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProverMessage {
    ProveRequestStart(DisclosurePayload),
}

impl ProverMessage {
    pub fn payload(&self) -> &DisclosurePayload {
        match self {
            ProverMessage::ProveRequestStart(payload) => payload,
        }
    }
}

/// Sends payloads to a worker over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelProver {
    tx: mpsc::UnboundedSender<ProverMessage>,
}

impl ChannelProver {
    /// Create the prover and the worker's receiving end
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProverMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Prover for ChannelProver {
    async fn start_proof(&self, payload: DisclosurePayload) -> Result<()> {
        self.tx
            .send(ProverMessage::ProveRequestStart(payload))
            .map_err(|_| Error::dispatch("prover channel closed"))
    }
}
