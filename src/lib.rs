// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Reveal - Exchange Capture and Selective Disclosure
//!
//! Aggregates the lifecycle notifications of web requests into exchange
//! records, matches completed exchanges against capture rules, replays them
//! and computes which parts of the response a notary may see. The resulting
//! disclosure payload is handed to a prover.
//!
//! ## Features
//!
//! - Exchange cache: field-union merge of per-phase partial updates
//! - Execution gate: one fair critical section per notification
//! - Capture rules: first-match-wins prefix/method/type matching
//! - Redaction: one revealed span, everything else secret
//! - Payload dispatch: fire-and-forget hand-off to the prover
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reveal::{
//!     CaptureService, ChannelProver, Collaborators, HttpReplayer, MemoryConfigStore,
//!     NullObserver, RuleSet, ServiceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rules = RuleSet::from_file("rules.json")?;
//!     let (prover, mut proofs) = ChannelProver::new();
//!
//!     let service = CaptureService::new(
//!         ServiceConfig::default(),
//!         rules,
//!         Collaborators {
//!             replayer: Arc::new(HttpReplayer::new()?),
//!             config_store: Arc::new(MemoryConfigStore::load("config.json").await?),
//!             observer: Arc::new(NullObserver),
//!             prover: Arc::new(prover),
//!         },
//!     );
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(256);
//!     tokio::spawn(async move { service.run(rx).await });
//!     # drop(tx);
//!
//!     while let Some(message) = proofs.recv().await {
//!         println!("Proof requested for {}", message.payload().url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod exchange;
pub mod external;
pub mod payload;
pub mod redaction;
pub mod rules;
pub mod service;

// Re-exports for convenience

// Errors
pub use error::{Error, ErrorContext, Result};

// Exchanges
pub use exchange::{ExchangeCache, ExchangePatch, ExchangeRecord, HeaderEntry, RequestBody};
pub use exchange::{
    BeforeRequest, Completed, Notification, ResponseStarted, SendHeaders, SessionRemoved,
};
pub use exchange::{SessionId, NO_SESSION};

// Collaborators
pub use external::{ConfigStore, Observer, Prover, Replayer};
pub use external::{
    BroadcastObserver, ChannelProver, HttpReplayer, MemoryConfigStore, NullObserver,
    ProverMessage, ReplayConfig,
};

// Rules
pub use rules::{CaptureRule, CompiledRule, RequestFilter, RuleSet};

// Redaction
pub use redaction::{redact, secret_header_lines, Redaction, RedactionMiss};

// Payload
pub use payload::{assemble, DisclosurePayload, Dispatcher, PayloadHeaders, ServiceEndpoints};

// Service
pub use service::{
    CaptureService, Collaborators, CompletionOutcome, ExecutionGate, ServiceConfig,
};

/// Reveal version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
