// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture service
//!
//! Owns the execution gate (and with it the exchange cache), the rule set
//! and the collaborators. Each host notification maps to one async handler.
//!
//! Every handler runs its entire body, including replay and endpoint lookup
//! on the completion path, inside one critical section. Callers are expected
//! to await each handler; [`CaptureService::run`] does so for a channel of
//! notifications, which keeps cache-mutation order equal to arrival order.
//! Only the prover hand-off leaves the critical section, as a detached task.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::config::ServiceConfig;
use super::gate::ExecutionGate;
use crate::error::Result;
use crate::exchange::{
    BeforeRequest, Completed, ExchangeCache, ExchangePatch, ExchangeRecord, Notification,
    RequestBody, ResponseStarted, SendHeaders, SessionId, NO_SESSION,
};
use crate::external::{ConfigStore, Observer, Prover, Replayer};
use crate::payload::{assemble, DisclosurePayload, Dispatcher, ServiceEndpoints};
use crate::redaction::{redact, secret_header_lines, RedactionMiss};
use crate::rules::RuleSet;

/// External parties the service talks to
#[derive(Clone)]
pub struct Collaborators {
    pub replayer: Arc<dyn Replayer>,
    pub config_store: Arc<dyn ConfigStore>,
    pub observer: Arc<dyn Observer>,
    pub prover: Arc<dyn Prover>,
}

/// What the completion handler did with an exchange
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// Exchange outside any real session
    NoSession,
    /// No capture rule applies
    NoRule,
    /// Earlier phases never recorded this exchange
    NotCached,
    /// Record lacks the URL, method or request headers
    Incomplete,
    /// Replayed body yields no disclosure
    NotDisclosed(RedactionMiss),
    /// Payload handed to the prover
    Dispatched(Box<DisclosurePayload>),
}

impl CompletionOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CompletionOutcome::Dispatched(_))
    }

    pub fn payload(&self) -> Option<&DisclosurePayload> {
        match self {
            CompletionOutcome::Dispatched(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Long-lived context handling host notifications
pub struct CaptureService {
    config: ServiceConfig,
    rules: Arc<RuleSet>,
    gate: ExecutionGate,
    replayer: Arc<dyn Replayer>,
    config_store: Arc<dyn ConfigStore>,
    observer: Arc<dyn Observer>,
    dispatcher: Dispatcher,
}

impl CaptureService {
    pub fn new(config: ServiceConfig, rules: RuleSet, collaborators: Collaborators) -> Self {
        let cache =
            ExchangeCache::new().max_exchanges_per_session(config.max_exchanges_per_session);

        Self {
            config,
            rules: Arc::new(rules),
            gate: ExecutionGate::new(cache),
            replayer: collaborators.replayer,
            config_store: collaborators.config_store,
            observer: collaborators.observer,
            dispatcher: Dispatcher::new(collaborators.prover),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn gate(&self) -> &ExecutionGate {
        &self.gate
    }

    /// Snapshot of a cached record
    pub async fn record(&self, session: SessionId, exchange: &str) -> Option<ExchangeRecord> {
        self.gate.enter().await.get(session, exchange).cloned()
    }

    /// Headers-sent phase
    pub async fn on_send_headers(&self, n: SendHeaders) {
        let mut cache = self.gate.enter().await;
        if n.is_preflight() {
            return;
        }

        cache.merge(n.session_id, &n.exchange_id, n.to_patch());
    }

    /// Body-available phase
    pub async fn on_before_request(&self, n: BeforeRequest) {
        let mut cache = self.gate.enter().await;
        if n.is_preflight() {
            return;
        }
        let Some(ref details) = n.request_body else {
            return;
        };

        if let Some(raw) = details.raw_bytes() {
            match String::from_utf8(raw) {
                Ok(text) => {
                    cache.merge(
                        n.session_id,
                        &n.exchange_id,
                        ExchangePatch::new().request_body(RequestBody::Text(text)),
                    );
                }
                Err(e) => tracing::warn!(
                    session = n.session_id,
                    exchange = %n.exchange_id,
                    url = %n.url,
                    error = %e,
                    "Request body is not valid UTF-8, continuing without it"
                ),
            }
        } else if let Some(ref form) = details.form_data {
            cache.merge(
                n.session_id,
                &n.exchange_id,
                ExchangePatch::new().request_body(RequestBody::Form(form.clone())),
            );
        }
    }

    /// Completion phase: match, replay, redact and dispatch
    pub async fn on_completed(&self, n: Completed) -> Result<CompletionOutcome> {
        let cache = self.gate.enter().await;

        if n.session_id == NO_SESSION {
            return Ok(CompletionOutcome::NoSession);
        }

        let Some(rule) = self.rules.find(&n.url, &n.method, &n.resource_type) else {
            return Ok(CompletionOutcome::NoRule);
        };

        let Some(record) = cache.get(n.session_id, &n.exchange_id).cloned() else {
            tracing::debug!(
                session = n.session_id,
                exchange = %n.exchange_id,
                "Completed exchange was never cached"
            );
            return Ok(CompletionOutcome::NotCached);
        };

        if record.url.is_none() || record.method.is_none() || record.request_headers.is_none() {
            tracing::debug!(
                session = n.session_id,
                exchange = %n.exchange_id,
                "Cached record is incomplete"
            );
            return Ok(CompletionOutcome::Incomplete);
        }

        let body = match self.replayer.replay(&record).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    session = n.session_id,
                    exchange = %n.exchange_id,
                    rule = rule.index,
                    error = %e,
                    "Replay failed"
                );
                return Err(e);
            }
        };

        let secret_headers = secret_header_lines(record.request_headers());

        let redaction = match redact(rule, &body) {
            Ok(redaction) => redaction,
            Err(miss) => {
                tracing::debug!(
                    exchange = %n.exchange_id,
                    rule = %rule.label(),
                    reason = %miss,
                    "No disclosure"
                );
                return Ok(CompletionOutcome::NotDisclosed(miss));
            }
        };

        let endpoints = ServiceEndpoints::resolve(
            self.config_store.as_ref(),
            &self.config.notary_key,
            &self.config.proxy_key,
        )
        .await;

        let Some(payload) = assemble(
            &record,
            redaction,
            secret_headers,
            endpoints,
            self.config.max_transcript_size,
        ) else {
            return Ok(CompletionOutcome::Incomplete);
        };

        tracing::info!(
            session = n.session_id,
            exchange = %n.exchange_id,
            rule = %rule.label(),
            secret_regions = payload.secret_resps.len(),
            "Dispatching disclosure payload"
        );
        self.dispatcher.dispatch(payload.clone());

        drop(cache);
        Ok(CompletionOutcome::Dispatched(Box::new(payload)))
    }

    /// Response-started phase; the only phase that publishes
    pub async fn on_response_started(&self, n: ResponseStarted) {
        let mut cache = self.gate.enter().await;
        if n.is_preflight() {
            return;
        }

        let mut patch = n.to_patch();
        let has_request_headers = cache
            .get(n.session_id, &n.exchange_id)
            .is_some_and(|r| r.request_headers.is_some());
        if !has_request_headers {
            patch.request_headers = Some(Vec::new());
        }

        let record = cache.merge(n.session_id, &n.exchange_id, patch);
        self.observer.publish(record);
    }

    /// Session teardown; returns the number of evicted exchanges
    pub async fn on_session_removed(&self, session: SessionId) -> usize {
        let evicted = self.gate.enter().await.evict_session(session);
        tracing::debug!(session, evicted, "Session removed");
        evicted
    }

    /// Route one notification to its handler
    pub async fn handle(&self, notification: Notification) -> Result<()> {
        match notification {
            Notification::SendHeaders(n) => self.on_send_headers(n).await,
            Notification::BeforeRequest(n) => self.on_before_request(n).await,
            Notification::Completed(n) => {
                self.on_completed(n).await?;
            }
            Notification::ResponseStarted(n) => self.on_response_started(n).await,
            Notification::SessionRemoved(n) => {
                self.on_session_removed(n.session_id).await;
            }
        }
        Ok(())
    }

    /// Handle notifications one at a time until the channel closes
    ///
    /// A failing notification is logged and does not stop the loop.
    pub async fn run(&self, mut rx: mpsc::Receiver<Notification>) {
        while let Some(notification) = rx.recv().await {
            let kind = notification.kind();
            let session = notification.session_id();
            if let Err(e) = self.handle(notification).await {
                tracing::warn!(kind, session, error = %e, "Notification failed");
            }
        }
        tracing::debug!("Notification channel closed");
    }
}
