// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body redaction
//!
//! Turns the first selector match of a rule into one revealed span and the
//! secret regions around it.

use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

use crate::rules::CompiledRule;

/// Why a body yields no disclosure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedactionMiss {
    /// Selector found nothing in the body
    #[error("response selector matched nothing")]
    NoSelectorMatch,

    /// Transformed value does not occur literally in the body
    #[error("revealed value {revealed:?} does not occur in the body")]
    RevealedNotFound { revealed: String },
}

/// Disclosed span and secret regions of one body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redaction {
    /// Text of the first selector match
    pub selected: String,
    /// Selected text substituted into the rule's template
    pub revealed: String,
    /// Byte offset of the revealed string in the body
    pub start: usize,
    /// Byte offset of the revealed string's last character
    pub end: usize,
    /// Secret byte ranges, empties dropped
    pub secret_ranges: Vec<Range<usize>>,
    /// Body text of each secret range
    pub secret_resps: Vec<String>,
}

impl Redaction {
    /// Byte range of the revealed string
    pub fn revealed_range(&self) -> Range<usize> {
        self.start..self.start + self.revealed.len()
    }
}

/// Compute the redaction of `body` under `rule`
///
/// The trailing secret region starts at `end`, the revealed string's final
/// character, not one past it. That character is therefore part of both the
/// revealed span and the trailing secret region.
pub fn redact(rule: &CompiledRule, body: &str) -> Result<Redaction, RedactionMiss> {
    let selected = rule
        .selector()
        .find(body)
        .ok_or(RedactionMiss::NoSelectorMatch)?
        .as_str();

    let revealed = rule.transform(selected);
    let start = body
        .find(revealed.as_str())
        .ok_or_else(|| RedactionMiss::RevealedNotFound {
            revealed: revealed.clone(),
        })?;
    // An empty reveal leaves the whole body as one secret region
    let end = match revealed.chars().next_back() {
        Some(last) => start + revealed.len() - last.len_utf8(),
        None => start,
    };

    let secret_ranges: Vec<Range<usize>> = [0..start, end..body.len()]
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect();
    let secret_resps = secret_ranges
        .iter()
        .map(|r| body[r.clone()].to_string())
        .collect();

    Ok(Redaction {
        selected: selected.to_string(),
        revealed,
        start,
        end,
        secret_ranges,
        secret_resps,
    })
}
