// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture rule definition

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Substitution token in a rule's value transform
pub const TRANSFORM_TOKEN: &str = "%s";

/// Declarative capture rule as stored in the rule file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRule {
    /// Literal URL prefix
    #[serde(rename = "url")]
    pub url_prefix: String,
    pub method: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Pattern applied to the replayed response body
    pub response_selector: String,
    /// Template with a single `%s` token
    pub value_transform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CaptureRule {
    pub fn new(
        url_prefix: impl Into<String>,
        method: impl Into<String>,
        resource_type: impl Into<String>,
        response_selector: impl Into<String>,
        value_transform: impl Into<String>,
    ) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            method: method.into(),
            resource_type: resource_type.into(),
            response_selector: response_selector.into(),
            value_transform: value_transform.into(),
            title: None,
            description: None,
        }
    }

    /// Set a display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether an exchange falls under this rule
    pub fn matches(&self, url: &str, method: &str, resource_type: &str) -> bool {
        url.starts_with(&self.url_prefix)
            && method == self.method
            && resource_type == self.resource_type
    }

    /// Substitute the selected text into the first `%s` of the template
    pub fn transform(&self, selected: &str) -> String {
        self.value_transform.replacen(TRANSFORM_TOKEN, selected, 1)
    }
}

/// A rule with its selector compiled
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Position in the rule list
    pub index: usize,
    pub rule: CaptureRule,
    selector: Regex,
}

impl CompiledRule {
    /// Compile a rule's response selector
    pub fn compile(index: usize, rule: CaptureRule) -> Result<Self> {
        let selector = Regex::new(&rule.response_selector).map_err(|source| Error::Selector {
            index,
            pattern: rule.response_selector.clone(),
            source,
        })?;

        if !rule.value_transform.contains(TRANSFORM_TOKEN) {
            tracing::warn!(
                rule = index,
                transform = %rule.value_transform,
                "Value transform has no substitution token"
            );
        }

        Ok(Self {
            index,
            rule,
            selector,
        })
    }

    pub fn selector(&self) -> &Regex {
        &self.selector
    }

    /// Label for logs: the title if any, else the URL prefix
    pub fn label(&self) -> &str {
        self.rule.title.as_deref().unwrap_or(&self.rule.url_prefix)
    }
}

impl std::ops::Deref for CompiledRule {
    type Target = CaptureRule;

    fn deref(&self) -> &Self::Target {
        &self.rule
    }
}
