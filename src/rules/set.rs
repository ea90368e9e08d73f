// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered rule set and host subscription filter

use std::collections::HashSet;
use std::path::Path;

use super::rule::{CaptureRule, CompiledRule};
use crate::error::{Error, ErrorContext, Result};

/// Immutable, ordered list of compiled capture rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile rules, keeping declaration order
    pub fn new(rules: Vec<CaptureRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = rules.len(), "Loaded capture rules");
        Ok(Self { rules })
    }

    /// Parse a JSON array of rules
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<CaptureRule> = serde_json::from_str(json)
            .map_err(|e| Error::rules(format!("malformed rule list: {}", e)))?;
        Self::new(rules)
    }

    /// Load a JSON rule file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(&format!("reading rule file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// First rule matching the exchange, in declaration order
    pub fn find(&self, url: &str, method: &str, resource_type: &str) -> Option<&CompiledRule> {
        self.rules
            .iter()
            .find(|r| r.matches(url, method, resource_type))
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Filter the host should apply when subscribing to completions
    ///
    /// Only exchanges that could match some rule need to be delivered.
    pub fn completion_filter(&self) -> RequestFilter {
        let mut seen = HashSet::new();
        let urls: Vec<String> = self
            .rules
            .iter()
            .map(|r| format!("{}*", r.url_prefix))
            .filter(|pattern| seen.insert(pattern.clone()))
            .collect();

        let mut types: Vec<String> = self
            .rules
            .iter()
            .map(|r| r.resource_type.clone())
            .collect();
        types.sort();
        types.dedup();

        RequestFilter { urls, types }
    }
}

/// Host-side event subscription filter
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestFilter {
    /// URL patterns; a trailing `*` matches any suffix
    pub urls: Vec<String>,
    /// Resource types (empty = any)
    pub types: Vec<String>,
}

impl RequestFilter {
    /// Filter that accepts everything
    pub fn all_urls() -> Self {
        Self {
            urls: vec!["<all_urls>".to_string()],
            types: Vec::new(),
        }
    }

    pub fn matches(&self, url: &str, resource_type: &str) -> bool {
        let url_ok = self.urls.iter().any(|pattern| {
            if pattern == "<all_urls>" {
                return true;
            }
            match pattern.strip_suffix('*') {
                Some(prefix) => url.starts_with(prefix),
                None => url == pattern,
            }
        });

        url_ok && (self.types.is_empty() || self.types.iter().any(|t| t == resource_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const RULES: &str = r#"[
        {
            "url": "https://api.example.com/1.1/account",
            "method": "GET",
            "type": "xmlhttprequest",
            "responseSelector": "\"screen_name\":\"[^\"]+\"",
            "valueTransform": "%s"
        },
        {
            "url": "https://api.example.com/1.1/",
            "method": "GET",
            "type": "xmlhttprequest",
            "responseSelector": "\"id\":[0-9]+",
            "valueTransform": "{%s}"
        },
        {
            "url": "https://bank.example.com/",
            "method": "POST",
            "type": "main_frame",
            "responseSelector": "balance: [0-9.]+",
            "valueTransform": "%s"
        }
    ]"#;

    #[test]
    fn test_first_match_wins() {
        let set = RuleSet::from_json(RULES).unwrap();
        assert_eq!(set.len(), 3);

        let rule = set
            .find("https://api.example.com/1.1/account/settings", "GET", "xmlhttprequest")
            .unwrap();
        assert_eq!(rule.index, 0);

        let rule = set
            .find("https://api.example.com/1.1/users/show", "GET", "xmlhttprequest")
            .unwrap();
        assert_eq!(rule.index, 1);
    }

    #[test]
    fn test_no_match() {
        let set = RuleSet::from_json(RULES).unwrap();
        assert!(set.find("https://bank.example.com/", "GET", "main_frame").is_none());
        assert!(set.find("https://other.example.com/", "GET", "xmlhttprequest").is_none());
    }

    #[test]
    fn test_matcher_is_deterministic() {
        let set = RuleSet::from_json(RULES).unwrap();
        let queries = [
            ("https://api.example.com/1.1/account", "GET", "xmlhttprequest"),
            ("https://bank.example.com/transfer", "POST", "main_frame"),
            ("https://api.example.com/2/", "GET", "xmlhttprequest"),
            ("https://api.example.com/1.1/x", "GET", "xmlhttprequest"),
        ];

        let forward: Vec<Option<usize>> = queries
            .iter()
            .map(|(u, m, t)| set.find(u, m, t).map(|r| r.index))
            .collect();
        let mut backward: Vec<Option<usize>> = queries
            .iter()
            .rev()
            .map(|(u, m, t)| set.find(u, m, t).map(|r| r.index))
            .collect();
        backward.reverse();

        assert_eq!(forward, vec![Some(0), Some(2), None, Some(1)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_invalid_selector_fails_load() {
        let json = r#"[{"url":"u","method":"GET","type":"t","responseSelector":"(","valueTransform":"%s"}]"#;
        let err = RuleSet::from_json(json).unwrap_err();
        assert!(matches!(err, Error::Selector { index: 0, .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RuleSet::from_json("{not json").unwrap_err(),
            Error::Rules(_)
        ));
        // A rule missing its selector is a shape error too
        let err = RuleSet::from_json(r#"[{"url": "https://a.test/", "method": "GET", "type": "xhr"}]"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("Rule error: malformed rule list"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, RULES).unwrap();

        let set = RuleSet::from_file(&path).unwrap();
        assert_eq!(set.len(), 3);
        assert!(RuleSet::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_completion_filter() {
        let set = RuleSet::from_json(RULES).unwrap();
        let filter = set.completion_filter();

        assert_eq!(filter.urls.len(), 3);
        assert_eq!(filter.types, vec!["main_frame", "xmlhttprequest"]);
        assert!(filter.matches("https://api.example.com/1.1/anything", "xmlhttprequest"));
        assert!(!filter.matches("https://api.example.com/1.1/anything", "image"));
        assert!(!filter.matches("https://elsewhere.example.com/", "main_frame"));
    }

    #[test]
    fn test_completion_filter_drops_non_adjacent_duplicates() {
        let set = RuleSet::new(vec![
            CaptureRule::new("https://b.test/", "GET", "xmlhttprequest", "x", "%s"),
            CaptureRule::new("https://a.test/", "GET", "main_frame", "y", "%s"),
            CaptureRule::new("https://b.test/", "POST", "xmlhttprequest", "z", "%s"),
        ])
        .unwrap();

        assert_eq!(
            set.completion_filter().urls,
            vec!["https://b.test/*", "https://a.test/*"]
        );
    }

    #[test]
    fn test_all_urls_filter() {
        let filter = RequestFilter::all_urls();
        assert!(filter.matches("https://anything.test/", "image"));
    }
}
