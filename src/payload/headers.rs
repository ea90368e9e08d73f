// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Insertion-ordered header mapping

use std::fmt;
use std::ops::Index;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Header name/value pairs in the order the prover will see them
///
/// Names are unique ignoring ASCII case. Serialized as a JSON object whose
/// keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadHeaders {
    entries: Vec<(String, String)>,
}

impl PayloadHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header
    ///
    /// An existing header with the same name in any case keeps its position
    /// but takes the new name and value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Value of a header, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Header names as stored
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for PayloadHeaders {
    type Output = String;

    fn index(&self, name: &str) -> &String {
        match self
            .entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, value)) => value,
            None => panic!("no header named {:?}", name),
        }
    }
}

impl Serialize for PayloadHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PayloadHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = PayloadHeaders;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut headers = PayloadHeaders::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    headers.set(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_keeps_position() {
        let mut headers = PayloadHeaders::new();
        headers.set("Host", "a.test");
        headers.set("accept-encoding", "br");
        headers.set("Cookie", "sid=1");
        headers.set("Accept-Encoding", "identity");

        assert_eq!(headers.names(), vec!["Host", "Accept-Encoding", "Cookie"]);
        assert_eq!(headers.get("ACCEPT-ENCODING"), Some("identity"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_json_object_keeps_order() {
        let mut headers = PayloadHeaders::new();
        headers.set("Host", "a.test");
        headers.set("X-Zeta", "1");
        headers.set("Cookie", "sid=1");

        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"Host":"a.test","X-Zeta":"1","Cookie":"sid=1"}"#);

        let back: PayloadHeaders = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names(), vec!["Host", "X-Zeta", "Cookie"]);
    }
}
