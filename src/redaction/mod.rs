// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Selective disclosure
//!
//! Computes what the notarizing party may see: one revealed span of the
//! response body, and the request headers and body regions kept secret.

mod engine;
mod headers;

pub use engine::{redact, Redaction, RedactionMiss};
pub use headers::secret_header_lines;
