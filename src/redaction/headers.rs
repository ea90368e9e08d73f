// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Secret request header lines

use crate::exchange::HeaderEntry;

/// Render every captured request header as `"<lowercased-name>: <value>"`
///
/// Capture order is kept. A header without a value renders with an empty
/// value segment.
pub fn secret_header_lines(headers: &[HeaderEntry]) -> Vec<String> {
    headers
        .iter()
        .map(|h| format!("{}: {}", h.name.to_lowercase(), h.value_or_empty()))
        .filter(|line| !line.is_empty())
        .collect()
}
