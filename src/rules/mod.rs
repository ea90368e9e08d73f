// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture rules
//!
//! Rules are supplied externally and trusted as-is. They are compiled once
//! and matched in declaration order; the first match wins.

mod rule;
mod set;

pub use rule::{CaptureRule, CompiledRule, TRANSFORM_TOKEN};
pub use set::{RequestFilter, RuleSet};
