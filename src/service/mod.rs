// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture service and its execution gate

mod capture;
mod config;
mod gate;

pub use capture::{CaptureService, Collaborators, CompletionOutcome};
pub use config::{ServiceConfig, NOTARY_API_KEY, PROXY_API_KEY};
pub use gate::{ExecutionGate, GateGuard};
