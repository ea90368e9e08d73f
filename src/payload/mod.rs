// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Disclosure payload assembly and dispatch

mod assembler;
mod dispatcher;
mod headers;

pub use assembler::{
    assemble, merged_headers, DisclosurePayload, ServiceEndpoints, DEFAULT_MAX_TRANSCRIPT_SIZE,
    FORCED_HEADERS,
};
pub use dispatcher::Dispatcher;
pub use headers::PayloadHeaders;
