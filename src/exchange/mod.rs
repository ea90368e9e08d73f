// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exchange aggregation
//!
//! Records, the partial updates each host notification contributes, and
//! the per-session cache holding them until the session ends.

mod cache;
mod notification;
mod record;

pub use cache::ExchangeCache;
pub use notification::{
    BeforeRequest, Completed, Notification, RequestBodyDetails, ResponseStarted, SendHeaders,
    SessionRemoved, UploadChunk, PREFLIGHT_METHOD,
};
pub use record::{
    ExchangeId, ExchangePatch, ExchangeRecord, FormData, HeaderEntry, RequestBody, SessionId,
    NO_SESSION,
};
