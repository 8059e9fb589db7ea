//! HTTP layer for the web front end.
//!
//! Axum router with the legacy `/process` endpoint, an SSE chat stream and
//! model management under `/api/v1/`, and optional static page serving.

pub mod error;
pub mod handlers;
pub mod router;
