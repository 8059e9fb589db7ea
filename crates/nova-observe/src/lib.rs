//! Observability setup for Nova.

pub mod tracing_setup;
