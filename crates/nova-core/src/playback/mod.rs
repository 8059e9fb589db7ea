//! Spoken delivery of responses with between-chunk interruption.

pub mod chunker;
pub mod controller;
pub mod interrupt;
