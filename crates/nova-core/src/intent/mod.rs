//! Intent classification.
//!
//! The router is synchronous and lock-free: it reads only the immutable site
//! registry and alias table. Specification mode lives on the session and is
//! consulted by the dispatcher before classification.

pub mod matching;
pub mod router;
pub mod sites;
pub mod specification;
