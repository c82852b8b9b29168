//! # Node Adapters
//!
//! Port implementations that add node concerns (metrics) on top of the
//! core's in-memory adapters.

pub mod metered_sink;

pub use metered_sink::{record_outcome, MeteredEventSink};
