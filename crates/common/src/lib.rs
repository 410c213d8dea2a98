//! Shared plumbing for the subscriptions workspace: health payload, logging setup
//! and the Prometheus counters exposed on `/metrics`.

pub mod metrics;
pub mod types;
pub mod utils;
