//! Persistence models for the subscriptions service.
//! - `record`: the sea-orm entity and per-field validation
//! - `db`: connection bootstrap from `configs`

pub mod errors;
pub mod db;
pub mod record;
