//! SeaORM entity definitions
//!
//! Table models used by the PostgreSQL adapters. The schema itself is managed
//! outside this crate.

pub mod app_config;
pub mod feature_flags;
pub mod images;
