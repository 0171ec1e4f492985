//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod imagga;
pub mod postgres;

pub use imagga::ImaggaClient;
pub use postgres::{PostgresConfigStore, PostgresImageRepository};
