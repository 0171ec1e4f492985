//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod config_store;
pub mod image_repo;


pub use config_store::PostgresConfigStore;
pub use image_repo::PostgresImageRepository;
