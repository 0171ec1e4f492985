//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod config_store;
pub mod repositories;
pub mod tagging;

pub use config_store::ConfigStore;
pub use repositories::{ImageFilter, ImageRepository};
pub use tagging::TaggingProvider;
