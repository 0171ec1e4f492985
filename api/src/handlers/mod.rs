//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod images;

pub use images::{get_image, list_images, submit_image};
