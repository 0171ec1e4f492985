//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` and
//!   `ImageLocator<'_>` parameters
//! - Manual mocks are more explicit and easier to debug
//! - We control exactly what they return without macro magic
//!
//! `AppState` is generic over the port traits, so the handler and
//! integration tests drive the real router with these mocks.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
