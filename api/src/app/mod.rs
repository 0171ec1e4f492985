//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod intake_service;
pub mod moderation;
pub mod policy;

pub use intake_service::IntakeService;
