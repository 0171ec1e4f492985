//! Domain layer
//!
//! Image submissions, their moderation lifecycle and the ports the pipeline
//! depends on. No I/O happens here.
//! - `entities`: submissions, safety reports and the moderation policy
//! - `ports`: tagging provider, config store and image repository traits

pub mod entities;
pub mod ports;
