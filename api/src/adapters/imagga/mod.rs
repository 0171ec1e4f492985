//! Imagga adapter
//!
//! Implementation of the tagging provider port on the Imagga API.

pub mod client;

pub use client::ImaggaClient;
