//! HTTP adapter implementation
//!
//! Provides the reqwest client that implements the [`crate::HttpAdapter`]
//! trait, and its configuration.

pub mod client;

pub use client::{AdapterConfig, ReqwestAdapter};
