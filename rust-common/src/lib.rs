//! Shared library for cross-cutting concerns in Vault transit services.
//!
//! This crate provides centralized implementations for:
//! - HTTP client configuration and building
//! - Tracing subscriber initialisation
//! - Graceful shutdown of background tasks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod shutdown;
pub mod tracing_config;

pub use http::{HttpConfig, build_http_client};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal, wait_for_signal};
pub use tracing_config::{TracingConfig, init_tracing};
