//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`rate_limit`] - Minimum-interval limiter shared by market requests
//! - [`runtime`] - Fetch tasks, engine task and shutdown

pub mod bootstrap;
pub mod config;
pub mod rate_limit;
pub mod runtime;
