//! Infrastructure configuration modules.

pub mod cache;
pub mod engine;
pub mod logging;
pub mod recipes;
pub mod settings;
