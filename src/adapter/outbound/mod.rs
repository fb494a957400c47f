//! Outbound adapters (driven side).

pub mod catalog;
pub mod universalis;
