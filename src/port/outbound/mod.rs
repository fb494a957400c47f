//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod fetch;
pub mod notifier;
