//! Cost engine configuration.

use serde::Deserialize;

/// Settings for the `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Acquire cost of an item that can be neither bought nor crafted.
    /// TOML accepts `inf`.
    #[serde(default = "default_gather_cost")]
    pub gather_cost: f64,
    /// Deepest ingredient level printed by a breakdown.
    #[serde(default = "default_breakdown_depth")]
    pub breakdown_depth: usize,
    /// Capacity of the channel carrying fetch results into the engine.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

const fn default_gather_cost() -> f64 {
    f64::INFINITY
}

const fn default_breakdown_depth() -> usize {
    8
}

const fn default_channel_capacity() -> usize {
    1024
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gather_cost: default_gather_cost(),
            breakdown_depth: default_breakdown_depth(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
