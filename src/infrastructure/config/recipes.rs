//! Recipe catalog location.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings for the `[recipes]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipesConfig {
    /// JSON recipe catalog file.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("recipes.json")
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}
