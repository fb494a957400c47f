use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::{ItemId, RecipeId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Lookups against the cost graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("item {0} is unknown to the cost graph")]
    ItemNotFound(ItemId),

    #[error("recipe {0} is unknown to the cost graph")]
    RecipeNotFound(RecipeId),
}

/// Market data fetch failures.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("giving up on {url} after {attempts} attempts (last status: {status})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        status: String,
    },

    #[error("item {expected} requested but payload describes item {actual}")]
    ItemMismatch { expected: ItemId, actual: ItemId },
}

/// Persistent cache failures.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The shared in-flight fetch failed; every waiter receives this.
    #[error("fetch failed: {0}")]
    Fetch(Arc<Error>),

    #[error("failed to load cache from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("failed to save cache to {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error("persistence disabled for this session after a failed load of {0}")]
    PersistenceDisabled(PathBuf),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
