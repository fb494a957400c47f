use std::path::Path;

use crate::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate a configuration file without running the engine.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::note(&format!("Checking configuration: {}", path.display()));

    let config = Config::load(path)?;
    output::ok("Configuration file is valid");

    output::section("Market");
    output::key_value("Endpoint", &config.market.base_url);
    output::key_value("Market", &config.market.market);
    output::key_value("Interval", format!("{} ms", config.market.min_interval_ms));
    output::key_value(
        "Retries",
        format!(
            "{} attempts, {} ms backoff",
            config.market.retry_max_attempts, config.market.retry_backoff_ms
        ),
    );
    match &config.market.seller_id {
        Some(seller) => output::key_value("Seller", seller),
        None => output::key_value("Seller", "-"),
    }

    output::section("Cache");
    output::key_value("Path", config.cache.path.display());
    output::key_value("TTL", format!("{} s", config.cache.ttl_secs));
    if config.cache.path.exists() {
        output::ok("Cache file found");
    } else {
        output::note("  Cache file will be created on first save");
    }

    output::section("Engine");
    output::key_value("Gather cost", config.engine.gather_cost);
    output::key_value("Breakdown", format!("{} levels", config.engine.breakdown_depth));
    output::key_value("Catalog", config.recipes.catalog.display());
    if !config.recipes.catalog.exists() {
        output::warn("Recipe catalog not found");
    }

    println!();
    output::note("Configuration is ready to use.");
    Ok(())
}
