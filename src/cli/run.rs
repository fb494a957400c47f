//! `run` command: resolve costs and print the profit table.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::{output, RunArgs};
use crate::domain::RecipeId;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_runtime;
use crate::infrastructure::config::settings::Config;

/// Run the engine for the requested recipes until every request is
/// answered or Ctrl+C is pressed.
pub async fn execute(args: RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    let runtime = build_runtime(&config)?;
    let recipe_ids: Vec<RecipeId> = args.recipes.iter().copied().map(RecipeId::new).collect();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run = runtime.run_with_shutdown(&recipe_ids, shutdown_rx);
    tokio::pin!(run);

    let graph = tokio::select! {
        graph = &mut run => graph,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
            let _ = shutdown_tx.send(true);
            run.await
        }
    };

    output::section("Recipes");
    output::table(&output::recipe_table(&graph.summaries()));

    if let Some(id) = args.breakdown {
        let depth = args.depth.unwrap_or(config.engine.breakdown_depth);
        match graph.breakdown(RecipeId::new(id), depth) {
            Ok(root) => {
                output::section(&format!("Breakdown: {}", root.name));
                output::table(&output::breakdown_table(&root));
            }
            Err(e) => output::warn(&format!("No breakdown for recipe {id}: {e}")),
        }
    }

    match runtime.save() {
        Ok(entries) => info!(entries, "Listings cache saved"),
        Err(e) => {
            warn!(error = %e, "Failed to save listings cache");
            output::warn(&format!("Listings cache not saved: {e}"));
        }
    }
    Ok(())
}
