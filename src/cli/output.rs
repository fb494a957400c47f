//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use tabled::{Table, Tabled};

use crate::application::graph::BreakdownNode;
use crate::domain::RecipeSummary;

const RULE_WIDTH: usize = 56;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<14} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print a warning status line.
pub fn warn(message: &str) {
    println!("⚠ {message}");
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("{message}");
}

/// Render a gil amount; unresolved values print as `-`.
#[must_use]
pub fn amount(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        }
        Some(v) => format!("{v:.0}"),
    }
}

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

#[derive(Tabled)]
struct RecipeRow {
    #[tabled(rename = "Recipe")]
    recipe: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Craft")]
    crafting_cost: String,
    #[tabled(rename = "Market")]
    market_cost: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Velocity")]
    velocity: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Score")]
    score: String,
}

impl From<&RecipeSummary> for RecipeRow {
    fn from(summary: &RecipeSummary) -> Self {
        Self {
            recipe: summary.recipe_id.to_string(),
            item: summary.item_name.clone(),
            job: summary
                .job
                .as_ref()
                .map_or_else(|| "-".to_string(), |job| format!("{} {}", job.abbreviation, job.level)),
            action: summary.acquire_action.name().to_string(),
            crafting_cost: amount(summary.crafting_cost),
            market_cost: amount(summary.market_cost),
            revenue: amount(summary.revenue),
            profit: amount(summary.profit),
            velocity: rate(summary.velocity),
            speed: rate(summary.speed()),
            score: amount(summary.score()),
        }
    }
}

/// Render recipe summaries as a table.
#[must_use]
pub fn recipe_table(summaries: &[RecipeSummary]) -> String {
    let rows: Vec<RecipeRow> = summaries.iter().map(RecipeRow::from).collect();
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Craft")]
    crafting_cost: String,
    #[tabled(rename = "Market")]
    market_cost: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

/// Render a breakdown tree, one indented row per node.
#[must_use]
pub fn breakdown_table(root: &BreakdownNode) -> String {
    let rows: Vec<BreakdownRow> = root
        .rows()
        .into_iter()
        .map(|(depth, node)| BreakdownRow {
            item: format!("{}{}", "  ".repeat(depth), node.name),
            quantity: node
                .quantity
                .map_or_else(|| "-".to_string(), |q| q.to_string()),
            action: node.action.name().to_string(),
            cost: amount(Some(node.action.cost())),
            crafting_cost: amount(node.crafting_cost),
            market_cost: amount(node.market_cost),
            profit: amount(node.profit),
        })
        .collect();
    Table::new(rows).to_string()
}

/// Print a rendered table indented under a section.
pub fn table(rendered: &str) {
    for line in rendered.lines() {
        println!("  {line}");
    }
}
