//! List saved briefs.

use std::path::Path;

use anyhow::Result;
use pixel_brief_store::{open_store, OrderRecord};

use crate::config::load_config;

/// Run the history command.
pub async fn run(config_path: &Path, limit: Option<u32>) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config.store.path)?;
    let rows = store.history_page(limit, 0)?;

    if rows.is_empty() {
        tracing::info!("No saved briefs yet.");
        return Ok(());
    }

    for row in &rows {
        println!("{}", format_row(row));
    }
    tracing::info!("{} of {} saved briefs", rows.len(), store.count()?);

    Ok(())
}

fn format_row(row: &OrderRecord) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    format!(
        "#{:<4} {:<19}  {:<24} {:<10} {:<16} {}",
        row.id,
        field(&row.created_at),
        field(&row.order_name),
        field(&row.platform),
        field(&row.deadline),
        field(&row.content_summary),
    )
}
