//! Export a brief file as a Word document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pixel_brief_model::BriefForm;
use pixel_brief_render::export_docx;
use pixel_brief_store::{open_store, NewOrder};

use crate::config::load_config;

/// Run the export command. Returns the written document path.
pub async fn run(
    config_path: &Path,
    brief_path: &Path,
    output: &Path,
    save: bool,
) -> Result<PathBuf> {
    let content = fs::read_to_string(brief_path)
        .with_context(|| format!("Failed to read {}", brief_path.display()))?;
    let form: BriefForm = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", brief_path.display()))?;
    let brief = form.into_brief()?;

    let bytes = export_docx(&brief)?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let path = output.join(brief.export_file_name());
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());

    if save {
        let config = load_config(config_path)?;
        let store = open_store(&config.store.path)?;
        let id = store.save(&NewOrder::from_brief(&brief))?;
        tracing::info!("Saved order #{} to {}", id, config.store.path.display());
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRIEF: &str = r#"
order_name = "Pool Party"
deadline_date = "2026-07-01"
deadline_time = "09:30"
platform = "Instagram"
layout = "Story"
headline = "Splash"
"#;

    #[tokio::test]
    async fn writes_named_document() {
        let dir = tempfile::tempdir().unwrap();
        let brief_path = dir.path().join("pool.toml");
        fs::write(&brief_path, BRIEF).unwrap();
        let out = dir.path().join("out");

        let path = run(&dir.path().join("brief.toml"), &brief_path, &out, false)
            .await
            .unwrap();

        assert_eq!(path, out.join("Brief_Pool Party.docx"));
        assert!(fs::read(&path).unwrap().starts_with(b"PK"));
    }

    #[tokio::test]
    async fn save_flag_appends_history() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("orders.db");
        let config_path = dir.path().join("brief.toml");
        fs::write(
            &config_path,
            format!("[store]\npath = {:?}\n", db.display().to_string()),
        )
        .unwrap();
        let brief_path = dir.path().join("pool.toml");
        fs::write(&brief_path, BRIEF).unwrap();

        run(&config_path, &brief_path, dir.path(), true).await.unwrap();

        let rows = open_store(&db).unwrap().history().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content_summary.as_deref(), Some("Splash..."));
    }

    #[tokio::test]
    async fn refuses_brief_without_name() {
        let dir = tempfile::tempdir().unwrap();
        let brief_path = dir.path().join("blank.toml");
        fs::write(&brief_path, "platform = \"Offline\"\n").unwrap();

        let err = run(&dir.path().join("brief.toml"), &brief_path, dir.path(), false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Order name is required"));
    }
}
