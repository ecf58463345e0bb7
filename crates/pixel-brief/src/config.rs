//! Configuration file (brief.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pixel_brief_server::ServerConfig;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub theme: ThemeSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub open: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct StoreSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ThemeSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default)]
    pub tagline: Option<String>,
    /// Background image, a sky gradient is used when missing
    #[serde(default = "default_background")]
    pub background: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub minify: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: true,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            heading: default_heading(),
            tagline: None,
            background: default_background(),
            minify: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8501
}
fn default_true() -> bool {
    true
}
fn default_db_path() -> PathBuf {
    PathBuf::from("briefs.db")
}
fn default_title() -> String {
    "Pixel Resort Briefs".to_string()
}
fn default_heading() -> String {
    "Order Brief WSKL".to_string()
}
fn default_background() -> Option<PathBuf> {
    Some(PathBuf::from("bg.jpg"))
}

impl ConfigFile {
    /// Server settings from this file.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.server.port,
            host: self.server.host.clone(),
            title: self.theme.title.clone(),
            heading: self.theme.heading.clone(),
            tagline: self.theme.tagline.clone(),
            db_path: self.store.path.clone(),
            background: self.theme.background.clone(),
            minify_css: self.theme.minify,
            open: self.server.open,
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

/// Default config written by `init`.
pub const DEFAULT_CONFIG: &str = r#"# pixel-brief configuration

[server]
# Address the builder is served on
host = "127.0.0.1"
port = 8501

# Open the browser when the server starts
open = true

[store]
# SQLite file holding saved briefs
path = "briefs.db"

[theme]
# Browser tab title
title = "Pixel Resort Briefs"

# Heading at the top of the page, with an optional line under it
heading = "Order Brief WSKL"
# tagline = "Pixel Resort creative orders"

# Background image, a sky gradient is used when the file is missing
background = "bg.jpg"

# Minify the stylesheet
minify = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config("[server]\nport = 9000\n").unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.path, PathBuf::from("briefs.db"));
        assert_eq!(config.theme.title, "Pixel Resort Briefs");
    }

    #[test]
    fn maps_to_server_config() {
        let config = parse_config("[store]\npath = \"data/orders.db\"\n[theme]\nminify = false\n")
            .unwrap()
            .server_config();

        assert_eq!(config.db_path, PathBuf::from("data/orders.db"));
        assert!(!config.minify_css);
        assert_eq!(config.port, 8501);
        assert_eq!(config.heading, "Order Brief WSKL");
        assert_eq!(config.tagline, None);
    }

    #[test]
    fn heading_and_tagline_are_configurable() {
        let config = parse_config(
            "[theme]\nheading = \"Resort Orders\"\ntagline = \"Hit save\"\n",
        )
        .unwrap()
        .server_config();

        assert_eq!(config.heading, "Resort Orders");
        assert_eq!(config.tagline.as_deref(), Some("Hit save"));
        assert_eq!(config.title, "Pixel Resort Briefs");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("brief.toml")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
