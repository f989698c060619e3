// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application configuration: optional `config.toml` in the platform config
//! dir, then `MATCHCREDITS_*` environment overrides.
//!
//! ```toml
//! club = "Liverpool"
//! namespace = "thlfc"
//! database = "/home/me/.local/share/matchcredits/matchcredits.sqlite"
//! fixtures_file = "/home/me/fixtures.json"
//! ```

use crate::db::{default_db_path, project_dirs};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_DB: &str = "MATCHCREDITS_DB";
pub const ENV_CLUB: &str = "MATCHCREDITS_CLUB";
pub const ENV_FIXTURES: &str = "MATCHCREDITS_FIXTURES";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub club: Option<String>,
    pub namespace: Option<String>,
    pub database: Option<PathBuf>,
    pub fixtures_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Club whose fixtures are tracked; decides home/away on calendar import.
    pub club: String,
    /// Prefix of exported file names.
    pub namespace: String,
    pub database: PathBuf,
    /// Static fixture list used until a calendar feed is imported.
    pub fixtures_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_parts(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        db_default: PathBuf,
    ) -> AppConfig {
        AppConfig {
            club: env(ENV_CLUB)
                .or(file.club)
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "Liverpool".to_string()),
            namespace: file
                .namespace
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "thlfc".to_string()),
            database: env(ENV_DB)
                .map(PathBuf::from)
                .or(file.database)
                .unwrap_or(db_default),
            fixtures_file: env(ENV_FIXTURES).map(PathBuf::from).or(file.fixtures_file),
        }
    }

    /// Read the embedded fixture list, if one is configured.
    pub fn embedded_fixtures(&self) -> Result<Option<String>> {
        match &self.fixtures_file {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("Read fixtures file {}", path.display())),
            None => Ok(None),
        }
    }
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn load_app_configuration() -> Result<AppConfig> {
    let cfg_path = project_dirs()?.config_dir().join("config.toml");
    let file = if cfg_path.exists() {
        debug!(path = %cfg_path.display(), "loading config file");
        load_file_config(&cfg_path)?
    } else {
        FileConfig::default()
    };
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    let db_default = match env(ENV_DB).map(PathBuf::from).or_else(|| file.database.clone()) {
        Some(p) => p,
        None => default_db_path()?,
    };
    Ok(AppConfig::from_parts(file, env, db_default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file_config() {
        let file: FileConfig = toml::from_str(
            r#"
            club = "Everton"
            fixtures_file = "/tmp/fx.json"
        "#,
        )
        .unwrap();
        let cfg = AppConfig::from_parts(file, |_| None, PathBuf::from("/data/mc.sqlite"));
        assert_eq!(cfg.club, "Everton");
        assert_eq!(cfg.namespace, "thlfc");
        assert_eq!(cfg.database, PathBuf::from("/data/mc.sqlite"));
        assert_eq!(cfg.fixtures_file, Some(PathBuf::from("/tmp/fx.json")));
    }

    #[test]
    fn environment_overrides_file() {
        let file = FileConfig {
            club: Some("Everton".into()),
            database: Some(PathBuf::from("/from/file.sqlite")),
            ..FileConfig::default()
        };
        let env = |key: &str| match key {
            ENV_CLUB => Some("Liverpool".to_string()),
            ENV_DB => Some("/from/env.sqlite".to_string()),
            _ => None,
        };
        let cfg = AppConfig::from_parts(file, env, PathBuf::from("/default.sqlite"));
        assert_eq!(cfg.club, "Liverpool");
        assert_eq!(cfg.database, PathBuf::from("/from/env.sqlite"));
        assert_eq!(cfg.fixtures_file, None);
    }
}
