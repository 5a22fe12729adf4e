use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const DEFAULT_USER: &str = "local";

pub struct Config {
    pub db_path: PathBuf,
    pub user_id: String,
}

impl Config {
    /// Resolve paths, honouring `WEIGHIN_DB` and `WEIGHIN_USER` overrides.
    pub fn load() -> Result<Self> {
        let user_id = std::env::var("WEIGHIN_USER")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        if let Some(path) = std::env::var_os("WEIGHIN_DB") {
            return Ok(Config {
                db_path: PathBuf::from(path),
                user_id,
            });
        }

        let proj_dirs =
            ProjectDirs::from("", "", "weighin").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Config {
            db_path: data_dir.join("weighin.db"),
            user_id,
        })
    }
}
