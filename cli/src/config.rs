use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub store_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the record store location, honouring an explicit `--store` path.
    pub fn load(store_override: Option<PathBuf>) -> Result<Self> {
        if let Some(store_path) = store_override {
            let data_dir = store_path
                .parent()
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            return Ok(Config {
                store_path,
                data_dir,
            });
        }

        let proj_dirs =
            ProjectDirs::from("", "", "steady").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let store_path = data_dir.join("steady.json");

        Ok(Config {
            store_path,
            data_dir,
        })
    }
}
