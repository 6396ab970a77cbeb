//! Application settings file (`app_settings.json`).
//!
//! Stores the auxiliary file paths under `aux_file_paths`, keyed by
//! logical dataset name.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use corecheck_model::AuxPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub aux_file_paths: BTreeMap<String, String>,
}

impl AppSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parse settings: {}", path.display()))
    }

    pub fn aux_paths(&self) -> AuxPaths {
        self.aux_file_paths
            .iter()
            .map(|(name, path)| (name.as_str(), Path::new(path)))
            .collect()
    }
}
