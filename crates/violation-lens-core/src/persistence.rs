//! Rule-set files
//!
//! A registry snapshot stored as TOML or JSON, chosen by file extension.
//! Loading goes through the same validation as `set_patterns`: one invalid
//! pattern aborts the load and the registry keeps its previous state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::category::CategoryDef;
use crate::error::{Result, ViolationError};
use crate::registry::{PatternRegistry, RegistrySnapshot};

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSetFormat {
    Toml,
    Json,
}

impl RuleSetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ViolationError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// On-disk rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFile {
    pub version: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    pub patterns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
    /// Explicit keywords only; derived ones are rebuilt on load
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, Vec<String>>,
}

impl PatternFile {
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Self {
        let keywords = snapshot
            .to_defs()
            .into_iter()
            .filter(|def| !def.keywords.is_empty())
            .map(|def| (def.name, def.keywords))
            .collect();

        Self {
            version: FORMAT_VERSION.to_string(),
            is_custom: snapshot.is_custom(),
            saved_at: Some(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            patterns: snapshot.pattern_map().clone(),
            descriptions: snapshot.descriptions(),
            keywords,
        }
    }

    pub fn to_defs(&self) -> Vec<CategoryDef> {
        self.patterns
            .iter()
            .map(|(name, patterns)| CategoryDef {
                name: name.clone(),
                patterns: patterns.clone(),
                keywords: self.keywords.get(name).cloned().unwrap_or_default(),
                description: self.descriptions.get(name).cloned(),
            })
            .collect()
    }

    pub fn read(path: &Path) -> Result<Self> {
        let format = RuleSetFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;

        let parse_error = |message: String| ViolationError::PersistenceParse {
            path: path.to_path_buf(),
            message,
        };
        match format {
            RuleSetFormat::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            RuleSetFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let content = match RuleSetFormat::from_path(path)? {
            RuleSetFormat::Toml => toml::to_string_pretty(self)?,
            RuleSetFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

/// Write the registry's current snapshot to `path`
pub fn save_patterns(registry: &PatternRegistry, path: &Path) -> Result<()> {
    let file = PatternFile::from_snapshot(&registry.snapshot());
    file.write(path)?;
    info!(
        "Saved {} categories to {}",
        file.patterns.len(),
        path.display()
    );
    Ok(())
}

/// Replace the registry's rule set with the one stored at `path`
pub fn load_patterns(registry: &PatternRegistry, path: &Path) -> Result<Arc<RegistrySnapshot>> {
    let file = PatternFile::read(path)?;
    let snapshot = registry.replace_all(file.to_defs(), file.is_custom)?;
    info!(
        "Loaded {} categories from {} (version {})",
        snapshot.len(),
        path.display(),
        file.version
    );
    Ok(snapshot)
}
