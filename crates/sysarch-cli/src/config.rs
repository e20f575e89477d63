//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use sysarch_domain::ScoringConfig;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active workspace name
    #[serde(default = "default_workspace")]
    pub active_workspace: String,

    /// Available workspaces
    #[serde(default)]
    pub workspaces: BTreeMap<String, Workspace>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Scoring rules used by `architecture score` and `shortfall`
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// A model data file and the project commands default to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// JSON snapshot holding the model
    pub data_file: PathBuf,

    /// Default project (name or id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the configuration and default data file.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sysarch"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::path()?)
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::path()?)
    }

    /// Save configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active workspace.
    pub fn active(&self) -> Result<&Workspace> {
        self.workspaces.get(&self.active_workspace).ok_or_else(|| {
            CliError::Config(format!("Workspace '{}' not found", self.active_workspace))
        })
    }

    /// Add or update a workspace.
    pub fn set_workspace(&mut self, name: String, workspace: Workspace) {
        self.workspaces.insert(name, workspace);
    }

    /// Switch to a different workspace.
    pub fn switch_workspace(&mut self, name: String) -> Result<()> {
        if !self.workspaces.contains_key(&name) {
            return Err(CliError::Config(format!(
                "Workspace '{}' does not exist",
                name
            )));
        }
        self.active_workspace = name;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut workspaces = BTreeMap::new();
        workspaces.insert(
            default_workspace(),
            Workspace {
                data_file: default_data_file(),
                project: None,
            },
        );

        Self {
            active_workspace: default_workspace(),
            workspaces,
            settings: Settings::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_workspace() -> String {
    "default".to_string()
}

fn default_data_file() -> PathBuf {
    Config::home()
        .map(|home| home.join("model.json"))
        .unwrap_or_else(|_| PathBuf::from("sysarch-model.json"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
