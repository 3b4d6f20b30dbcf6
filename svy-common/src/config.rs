//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `SVY_CONFIG` environment variable
//! 3. User config file (`~/.config/svy/config.toml` on Linux)
//! 4. System config file (`/etc/svy/config.toml`, Unix only)
//! 5. Compiled defaults (fallback)
//!
//! An explicitly requested file (1 or 2) must exist. Discovered files (3, 4)
//! are optional; when none is found the compiled defaults are used.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{AdminGate, Error, QuestionCatalog, RespondentId, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SVY_CONFIG";

/// Default HTTP bind address for the status service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5790";

/// Default SSE event buffer per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Built-in question set used when no config file provides one
pub const DEFAULT_QUESTIONS: [&str; 6] = [
    "1. The parent education programme is a mandatory normative document for every kindergarten.",
    "2. One principle of parent education is the priority of the family in upbringing, teaching and development.",
    "3. The main audience of the programme is preschool teaching staff.",
    "4. Nobody except kindergarten teachers may educate the parents of pupils.",
    "5. The parent education programme is a new additional section of the federal preschool curriculum.",
    "6. The topics and forms of interaction offered by the programme are examples that teachers may adapt.",
];

/// Survey configuration as read from TOML
///
/// ```toml
/// bind_addr = "0.0.0.0:5790"
/// admin_ids = [123456789, "ops-console"]
/// questions = ["First question?", "Second question?"]
/// public_status = false
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub bind_addr: String,
    /// Privileged identities: excluded from voting, allowed to reset/export
    pub admin_ids: Vec<RespondentId>,
    /// Question texts in canonical order
    pub questions: Vec<String>,
    pub event_capacity: usize,
    /// Serve aggregate status without an admin identity
    pub public_status: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            admin_ids: Vec::new(),
            questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            public_status: true,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    CompiledDefaults,
}

impl SurveyConfig {
    /// Parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SurveyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Catalog construction carries the question rules
        QuestionCatalog::new(self.questions.iter().cloned())?;
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Resolve and load configuration following the priority order above
    pub fn resolve(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = cli_arg {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, ConfigSource::File(path)));
        }

        for candidate in discovered_config_paths() {
            if candidate.exists() {
                info!("Using config file {}", candidate.display());
                return Ok((Self::load(&candidate)?, ConfigSource::File(candidate)));
            }
        }

        warn!("No config file found, using compiled defaults");
        Ok((Self::default(), ConfigSource::CompiledDefaults))
    }

    pub fn catalog(&self) -> Result<QuestionCatalog> {
        QuestionCatalog::new(self.questions.iter().cloned())
    }

    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.admin_ids.iter().cloned())
    }
}

/// Optional config file locations, highest priority first
fn discovered_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("svy").join("config.toml"));
    }
    if cfg!(unix) {
        paths.push(PathBuf::from("/etc/svy/config.toml"));
    }
    paths
}
