use crate::booking::ReceptionistPolicy;
use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding config files and session transcripts
pub const CONFIG_DIR: &str = ".medbook";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Booking behaviour
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BookingConfig {
    /// first | least-loaded | id:<n>
    #[serde(default)]
    pub receptionist_policy: Option<String>,
    /// strftime formats tried in order when reading a date
    #[serde(default)]
    pub date_formats: Option<Vec<String>>,
}

/// Where the clinic's records come from
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

pub fn default_date_formats() -> Vec<String> {
    vec!["%Y-%m-%d".to_string(), "%d/%m/%Y".to_string()]
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.medbook/config.local.toml) > project (.medbook/config.toml) > user (~/.medbook/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_layered(dirs::home_dir().as_deref(), Path::new("."))
    }

    /// Merge the user, project and local layers found under `home` and `root`
    pub fn load_layered(home: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let mut layers = Vec::new();
        if let Some(home) = home {
            layers.push(home.join(CONFIG_DIR).join("config.toml"));
        }
        layers.push(root.join(CONFIG_DIR).join("config.toml"));
        layers.push(root.join(CONFIG_DIR).join("config.local.toml"));

        for path in layers {
            if path.exists() {
                let layer = Self::load_from(&path)?;
                config.merge(layer);
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority when set)
    pub fn merge(&mut self, other: Config) {
        if other.booking.receptionist_policy.is_some() {
            self.booking.receptionist_policy = other.booking.receptionist_policy;
        }
        if other.booking.date_formats.is_some() {
            self.booking.date_formats = other.booking.date_formats;
        }
        if other.seed.file.is_some() {
            self.seed.file = other.seed.file;
        }
    }

    /// Effective receptionist policy; unparseable values fall back to the default
    pub fn receptionist_policy(&self) -> ReceptionistPolicy {
        self.booking
            .receptionist_policy
            .as_deref()
            .and_then(ReceptionistPolicy::from_str)
            .unwrap_or_default()
    }

    pub fn date_formats(&self) -> Vec<String> {
        self.booking
            .date_formats
            .clone()
            .unwrap_or_else(default_date_formats)
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(policy) = &self.booking.receptionist_policy {
            if ReceptionistPolicy::from_str(policy).is_none() {
                errors.push(ValidationError {
                    field: "booking.receptionist_policy".to_string(),
                    message: format!(
                        "Invalid policy '{}', expected first, least-loaded or id:<n>",
                        policy
                    ),
                });
            }
        }

        if let Some(formats) = &self.booking.date_formats {
            if formats.is_empty() {
                errors.push(ValidationError {
                    field: "booking.date_formats".to_string(),
                    message: "Must list at least one format".to_string(),
                });
            }
            for (i, fmt) in formats.iter().enumerate() {
                if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                    errors.push(ValidationError {
                        field: format!("booking.date_formats[{}]", i),
                        message: format!("Invalid date format '{}'", fmt),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
