// Dashboard configuration
//
// Defaults, optionally overridden by a TOML file, then by CLI flags.

use crate::error::ConfigError;
use crate::export::ExportScope;
use crate::grid::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::render::{RenderOptions, DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Replacement dataset; None uses the embedded one
    pub data_path: Option<PathBuf>,

    pub page_size: usize,

    /// strftime format for the Hire Date column
    pub date_format: String,

    pub export_path: PathBuf,
    pub export_scope: ExportScope,

    /// API bind address
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            export_path: PathBuf::from("employees.csv"),
            export_scope: ExportScope::All,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    /// Load `path` when given, otherwise defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            date_format: self.date_format.clone(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
