//! Report configuration loaded from TOML
//!
//! # Example
//!
//! ```toml
//! [report]
//! now_ms = 1700000000000
//! component_filter = "^com\\.android\\."
//! sort_column = "Age"
//! descending = true
//!
//! [output]
//! format = "html"
//! csv_dir = "out/csv"
//! ```

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Reference time for usage ages; the wall clock when unset
    pub now_ms: Option<i64>,
    /// Only components matching this regex appear in the component table
    pub component_filter: Option<String>,
    /// Column (display name or export key) used to sort the usage table
    pub sort_column: Option<String>,
    pub descending: bool,
}

/// Settings for the rendered output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub format: Option<OutputFormat>,
    /// Directory receiving one CSV file per table
    pub csv_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub report: ReportSettings,
    pub output: OutputSettings,
}

impl ReportConfig {
    /// Load and validate a configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.report.component_filter {
            Regex::new(pattern)
                .with_context(|| format!("component_filter is not a valid regex: {}", pattern))?;
        }
        if let Some(column) = &self.report.sort_column {
            if column.trim().is_empty() {
                anyhow::bail!("sort_column must not be empty");
            }
        }
        Ok(())
    }

    /// Compiled component filter, if configured
    pub fn component_filter(&self) -> Result<Option<Regex>> {
        self.report
            .component_filter
            .as_deref()
            .map(|p| Regex::new(p).context("Invalid component filter"))
            .transpose()
    }
}
