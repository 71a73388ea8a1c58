//! Error taxonomy and report diagnostics
//!
//! Missing and malformed sources never abort a report. They surface as
//! [`ReportError`] values which the report builder turns into [`Diagnostic`]s
//! before moving on to the next section.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Data source a condition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    EventTrace,
    UsageHistory,
    PackageInventory,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputSource::EventTrace => "event trace",
            InputSource::UsageHistory => "usage history",
            InputSource::PackageInventory => "package inventory",
        };
        f.write_str(name)
    }
}

/// Non-fatal conditions raised while assembling a report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("missing {input}: {reason}")]
    MissingInput { input: InputSource, reason: String },

    #[error("cannot parse {input}: {reason}")]
    MalformedInput { input: InputSource, reason: String },
}

impl ReportError {
    pub fn missing(input: InputSource, reason: impl Into<String>) -> Self {
        ReportError::MissingInput {
            input,
            reason: reason.into(),
        }
    }

    pub fn malformed(input: InputSource, reason: impl Into<String>) -> Self {
        ReportError::MalformedInput {
            input,
            reason: reason.into(),
        }
    }

    /// Missing sources are warnings, malformed sources are errors
    pub fn severity(&self) -> Severity {
        match self {
            ReportError::MissingInput { .. } => Severity::Low,
            ReportError::MalformedInput { .. } => Severity::High,
        }
    }

    pub fn input(&self) -> InputSource {
        match self {
            ReportError::MissingInput { input, .. } | ReportError::MalformedInput { input, .. } => {
                *input
            }
        }
    }
}

/// Result type for report sections
pub type Result<T> = std::result::Result<T, ReportError>;

/// How loudly a diagnostic should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
}

/// A condition reported alongside the generated tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl From<&ReportError> for Diagnostic {
    fn from(err: &ReportError) -> Self {
        Self {
            severity: err.severity(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Low => "warning",
            Severity::High => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
