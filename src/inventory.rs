//! Installed package inventory

use serde::{Deserialize, Serialize};

/// Package flag bit marking a system (preinstalled) package
pub const FLAG_SYSTEM: u32 = 1;

/// One installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInventoryEntry {
    pub name: String,
    pub is_system: bool,
}

impl PackageInventoryEntry {
    pub fn new(name: impl Into<String>, is_system: bool) -> Self {
        Self {
            name: name.into(),
            is_system,
        }
    }

    /// Build an entry from the raw package manager flags
    pub fn from_flags(name: impl Into<String>, flags: u32) -> Self {
        Self::new(name, flags & FLAG_SYSTEM == FLAG_SYSTEM)
    }

    pub fn type_label(&self) -> &'static str {
        if self.is_system {
            "System"
        } else {
            "Installed"
        }
    }
}
