use crate::stats::CategoryRule;
use serde::{Deserialize, Serialize};
use sheetlens_sheet::ExportOptions;
use thiserror::Error;

/// Rows shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

// Excel's limit on sheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Errors raised while loading or validating a viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("page_size must be at least 1")]
    ZeroPageSize,

    #[error("Invalid export sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: &'static str },
}

/// Settings for one viewer instance.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub page_size: usize,
    pub category: CategoryRule,
    pub export: ExportOptions,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            page_size: DEFAULT_PAGE_SIZE,
            category: CategoryRule::default(),
            export: ExportOptions::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let name = &self.export.sheet_name;
        let reason = if name.trim().is_empty() {
            Some("name is empty")
        } else if name.chars().count() > MAX_SHEET_NAME_LEN {
            Some("name is longer than 31 characters")
        } else if name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
            Some("name contains one of []:*?/\\")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidSheetName {
                name: name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
