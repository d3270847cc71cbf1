//! # Configuration Settings
//!
//! Defines the configuration structure for the documentation engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Error, Result};
use crate::openapi::{DocumentInfo, SecurityMode};

/// Config-schema major version this engine supports
pub const SUPPORTED_CONFIG_MAJOR: u32 = 2;

/// Main configuration of the documentation engine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentationSettings {
    /// Config-schema version; the major version must match
    /// [`SUPPORTED_CONFIG_MAJOR`]
    pub config_version: String,

    /// Security mode of the documented API
    pub security: SecurityMode,

    /// Identifier of the storage driver persisting the document
    #[validate(length(min = 1, message = "Driver identifier cannot be empty"))]
    pub driver: String,

    /// Maximum raw response examples retained per status node
    /// (0 = schema-only, no examples)
    pub response_example_limit_count: u64,

    /// Field names elided from error-status payloads before inference,
    /// to keep framework noise (tracebacks, file/line references) out of
    /// the accumulated schemas
    pub error_noise_fields: Vec<String>,

    /// Metadata of the published document
    pub info: DocumentInfo,

    /// Settings of the local file driver
    #[validate(nested)]
    pub local: LocalDriverSettings,
}

impl Default for DocumentationSettings {
    fn default() -> Self {
        Self {
            config_version: format!("{}.0", SUPPORTED_CONFIG_MAJOR),
            security: SecurityMode::None,
            driver: "local".to_string(),
            response_example_limit_count: 1,
            error_noise_fields: default_error_noise_fields(),
            info: DocumentInfo::default(),
            local: LocalDriverSettings::default(),
        }
    }
}

fn default_error_noise_fields() -> Vec<String> {
    ["exception", "trace", "file", "line"].map(String::from).to_vec()
}

impl DocumentationSettings {
    /// Validate the entire configuration
    ///
    /// Performs the construction-time checks: field-level validation plus
    /// the config-schema version gate.
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)
            .map_err(|errors| Error::validation(format!("Validation failed: {}", errors)))?;

        self.validate_version()?;

        Ok(())
    }

    /// Reject config-schema versions from an unsupported major version
    fn validate_version(&self) -> Result<()> {
        let major = self
            .config_version
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok());

        if major != Some(SUPPORTED_CONFIG_MAJOR) {
            return Err(Error::UnsupportedConfigVersion {
                found: self.config_version.clone(),
                expected: SUPPORTED_CONFIG_MAJOR,
            });
        }

        Ok(())
    }

    /// Create settings from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config_version =
            std::env::var("DOCPLANE_CONFIG_VERSION").unwrap_or(defaults.config_version);

        let security = match std::env::var("DOCPLANE_SECURITY") {
            Ok(mode) => mode.parse()?,
            Err(_) => SecurityMode::None,
        };

        let driver = std::env::var("DOCPLANE_DRIVER").unwrap_or(defaults.driver);

        let response_example_limit_count = std::env::var("DOCPLANE_EXAMPLE_LIMIT")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(defaults.response_example_limit_count);

        let error_noise_fields = std::env::var("DOCPLANE_ERROR_NOISE_FIELDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.error_noise_fields);

        let info = DocumentInfo {
            title: std::env::var("DOCPLANE_DOC_TITLE").unwrap_or(defaults.info.title),
            description: std::env::var("DOCPLANE_DOC_DESCRIPTION")
                .unwrap_or(defaults.info.description),
            version: std::env::var("DOCPLANE_DOC_VERSION").unwrap_or(defaults.info.version),
        };

        let local = LocalDriverSettings {
            accumulated_path: std::env::var("DOCPLANE_ACCUMULATED_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local.accumulated_path),
            production_path: std::env::var("DOCPLANE_PRODUCTION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.local.production_path),
        };

        Ok(Self {
            config_version,
            security,
            driver,
            response_example_limit_count,
            error_noise_fields,
            info,
            local,
        })
    }
}

/// Local file driver configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocalDriverSettings {
    /// Where the accumulated working document lives between exchanges
    pub accumulated_path: PathBuf,

    /// Production path the compiled document is published to
    pub production_path: PathBuf,
}

impl Default for LocalDriverSettings {
    fn default() -> Self {
        Self {
            accumulated_path: PathBuf::from("storage/temp_documentation.json"),
            production_path: PathBuf::from("storage/documentation.json"),
        }
    }
}

/// Observability configuration for structured logging
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}
