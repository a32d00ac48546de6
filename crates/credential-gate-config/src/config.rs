// crates/credential-gate-config/src/config.rs
// ============================================================================
// Module: Credential Gate Configuration
// Description: Configuration loading and validation for Credential Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: credential-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults, so an absent default config file yields the
//! builtin behavior. An explicitly named file that cannot be read is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use credential_gate_core::EngineConfig;
use credential_gate_core::RuleCatalogOptions;
use credential_gate_core::RuleId;
use credential_gate_core::ValidationMode;
use credential_gate_core::runtime::builtin_rule_ids;
use credential_gate_core::runtime::is_staleness_rule;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "credential-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CREDENTIAL_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum schema artifact size in bytes.
const DEFAULT_MAX_SCHEMA_BYTES: usize = 1024 * 1024;
/// Upper bound for the schema artifact size limit.
const MAX_SCHEMA_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Default maximum credential document size in bytes.
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Upper bound for the document size limit.
const MAX_DOCUMENT_BYTES_LIMIT: usize = 64 * 1024 * 1024;
/// Longest staleness window accepted, in days.
const MAX_STALENESS_DAYS: i64 = 3650;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Credential Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialGateConfig {
    /// Schema artifact configuration.
    #[serde(default)]
    pub schemas: SchemasConfig,
    /// Validation stage configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Builtin rule catalog adjustments.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// File the configuration was read from, when any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl CredentialGateConfig {
    /// Loads configuration from disk using the standard resolution order.
    ///
    /// Resolution: explicit `path`, then `CREDENTIAL_GATE_CONFIG`, then
    /// `credential-gate.toml` in the working directory. Only the last one may
    /// be absent, in which case defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if !explicit && err.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text cannot be parsed or validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schemas.validate()?;
        self.validation.validate()?;
        self.rules.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            mode: self.validation.mode,
        }
    }

    /// Returns the rule catalog options.
    #[must_use]
    pub fn catalog_options(&self) -> RuleCatalogOptions {
        self.rules.catalog_options()
    }
}

/// Schema artifact configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemasConfig {
    /// Directory holding `{type}/{version}/` schema artifacts. Builtin
    /// schemas are used when unset.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Maximum schema artifact size in bytes.
    #[serde(default = "default_max_schema_bytes")]
    pub max_schema_bytes: usize,
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_schema_bytes: default_max_schema_bytes(),
        }
    }
}

impl SchemasConfig {
    /// Validates schema configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            validate_path_string("schemas.root", &root.to_string_lossy())?;
        }
        validate_limit("schemas.max_schema_bytes", self.max_schema_bytes, MAX_SCHEMA_BYTES_LIMIT)
    }
}

/// Validation stage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Which validation stages run.
    #[serde(default)]
    pub mode: ValidationMode,
    /// Assert `format` keywords during structural validation (default on).
    #[serde(default = "default_validate_formats")]
    pub validate_formats: bool,
    /// Maximum credential document size in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            validate_formats: default_validate_formats(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit(
            "validation.max_document_bytes",
            self.max_document_bytes,
            MAX_DOCUMENT_BYTES_LIMIT,
        )
    }
}

/// Builtin rule catalog adjustments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule ids to leave out of evaluation.
    #[serde(default)]
    pub disabled: Vec<RuleId>,
    /// Replacement staleness windows in days, keyed by rule id.
    #[serde(default)]
    pub staleness_days: BTreeMap<RuleId, i64>,
}

impl RulesConfig {
    /// Validates rule adjustments against the builtin catalog.
    fn validate(&self) -> Result<(), ConfigError> {
        let known: BTreeSet<RuleId> = builtin_rule_ids().into_iter().collect();
        let mut seen = BTreeSet::new();
        for rule_id in &self.disabled {
            if !known.contains(rule_id) {
                return Err(ConfigError::Invalid(format!("rules.disabled: unknown rule {rule_id}")));
            }
            if !seen.insert(rule_id) {
                return Err(ConfigError::Invalid(format!("rules.disabled: duplicate rule {rule_id}")));
            }
        }
        for (rule_id, days) in &self.staleness_days {
            if !known.contains(rule_id) {
                return Err(ConfigError::Invalid(format!(
                    "rules.staleness_days: unknown rule {rule_id}"
                )));
            }
            if !is_staleness_rule(rule_id) {
                return Err(ConfigError::Invalid(format!(
                    "rules.staleness_days: {rule_id} is not a staleness rule"
                )));
            }
            if !(1 ..= MAX_STALENESS_DAYS).contains(days) {
                return Err(ConfigError::Invalid(format!(
                    "rules.staleness_days.{rule_id} must be between 1 and {MAX_STALENESS_DAYS}"
                )));
            }
        }
        Ok(())
    }

    /// Converts the adjustments into catalog options.
    #[must_use]
    pub fn catalog_options(&self) -> RuleCatalogOptions {
        RuleCatalogOptions {
            disabled: self.disabled.iter().cloned().collect(),
            staleness_overrides: self
                .staleness_days
                .iter()
                .map(|(rule_id, days)| (rule_id.clone(), Duration::days(*days)))
                .collect(),
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Where audit events go.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink = \"file\" requires audit.path".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default schema size limit.
const fn default_max_schema_bytes() -> usize {
    DEFAULT_MAX_SCHEMA_BYTES
}

/// Default format assertion toggle.
const fn default_validate_formats() -> bool {
    true
}

/// Default document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a byte limit is positive and bounded.
fn validate_limit(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > max {
        return Err(ConfigError::Invalid(format!("{field} must be at most {max}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let result = validate_path_string("schemas.root", "   ");
        assert!(result.is_err(), "whitespace-only path should fail");
    }

    #[test]
    fn validate_limit_rejects_zero_and_oversized() {
        assert!(validate_limit("limit", 0, 10).is_err());
        assert!(validate_limit("limit", 11, 10).is_err());
        assert!(validate_limit("limit", 10, 10).is_ok());
    }
}
