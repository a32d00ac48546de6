// crates/credential-gate-cli/src/setup.rs
// ============================================================================
// Module: Engine Setup
// Description: Assembles a validation engine from loaded configuration.
// Purpose: Map config sections onto schema source, backend, rules, and audit.
// Dependencies: credential-gate-config, credential-gate-core, credential-gate-schemas
// ============================================================================

//! ## Overview
//! Configuration decides three things: where schema artifacts come from
//! (embedded builtins or a directory tree), how strictly the `jsonschema`
//! backend treats `format`, and which builtin rules run with which staleness
//! windows. The audit sink is shared by the registry and the engine so schema
//! resolution and validation events land in the same stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use credential_gate_config::AuditSinkKind;
use credential_gate_config::CredentialGateConfig;
use credential_gate_core::EngineConfig;
use credential_gate_core::RuleSetError;
use credential_gate_core::SchemaRef;
use credential_gate_core::SchemaRegistry;
use credential_gate_core::SchemaSource;
use credential_gate_core::ValidationEngine;
use credential_gate_core::ValidationMode;
use credential_gate_core::builtin_rule_set;
use credential_gate_core::runtime::FileAuditSink;
use credential_gate_core::runtime::NoopAuditSink;
use credential_gate_core::runtime::StderrAuditSink;
use credential_gate_core::runtime::ValidationAuditSink;
use credential_gate_schemas::BuiltinSchemaSource;
use credential_gate_schemas::DirectorySchemaSource;
use credential_gate_schemas::JsonSchemaBackend;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Engine assembly failures.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The audit log could not be opened.
    #[error("failed to open audit log {path}: {error}")]
    AuditLog {
        /// Configured audit log path.
        path: String,
        /// I/O diagnostic.
        error: String,
    },
    /// The builtin rule set rejected the configured adjustments.
    #[error(transparent)]
    Rules(#[from] RuleSetError),
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds a validation engine from configuration.
///
/// `mode` overrides `validation.mode` (the CLI `--structural-only` flag).
///
/// # Errors
///
/// Returns [`SetupError`] when the audit log cannot be opened or the rule
/// adjustments are rejected.
pub fn build_engine(
    config: &CredentialGateConfig,
    mode: Option<ValidationMode>,
) -> Result<ValidationEngine, SetupError> {
    let audit = audit_sink(config)?;
    let backend = JsonSchemaBackend::new().with_format_validation(config.validation.validate_formats);
    let registry =
        SchemaRegistry::new(schema_source(config), Arc::new(backend)).with_audit(Arc::clone(&audit));
    let rules = builtin_rule_set(&config.catalog_options())?;
    let engine_config = EngineConfig {
        mode: mode.unwrap_or(config.engine_config().mode),
    };
    Ok(ValidationEngine::new(Arc::new(registry), rules, engine_config).with_audit(audit))
}

/// Returns the human-readable artifact location for a schema reference.
#[must_use]
pub fn schema_location(config: &CredentialGateConfig, schema_ref: SchemaRef) -> String {
    match &config.schemas.root {
        Some(root) => DirectorySchemaSource::new(root).artifact_path(schema_ref).display().to_string(),
        None => format!("builtin:{}", schema_ref.artifact_path()),
    }
}

/// Selects the schema source.
fn schema_source(config: &CredentialGateConfig) -> Arc<dyn SchemaSource> {
    match &config.schemas.root {
        Some(root) => Arc::new(
            DirectorySchemaSource::new(root).with_max_bytes(config.schemas.max_schema_bytes),
        ),
        None => Arc::new(BuiltinSchemaSource),
    }
}

/// Opens the configured audit sink.
fn audit_sink(config: &CredentialGateConfig) -> Result<Arc<dyn ValidationAuditSink>, SetupError> {
    match (config.audit.sink, &config.audit.path) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| SetupError::AuditLog {
                path: path.display().to_string(),
                error: err.to_string(),
            })?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::File, None) => Err(SetupError::AuditLog {
            path: String::new(),
            error: "audit.path is not set".to_string(),
        }),
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
    }
}
