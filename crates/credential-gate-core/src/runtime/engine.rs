// crates/credential-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Validation Engine
// Description: Orchestrates resolution, structural checks, and runtime rules.
// Purpose: Turn a document and schema reference into one verdict.
// Dependencies: crate::{core, interfaces, runtime}, serde, thiserror
// ============================================================================

//! ## Overview
//! The engine resolves the compiled schema, runs the structural validator and
//! the rule set independently over the same borrowed document, then composes
//! a verdict. Runtime rules run even when structural validation fails, so
//! reports show every defect at once. The only failures are schema
//! resolution failures; document defects are always violations.
//!
//! Security posture: documents are untrusted input; rules read them through
//! typed field readers and never panic on unexpected shapes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::ReferenceTime;
use crate::core::SchemaRef;
use crate::core::Verdict;
use crate::interfaces::SchemaError;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::ValidationAuditEvent;
use crate::runtime::audit::ValidationAuditSink;
use crate::runtime::composer::compose;
use crate::runtime::composer::compose_structural_only;
use crate::runtime::registry::SchemaRegistry;
use crate::runtime::rules::RuleSet;
use crate::runtime::structural::StructuralValidator;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Which validation stages run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Structural validation plus runtime rules.
    #[default]
    Full,
    /// Structural validation only; verdicts record that rules did not run.
    StructuralOnly,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Stages to run for every validation call.
    pub mode: ValidationMode,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The schema for the requested reference could not be resolved.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Credential validation engine.
///
/// # Invariants
/// - Validation is a pure function of `(document, schema_ref, reference_time)`
///   for a fixed registry and rule set.
/// - The engine is `Send + Sync`; one instance serves concurrent callers.
pub struct ValidationEngine {
    /// Compiled schema cache.
    registry: Arc<SchemaRegistry>,
    /// Runtime rules, fixed at construction.
    rules: RuleSet,
    /// Engine configuration.
    config: EngineConfig,
    /// Audit sink for validation events.
    audit: Arc<dyn ValidationAuditSink>,
}

impl ValidationEngine {
    /// Creates an engine over a registry and rule set.
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>, rules: RuleSet, config: EngineConfig) -> Self {
        Self {
            registry,
            rules,
            config,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Routes validation events to an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the schema registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Returns the runtime rule set.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Validates a document against a schema at a reference time.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Schema`] when the schema cannot be resolved.
    pub fn validate(
        &self,
        document: &Value,
        schema_ref: SchemaRef,
        reference_time: ReferenceTime,
    ) -> Result<Verdict, EngineError> {
        let compiled = self.registry.resolve(schema_ref)?;
        let structural = StructuralValidator::validate(compiled.as_ref(), document);
        let verdict = match self.config.mode {
            ValidationMode::Full => {
                let runtime = self.rules.evaluate(document, schema_ref, reference_time);
                compose(structural, runtime)
            }
            ValidationMode::StructuralOnly => compose_structural_only(structural),
        };
        self.audit.record_validation(&ValidationAuditEvent::new(
            schema_ref,
            reference_time,
            &verdict,
        ));
        Ok(verdict)
    }
}
