// crates/credential-gate-core/src/runtime/structural.rs
// ============================================================================
// Module: Structural Validator
// Description: Adapter from backend findings to structural violations.
// Purpose: Surface every shape, type, format, and conditional defect at once.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Structural validation is delegated entirely to the compiled schema, which
//! runs in collect-all mode. This adapter only translates each finding into a
//! [`Violation`] tagged [`Tier::Structural`] with a `structural.{keyword}` rule
//! id; backend parameters pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::RuleId;
use crate::core::Tier;
use crate::core::Violation;
use crate::interfaces::CompiledSchema;
use crate::interfaces::StructuralFinding;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Structural validation stage.
pub struct StructuralValidator;

impl StructuralValidator {
    /// Validates a document against a compiled schema.
    #[must_use]
    pub fn validate(schema: &dyn CompiledSchema, document: &Value) -> Vec<Violation> {
        schema.evaluate(document).into_iter().map(finding_to_violation).collect()
    }
}

/// Converts a backend finding into a structural violation.
fn finding_to_violation(finding: StructuralFinding) -> Violation {
    let keyword = if finding.keyword.is_empty() { "schema" } else { finding.keyword.as_str() };
    Violation::new(
        RuleId::structural(keyword),
        Tier::Structural,
        finding.path,
        finding.message,
        finding.params,
    )
}
