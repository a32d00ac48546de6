// crates/credential-gate-core/src/core/violation.rs
// ============================================================================
// Module: Violations
// Description: Severity tiers and individual validation defects.
// Purpose: Provide the immutable unit of every verdict.
// Dependencies: crate::core::{identifiers, path}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Violation`] is one explainable defect: which rule fired, how severe it
//! is, where in the document it sits, and the parameters that make the message
//! actionable. Violations are values; they are collected, never thrown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::RuleId;
use crate::core::path::render_pointer;

// ============================================================================
// SECTION: Tier
// ============================================================================

/// Severity classification of a violation.
///
/// # Invariants
/// - `Structural` only originates from the structural validator.
/// - `Tier1Critical` and `Tier2Consistency` only originate from runtime rules.
/// - Declaration order defines report ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Schema shape, type, format, or declarative conditional failure.
    Structural,
    /// Critical business-rule failure detected at runtime.
    Tier1Critical,
    /// Data-consistency failure, often time dependent.
    Tier2Consistency,
}

impl Tier {
    /// Returns a stable label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Tier1Critical => "tier1_critical",
            Self::Tier2Consistency => "tier2_consistency",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Violation
// ============================================================================

/// One validation defect.
///
/// # Invariants
/// - Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Identifier of the rule that produced the defect.
    rule_id: RuleId,
    /// Severity tier.
    tier: Tier,
    /// Location of the defect as ordered path segments.
    path: Vec<String>,
    /// Human-readable explanation.
    message: String,
    /// Rule or engine parameters backing the message.
    params: BTreeMap<String, Value>,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(
        rule_id: RuleId,
        tier: Tier,
        path: Vec<String>,
        message: impl Into<String>,
        params: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            rule_id,
            tier,
            path,
            message: message.into(),
            params,
        }
    }

    /// Returns the rule identifier.
    #[must_use]
    pub const fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    /// Returns the severity tier.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Returns the path segments.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the path rendered as a JSON pointer.
    #[must_use]
    pub fn pointer(&self) -> String {
        render_pointer(&self.path)
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    /// Canonical report ordering: tier, rule id, path, then message.
    #[must_use]
    pub fn report_cmp(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then_with(|| self.rule_id.cmp(&other.rule_id))
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}: {}", self.tier, self.rule_id, self.pointer(), self.message)
    }
}
