// crates/credential-gate-core/src/core/verdict.rs
// ============================================================================
// Module: Verdicts
// Description: Immutable validation results and their builder.
// Purpose: Guarantee `is_valid == violations.is_empty()` and stable ordering.
// Dependencies: crate::core::violation, serde
// ============================================================================

//! ## Overview
//! A [`Verdict`] is the complete result of one validation call. It can only be
//! produced by [`VerdictBuilder`], which sorts violations canonically and
//! derives validity from emptiness, so a frozen verdict cannot disagree with
//! itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::violation::Tier;
use crate::core::violation::Violation;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Complete, immutable result of one validation call.
///
/// # Invariants
/// - `is_valid == violations.is_empty()`.
/// - Violations are sorted by `(tier, rule_id, path, message)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// True when no violation was found.
    is_valid: bool,
    /// Whether the runtime rule set was evaluated.
    runtime_evaluated: bool,
    /// Sorted violations.
    violations: Vec<Violation>,
}

impl Verdict {
    /// Returns true when the document has no violations.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Returns true when runtime rules ran for this verdict.
    #[must_use]
    pub const fn runtime_evaluated(&self) -> bool {
        self.runtime_evaluated
    }

    /// Returns the sorted violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true when at least one violation has the given tier.
    #[must_use]
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.violations.iter().any(|violation| violation.tier() == tier)
    }

    /// Counts violations per tier.
    #[must_use]
    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for violation in &self.violations {
            match violation.tier() {
                Tier::Structural => counts.structural += 1,
                Tier::Tier1Critical => counts.tier1_critical += 1,
                Tier::Tier2Consistency => counts.tier2_consistency += 1,
            }
        }
        counts
    }
}

/// Violation counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    /// Structural violations.
    pub structural: usize,
    /// Tier 1 critical violations.
    pub tier1_critical: usize,
    /// Tier 2 consistency violations.
    pub tier2_consistency: usize,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates violations during composition and freezes them into a verdict.
#[derive(Debug, Default)]
pub struct VerdictBuilder {
    /// Violations collected so far, in arrival order.
    violations: Vec<Violation>,
    /// Whether the runtime rule set was evaluated.
    runtime_evaluated: bool,
}

impl VerdictBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whether runtime rules were evaluated.
    #[must_use]
    pub const fn runtime_evaluated(mut self, evaluated: bool) -> Self {
        self.runtime_evaluated = evaluated;
        self
    }

    /// Appends one violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Appends a batch of violations.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    /// Sorts the collected violations and freezes the verdict.
    #[must_use]
    pub fn build(mut self) -> Verdict {
        self.violations.sort_by(Violation::report_cmp);
        Verdict {
            is_valid: self.violations.is_empty(),
            runtime_evaluated: self.runtime_evaluated,
            violations: self.violations,
        }
    }
}
