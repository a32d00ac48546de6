// crates/credential-gate-core/src/runtime/composer.rs
// ============================================================================
// Module: Verdict Composer
// Description: Merges structural and runtime violations into one verdict.
// Purpose: Produce a single, canonically ordered result per validation call.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Composition concatenates both stages' violations without deduplication;
//! the same field may legitimately fail a structural and a runtime check.
//! Ordering and validity are delegated to [`VerdictBuilder`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Verdict;
use crate::core::VerdictBuilder;
use crate::core::Violation;

// ============================================================================
// SECTION: Composition
// ============================================================================

/// Merges structural and runtime violations into a verdict.
///
/// The result records that runtime rules were evaluated.
#[must_use]
pub fn compose(structural: Vec<Violation>, runtime: Vec<Violation>) -> Verdict {
    let mut builder = VerdictBuilder::new().runtime_evaluated(true);
    builder.extend(structural);
    builder.extend(runtime);
    builder.build()
}

/// Freezes structural violations alone into a verdict.
///
/// The result records that runtime rules were not evaluated.
#[must_use]
pub fn compose_structural_only(structural: Vec<Violation>) -> Verdict {
    let mut builder = VerdictBuilder::new().runtime_evaluated(false);
    builder.extend(structural);
    builder.build()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::RuleId;
    use crate::core::Tier;

    fn violation(rule_id: &str, tier: Tier, path: &[&str]) -> Violation {
        Violation::new(
            RuleId::new(rule_id),
            tier,
            path.iter().map(ToString::to_string).collect(),
            "defect",
            BTreeMap::new(),
        )
    }

    #[test]
    fn empty_inputs_compose_to_valid_verdict() {
        let verdict = compose(Vec::new(), Vec::new());
        assert!(verdict.is_valid());
        assert!(verdict.runtime_evaluated());
        assert!(verdict.violations().is_empty());
    }

    #[test]
    fn structural_tier_sorts_first_regardless_of_input_order() {
        let runtime = vec![
            violation("developer.v1.tax_verification_fresh", Tier::Tier2Consistency, &["a"]),
            violation("developer.v1.validity_window_order", Tier::Tier1Critical, &["b"]),
        ];
        let structural = vec![violation("structural.required", Tier::Structural, &[])];
        let verdict = compose(structural, runtime);
        let tiers: Vec<Tier> = verdict.violations().iter().map(Violation::tier).collect();
        assert_eq!(tiers, vec![Tier::Structural, Tier::Tier1Critical, Tier::Tier2Consistency]);
        assert!(!verdict.is_valid());
    }

    #[test]
    fn same_path_in_both_stages_is_not_deduplicated() {
        let structural = vec![violation("structural.format", Tier::Structural, &["expirationDate"])];
        let runtime =
            vec![violation("document.malformed_value", Tier::Tier1Critical, &["expirationDate"])];
        let verdict = compose(structural, runtime);
        assert_eq!(verdict.violations().len(), 2);
    }

    #[test]
    fn structural_only_verdict_is_marked_unevaluated() {
        let verdict = compose_structural_only(Vec::new());
        assert!(verdict.is_valid());
        assert!(!verdict.runtime_evaluated());
    }
}
