// crates/credential-gate-core/src/fixtures.rs
// ============================================================================
// Module: Fixture Classifier
// Description: Tiered pass/fail classification of verdicts against fixtures.
// Purpose: Decide whether a fixture document was accepted or rejected as expected.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Fixture suites pair a document with an [`Expectation`]. Classification is
//! a pure function of the verdict and the case:
//! - [`Expectation::MustBeValid`] passes when the verdict is valid.
//! - [`Expectation::MustBeTier1Invalid`] passes on any structural or Tier 1
//!   violation.
//! - [`Expectation::MustBeTier2Invalid`] passes on any Tier 2 violation.
//!
//! Cases flagged as requiring runtime evaluation may also pass when the
//! runtime rules have not run and nothing was rejected. Such passes carry
//! [`Annotation::RequiresRuntimeEvaluation`] so reports keep them apart from
//! true rejections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Tier;
use crate::core::Verdict;

// ============================================================================
// SECTION: Fixture Cases
// ============================================================================

/// Expected classification of a fixture document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The document must produce no violations.
    MustBeValid,
    /// The document must be rejected structurally or by a Tier 1 rule.
    MustBeTier1Invalid,
    /// The document must be rejected by a Tier 2 rule.
    MustBeTier2Invalid,
}

impl Expectation {
    /// Infers the expectation from a fixture file name.
    ///
    /// `valid-*` fixtures must pass, `invalid-*` fixtures are Tier 1 rejects,
    /// and `tier2-invalid-*` fixtures are Tier 2 rejects. Directory components
    /// are ignored.
    #[must_use]
    pub fn from_fixture_name(name: &str) -> Option<Self> {
        let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
        if file.starts_with("tier2-invalid-") {
            Some(Self::MustBeTier2Invalid)
        } else if file.starts_with("invalid-") {
            Some(Self::MustBeTier1Invalid)
        } else if file.starts_with("valid-") {
            Some(Self::MustBeValid)
        } else {
            None
        }
    }

    /// Returns a stable label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MustBeValid => "must_be_valid",
            Self::MustBeTier1Invalid => "must_be_tier1_invalid",
            Self::MustBeTier2Invalid => "must_be_tier2_invalid",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixture document's expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Fixture name, usually the file stem.
    pub name: String,
    /// Expected classification.
    pub expectation: Expectation,
    /// True when only the runtime rules can reject this document.
    #[serde(default)]
    pub requires_runtime_evaluation: bool,
}

impl FixtureCase {
    /// Creates a case that does not require runtime evaluation.
    #[must_use]
    pub fn new(name: impl Into<String>, expectation: Expectation) -> Self {
        Self {
            name: name.into(),
            expectation,
            requires_runtime_evaluation: false,
        }
    }

    /// Flags the case as rejectable only by runtime rules.
    #[must_use]
    pub const fn requiring_runtime_evaluation(mut self) -> Self {
        self.requires_runtime_evaluation = true;
        self
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Pass/fail outcome of one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// The verdict matched the expectation.
    Pass,
    /// The verdict contradicted the expectation.
    Fail,
}

/// Qualifier attached to a pass that is not a true rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// Accepted because the document is only rejectable by runtime rules,
    /// which did not run.
    RequiresRuntimeEvaluation,
}

/// Result of classifying one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Pass or fail.
    pub outcome: ClassificationOutcome,
    /// Qualifier for annotated passes.
    pub annotation: Option<Annotation>,
}

impl Classification {
    /// Unannotated pass.
    const PASS: Self = Self {
        outcome: ClassificationOutcome::Pass,
        annotation: None,
    };
    /// Unannotated failure.
    const FAIL: Self = Self {
        outcome: ClassificationOutcome::Fail,
        annotation: None,
    };

    /// Returns true for passes, annotated or not.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == ClassificationOutcome::Pass
    }
}

/// Classifies a verdict against a fixture case.
#[must_use]
pub fn classify(verdict: &Verdict, case: &FixtureCase) -> Classification {
    let matched = match case.expectation {
        Expectation::MustBeValid => verdict.is_valid(),
        Expectation::MustBeTier1Invalid => {
            verdict.has_tier(Tier::Structural) || verdict.has_tier(Tier::Tier1Critical)
        }
        Expectation::MustBeTier2Invalid => verdict.has_tier(Tier::Tier2Consistency),
    };
    if matched {
        return Classification::PASS;
    }
    let deferred = case.expectation != Expectation::MustBeValid
        && case.requires_runtime_evaluation
        && verdict.is_valid()
        && !verdict.runtime_evaluated();
    if deferred {
        Classification {
            outcome: ClassificationOutcome::Pass,
            annotation: Some(Annotation::RequiresRuntimeEvaluation),
        }
    } else {
        Classification::FAIL
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Tally of a fixture suite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FixtureSummary {
    /// Cases classified.
    pub total: usize,
    /// Unannotated passes.
    pub passed: usize,
    /// Passes carrying [`Annotation::RequiresRuntimeEvaluation`].
    pub requires_runtime_evaluation: usize,
    /// Failures.
    pub failed: usize,
}

impl FixtureSummary {
    /// Records one classification.
    pub fn record(&mut self, classification: Classification) {
        self.total += 1;
        match (classification.outcome, classification.annotation) {
            (ClassificationOutcome::Fail, _) => self.failed += 1,
            (ClassificationOutcome::Pass, None) => self.passed += 1,
            (ClassificationOutcome::Pass, Some(Annotation::RequiresRuntimeEvaluation)) => {
                self.requires_runtime_evaluation += 1;
            }
        }
    }

    /// Returns true when at least one case ran and none failed.
    ///
    /// An empty suite checks nothing and is not a pass.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
