// crates/credential-gate-cli/src/report.rs
// ============================================================================
// Module: Reports
// Description: Serializable reports and text rendering for CLI commands.
// Purpose: Give validate and fixtures runs one JSON shape and one text shape.
// Dependencies: credential-gate-core, serde
// ============================================================================

//! ## Overview
//! Reports wrap verdicts and fixture classifications with the file and schema
//! they concern. JSON output serializes the report structs directly; text
//! output renders them line by line through the message catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use credential_gate_core::Annotation;
use credential_gate_core::Classification;
use credential_gate_core::ClassificationOutcome;
use credential_gate_core::Expectation;
use credential_gate_core::FixtureSummary;
use credential_gate_core::ReferenceTime;
use credential_gate_core::SchemaRef;
use credential_gate_core::Verdict;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Document Reports
// ============================================================================

/// Outcome of validating one document file.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// File the document was read from.
    pub file: String,
    /// Schema the document was validated against.
    pub schema: String,
    /// Reference instant used by the runtime rules.
    pub reference_time: String,
    /// Engine verdict.
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl DocumentReport {
    /// Creates a report for one document.
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        schema_ref: SchemaRef,
        reference_time: ReferenceTime,
        verdict: Verdict,
    ) -> Self {
        Self {
            file: file.into(),
            schema: schema_ref.to_string(),
            reference_time: reference_time.to_string(),
            verdict,
        }
    }

    /// Renders the report as text lines.
    #[must_use]
    pub fn render_text(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.verdict.is_valid() {
            lines.push(t!("validate.valid", path = self.file, schema = self.schema));
        } else {
            lines.push(t!(
                "validate.invalid",
                path = self.file,
                schema = self.schema,
                count = self.verdict.violations().len()
            ));
        }
        for violation in self.verdict.violations() {
            lines.push(t!(
                "validate.violation",
                tier = violation.tier(),
                rule_id = violation.rule_id(),
                pointer = display_pointer(&violation.pointer()),
                message = violation.message()
            ));
        }
        if !self.verdict.runtime_evaluated() {
            lines.push(t!("validate.runtime_skipped"));
        }
        lines
    }
}

/// Renders the document root pointer visibly.
fn display_pointer(pointer: &str) -> &str {
    if pointer.is_empty() { "/" } else { pointer }
}

// ============================================================================
// SECTION: Fixture Reports
// ============================================================================

/// Classification of one fixture file.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureResult {
    /// Fixture name (file stem).
    pub name: String,
    /// Expectation inferred from the name.
    pub expectation: Expectation,
    /// Pass or fail.
    pub outcome: ClassificationOutcome,
    /// Annotation attached to a deferred pass.
    pub annotation: Option<Annotation>,
    /// Underlying verdict.
    pub verdict: Verdict,
}

/// Outcome of running one fixture directory.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureRunReport {
    /// Fixture directory.
    pub dir: String,
    /// Schema every fixture was validated against.
    pub schema: String,
    /// Reference instant used by the runtime rules.
    pub reference_time: String,
    /// Per-fixture results in file name order.
    pub results: Vec<FixtureResult>,
    /// Tally over `results`.
    pub summary: FixtureSummary,
}

impl FixtureRunReport {
    /// Creates an empty report for a suite.
    #[must_use]
    pub fn new(dir: impl Into<String>, schema_ref: SchemaRef, reference_time: ReferenceTime) -> Self {
        Self {
            dir: dir.into(),
            schema: schema_ref.to_string(),
            reference_time: reference_time.to_string(),
            results: Vec::new(),
            summary: FixtureSummary::default(),
        }
    }

    /// Records one classified fixture.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        expectation: Expectation,
        classification: Classification,
        verdict: Verdict,
    ) {
        self.summary.record(classification);
        self.results.push(FixtureResult {
            name: name.into(),
            expectation,
            outcome: classification.outcome,
            annotation: classification.annotation,
            verdict,
        });
    }

    /// Renders the report as text lines.
    #[must_use]
    pub fn render_text(&self) -> Vec<String> {
        let mut lines = vec![t!(
            "fixtures.header",
            path = self.dir,
            schema = self.schema,
            reference_time = self.reference_time
        )];
        for result in &self.results {
            let line = match (result.outcome, result.annotation) {
                (ClassificationOutcome::Pass, None) => {
                    t!("fixtures.pass", name = result.name, expectation = result.expectation)
                }
                (ClassificationOutcome::Pass, Some(Annotation::RequiresRuntimeEvaluation)) => t!(
                    "fixtures.pass_deferred",
                    name = result.name,
                    expectation = result.expectation
                ),
                (ClassificationOutcome::Fail, _) => t!(
                    "fixtures.fail",
                    name = result.name,
                    expectation = result.expectation,
                    count = result.verdict.violations().len()
                ),
            };
            lines.push(line);
        }
        lines.push(t!(
            "fixtures.summary",
            total = self.summary.total,
            passed = self.summary.passed,
            deferred = self.summary.requires_runtime_evaluation,
            failed = self.summary.failed
        ));
        lines
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use credential_gate_core::CredentialType;
    use credential_gate_core::FixtureCase;
    use credential_gate_core::RuleId;
    use credential_gate_core::SchemaVersion;
    use credential_gate_core::Tier;
    use credential_gate_core::VerdictBuilder;
    use credential_gate_core::Violation;
    use credential_gate_core::classify;

    use super::*;

    const AGENT_V1: SchemaRef = SchemaRef::new(CredentialType::Agent, SchemaVersion::V1);

    fn reference_time() -> Result<ReferenceTime, String> {
        ReferenceTime::parse("2025-06-01T00:00:00Z")
    }

    fn stale_audit() -> Verdict {
        let mut builder = VerdictBuilder::new().runtime_evaluated(true);
        builder.push(Violation::new(
            RuleId::from("agent.v1.security_audit_fresh"),
            Tier::Tier2Consistency,
            vec!["lastSecurityAuditDate".to_string()],
            "lastSecurityAuditDate is older than 365 days",
            std::collections::BTreeMap::new(),
        ));
        builder.build()
    }

    #[test]
    fn document_text_lists_each_violation() -> Result<(), String> {
        let report = DocumentReport::new("agent.json", AGENT_V1, reference_time()?, stale_audit());
        let lines = report.render_text();
        assert_eq!(lines[0], "agent.json: INVALID (agent/v1, 1 violation(s))");
        assert_eq!(
            lines[1],
            "  [tier2_consistency] agent.v1.security_audit_fresh at /lastSecurityAuditDate: \
             lastSecurityAuditDate is older than 365 days"
        );
        assert_eq!(lines.len(), 2);
        Ok(())
    }

    #[test]
    fn structural_only_document_notes_skipped_rules() -> Result<(), String> {
        let verdict = VerdictBuilder::new().runtime_evaluated(false).build();
        let report = DocumentReport::new("agent.json", AGENT_V1, reference_time()?, verdict);
        let lines = report.render_text();
        assert_eq!(lines[0], "agent.json: VALID (agent/v1)");
        assert_eq!(lines[1], "  note: runtime rules were not evaluated");
        Ok(())
    }

    #[test]
    fn fixture_report_marks_deferred_passes() -> Result<(), String> {
        let mut report = FixtureRunReport::new("fixtures/agent/v1", AGENT_V1, reference_time()?);
        let verdict = VerdictBuilder::new().runtime_evaluated(false).build();
        let case = FixtureCase::new("tier2-invalid-security-audit-old", Expectation::MustBeTier2Invalid)
            .requiring_runtime_evaluation();
        report.record(case.name.clone(), case.expectation, classify(&verdict, &case), verdict);
        let lines = report.render_text();
        assert_eq!(
            lines[1],
            "PASS* tier2-invalid-security-audit-old (must_be_tier2_invalid; requires runtime \
             evaluation)"
        );
        assert_eq!(
            lines[2],
            "1 fixture(s): 0 passed, 1 require runtime evaluation, 0 failed"
        );
        Ok(())
    }

    #[test]
    fn document_json_flattens_verdict() -> Result<(), String> {
        let report = DocumentReport::new("agent.json", AGENT_V1, reference_time()?, stale_audit());
        let value = serde_json::to_value(&report).map_err(|err| err.to_string())?;
        assert_eq!(value["schema"], "agent/v1");
        assert_eq!(value["is_valid"], false);
        assert_eq!(value["violations"][0]["rule_id"], "agent.v1.security_audit_fresh");
        assert_eq!(value["violations"][0]["tier"], "tier2_consistency");
        Ok(())
    }
}
