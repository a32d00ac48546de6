// crates/credential-gate-schemas/tests/fixture_suites.rs
// ============================================================================
// Module: Fixture Suite Tests
// Description: Runs every bundled fixture through the full engine.
// Purpose: Keep builtin schemas, builtin rules, and fixtures in agreement.
// ============================================================================

//! End-to-end fixture suites for all four builtin schemas.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use credential_gate_config::FixtureManifest;
use credential_gate_core::Annotation;
use credential_gate_core::EngineConfig;
use credential_gate_core::FixtureSummary;
use credential_gate_core::RuleCatalogOptions;
use credential_gate_core::SchemaRegistry;
use credential_gate_core::Tier;
use credential_gate_core::ValidationEngine;
use credential_gate_core::ValidationMode;
use credential_gate_core::builtin_rule_set;
use credential_gate_core::classify;
use credential_gate_schemas::BuiltinSchemaSource;
use credential_gate_schemas::JsonSchemaBackend;
use serde_json::Value;

const SUITES: [&str; 4] = ["developer/v1", "developer/v2", "agent/v1", "agent/v2"];

fn suite_dir(suite: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(suite)
}

fn engine(mode: ValidationMode) -> ValidationEngine {
    let registry =
        SchemaRegistry::new(Arc::new(BuiltinSchemaSource), Arc::new(JsonSchemaBackend::new()));
    let rules = builtin_rule_set(&RuleCatalogOptions::default()).unwrap();
    ValidationEngine::new(
        Arc::new(registry),
        rules,
        EngineConfig {
            mode,
        },
    )
}

fn fixture_files(dir: &Path) -> Vec<(String, Value)> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
        .into_iter()
        .map(|path| {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let document = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
            (name, document)
        })
        .collect()
}

fn run_suite(suite: &str, mode: ValidationMode) -> (FixtureManifest, FixtureSummary) {
    let dir = suite_dir(suite);
    let manifest = FixtureManifest::load_dir(&dir).unwrap();
    assert_eq!(manifest.schema.map(|schema| schema.to_string()).as_deref(), Some(suite));
    let schema_ref = manifest.schema.unwrap();
    let reference_time = manifest.reference_time.unwrap();
    let engine = engine(mode);
    let mut summary = FixtureSummary::default();
    for (name, document) in fixture_files(&dir) {
        let case = manifest.case_for(&name).unwrap_or_else(|| panic!("{suite}/{name} unprefixed"));
        let verdict = engine.validate(&document, schema_ref, reference_time).unwrap();
        let classification = classify(&verdict, &case);
        assert!(
            classification.passed(),
            "{suite}/{name} ({}) failed in {mode:?}: {:?}",
            case.expectation,
            verdict.violations()
        );
        if case.requires_runtime_evaluation {
            assert!(!verdict.has_tier(Tier::Structural), "{suite}/{name} is structurally invalid");
        }
        summary.record(classification);
    }
    (manifest, summary)
}

#[test]
fn every_suite_passes_with_runtime_rules() {
    for suite in SUITES {
        let (_, summary) = run_suite(suite, ValidationMode::Full);
        assert!(summary.all_passed(), "{suite}: {summary:?}");
        assert_eq!(summary.requires_runtime_evaluation, 0, "{suite}: {summary:?}");
        assert!(summary.total >= 5, "{suite}: {summary:?}");
    }
}

#[test]
fn structural_only_runs_annotate_runtime_fixtures() {
    for suite in SUITES {
        let (manifest, summary) = run_suite(suite, ValidationMode::StructuralOnly);
        assert!(summary.all_passed(), "{suite}: {summary:?}");
        assert_eq!(
            summary.requires_runtime_evaluation,
            manifest.requires_runtime_evaluation.len(),
            "{suite}: {summary:?}"
        );
        assert_eq!(
            summary.passed + summary.requires_runtime_evaluation,
            summary.total,
            "{suite}: {summary:?}"
        );
    }
}

#[test]
fn valid_fixtures_produce_no_violations() {
    let engine = engine(ValidationMode::Full);
    for suite in SUITES {
        let dir = suite_dir(suite);
        let manifest = FixtureManifest::load_dir(&dir).unwrap();
        let schema_ref = manifest.schema.unwrap();
        let reference_time = manifest.reference_time.unwrap();
        let valid = fixture_files(&dir).into_iter().filter(|(name, _)| name.starts_with("valid-"));
        for (name, document) in valid {
            let verdict = engine.validate(&document, schema_ref, reference_time).unwrap();
            assert!(verdict.violations().is_empty(), "{suite}/{name}: {:?}", verdict.violations());
            assert!(verdict.runtime_evaluated());
        }
    }
}

#[test]
fn flagged_fixtures_are_annotated_not_failed() {
    let engine = engine(ValidationMode::StructuralOnly);
    let dir = suite_dir("developer/v1");
    let manifest = FixtureManifest::load_dir(&dir).unwrap();
    let schema_ref = manifest.schema.unwrap();
    let reference_time = manifest.reference_time.unwrap();
    let document: Value =
        serde_json::from_slice(&fs::read(dir.join("tier2-invalid-screening-stale.json")).unwrap())
            .unwrap();
    let verdict = engine.validate(&document, schema_ref, reference_time).unwrap();
    assert!(verdict.is_valid());
    assert!(!verdict.runtime_evaluated());
    let case = manifest.case_for("tier2-invalid-screening-stale").unwrap();
    let classification = classify(&verdict, &case);
    assert!(classification.passed());
    assert_eq!(classification.annotation, Some(Annotation::RequiresRuntimeEvaluation));
}
