// crates/credential-gate-schemas/tests/structural_findings.rs
// ============================================================================
// Module: Structural Finding Tests
// Description: Violations produced by the jsonschema backend.
// Purpose: Verify keyword ids, paths, params, collect-all, and format toggles.
// ============================================================================

//! Structural validation tests against the builtin schemas.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use credential_gate_core::CredentialType;
use credential_gate_core::RuleId;
use credential_gate_core::SchemaRef;
use credential_gate_core::SchemaRegistry;
use credential_gate_core::SchemaVersion;
use credential_gate_core::Tier;
use credential_gate_core::Violation;
use credential_gate_core::runtime::StructuralValidator;
use credential_gate_schemas::BuiltinSchemaSource;
use credential_gate_schemas::JsonSchemaBackend;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

const DEVELOPER_V1: SchemaRef = SchemaRef::new(CredentialType::Developer, SchemaVersion::V1);
const AGENT_V2: SchemaRef = SchemaRef::new(CredentialType::Agent, SchemaVersion::V2);

fn developer_v1() -> Value {
    json!({
        "schemaVersion": "1.0",
        "credentialId": "dev-cred-0001",
        "issuer": "did:example:registry",
        "legalName": "Ada Lovelace",
        "entityType": "individual",
        "jurisdiction": "GB",
        "issuanceDate": "2025-01-01",
        "expirationDate": "2026-01-01",
        "credentialStatus": "active",
        "kycLevel": "enhanced",
        "sanctionsScreeningResult": "clear",
        "sanctionsScreeningLastChecked": "2025-05-15"
    })
}

fn agent_v2() -> Value {
    serde_json::from_str(include_str!("fixtures/agent/v2/valid-simple-agent.json")).unwrap()
}

fn structural_for(
    schema_ref: SchemaRef,
    backend: JsonSchemaBackend,
    document: &Value,
) -> Vec<Violation> {
    let registry = SchemaRegistry::new(Arc::new(BuiltinSchemaSource), Arc::new(backend));
    let compiled = registry.resolve(schema_ref).unwrap();
    StructuralValidator::validate(compiled.as_ref(), document)
}

fn structural(backend: JsonSchemaBackend, document: &Value) -> Vec<Violation> {
    structural_for(DEVELOPER_V1, backend, document)
}

fn find<'a>(violations: &'a [Violation], rule: &str) -> &'a Violation {
    violations
        .iter()
        .find(|violation| violation.rule_id() == &RuleId::from(rule))
        .unwrap_or_else(|| panic!("missing {rule} in {violations:?}"))
}

#[test]
fn clean_document_has_no_findings() {
    assert!(structural(JsonSchemaBackend::new(), &developer_v1()).is_empty());
}

#[test]
fn pattern_violation_carries_pattern_and_location() {
    let mut document = developer_v1();
    document["jurisdiction"] = json!("Great Britain");
    let violations = structural(JsonSchemaBackend::new(), &document);
    assert_eq!(violations.len(), 1, "{violations:?}");
    let violation = find(&violations, "structural.pattern");
    assert_eq!(violation.tier(), Tier::Structural);
    assert_eq!(violation.path(), ["jurisdiction".to_string()]);
    assert_eq!(violation.params()["pattern"], json!("^[A-Z]{2}$"));
    assert_eq!(violation.params()["schema_path"], json!("/properties/jurisdiction/pattern"));
}

#[test]
fn conditional_enum_reports_allowed_values() {
    let mut document = developer_v1();
    document["sanctionsScreeningResult"] = json!("confirmed_match");
    let violations = structural(JsonSchemaBackend::new(), &document);
    let violation = find(&violations, "structural.enum");
    assert_eq!(violation.path(), ["credentialStatus".to_string()]);
    assert_eq!(violation.params()["enum"], json!(["suspended", "revoked"]));
}

#[test]
fn referenced_subject_enum_reports_allowed_values() {
    let mut document = agent_v2();
    document["credentialSubject"]["status"] = json!("bogus");
    let violations = structural_for(AGENT_V2, JsonSchemaBackend::new(), &document);
    assert_eq!(violations.len(), 1, "{violations:?}");
    let violation = find(&violations, "structural.enum");
    assert_eq!(violation.path(), ["credentialSubject".to_string(), "status".to_string()]);
    assert_eq!(
        violation.params()["enum"],
        json!(["active", "suspended", "revoked", "expired"])
    );
    assert_eq!(
        violation.params()["schema_path"],
        json!("/properties/credentialSubject/$ref/properties/status/enum")
    );
}

#[test]
fn missing_property_is_named_in_params() {
    let mut document = agent_v2();
    document["credentialSubject"].as_object_mut().unwrap().remove("safetyRating");
    let violations = structural_for(AGENT_V2, JsonSchemaBackend::new(), &document);
    let violation = find(&violations, "structural.required");
    assert_eq!(violation.path(), ["credentialSubject".to_string()]);
    assert_eq!(violation.params()["required"], json!("safetyRating"));
}

#[test]
fn unexpected_properties_are_listed() {
    let mut document = developer_v1();
    document["nickname"] = json!("Ada");
    let violations = structural(JsonSchemaBackend::new(), &document);
    let violation = find(&violations, "structural.additionalProperties");
    assert_eq!(violation.params()["additionalProperties"], json!(["nickname"]));
}

#[test]
fn every_defect_is_reported_in_one_pass() {
    let mut document = developer_v1();
    let object = document.as_object_mut().unwrap();
    object.remove("legalName");
    object.insert("entityType".to_string(), json!("organization"));
    object.insert("nickname".to_string(), json!("Ada"));
    let violations = structural(JsonSchemaBackend::new(), &document);
    let required: Vec<&Violation> = violations
        .iter()
        .filter(|violation| violation.rule_id() == &RuleId::from("structural.required"))
        .collect();
    assert_eq!(required.len(), 2, "{violations:?}");
    find(&violations, "structural.additionalProperties");
    assert!(violations.iter().all(|violation| violation.tier() == Tier::Structural));
}

#[test]
fn format_assertions_follow_backend_toggle() {
    let mut document = developer_v1();
    document["issuanceDate"] = json!("not-a-date");
    let strict = structural(JsonSchemaBackend::new(), &document);
    let violation = find(&strict, "structural.format");
    assert_eq!(violation.path(), ["issuanceDate".to_string()]);
    let lenient = structural(JsonSchemaBackend::new().with_format_validation(false), &document);
    assert!(lenient.is_empty(), "{lenient:?}");
}

proptest! {
    #[test]
    fn jurisdiction_pattern_matches_two_uppercase_letters(code in "[A-Za-z]{1,3}") {
        let mut document = developer_v1();
        document["jurisdiction"] = json!(code);
        let violations = structural(JsonSchemaBackend::new(), &document);
        let expected_valid = code.len() == 2 && code.bytes().all(|byte| byte.is_ascii_uppercase());
        prop_assert_eq!(violations.is_empty(), expected_valid, "{}: {:?}", code, violations);
    }
}
