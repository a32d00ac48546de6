// crates/credential-gate-schemas/tests/schema_sources.rs
// ============================================================================
// Module: Schema Source Tests
// Description: Builtin and directory-backed artifacts through the registry.
// Purpose: Verify compile outcomes, fatal load errors, and size limits.
// ============================================================================

//! Schema source and backend compile tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use credential_gate_core::CredentialType;
use credential_gate_core::SchemaError;
use credential_gate_core::SchemaRef;
use credential_gate_core::SchemaRegistry;
use credential_gate_core::SchemaSource;
use credential_gate_core::SchemaVersion;
use credential_gate_schemas::BuiltinSchemaSource;
use credential_gate_schemas::DirectorySchemaSource;
use credential_gate_schemas::JsonSchemaBackend;
use credential_gate_schemas::builtin_schema_text;

const DEVELOPER_V1: SchemaRef = SchemaRef::new(CredentialType::Developer, SchemaVersion::V1);
const AGENT_V2: SchemaRef = SchemaRef::new(CredentialType::Agent, SchemaVersion::V2);

fn write_artifact(root: &Path, schema_ref: SchemaRef, content: &str) {
    let path = root.join(schema_ref.artifact_path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn directory_registry(source: DirectorySchemaSource) -> SchemaRegistry {
    SchemaRegistry::new(Arc::new(source), Arc::new(JsonSchemaBackend::new()))
}

#[test]
fn every_builtin_schema_compiles() {
    let registry =
        SchemaRegistry::new(Arc::new(BuiltinSchemaSource), Arc::new(JsonSchemaBackend::new()));
    for schema_ref in SchemaRef::all() {
        assert!(registry.resolve(schema_ref).is_ok(), "{schema_ref} failed to compile");
    }
    assert_eq!(registry.resolved().len(), SchemaRef::all().len());
}

#[test]
fn builtin_schemas_close_their_credential_objects() {
    for schema_ref in SchemaRef::all() {
        let schema: serde_json::Value =
            serde_json::from_str(builtin_schema_text(schema_ref)).unwrap();
        let closed = match schema_ref.version {
            SchemaVersion::V1 => &schema,
            SchemaVersion::V2 => {
                let target = schema["properties"]["credentialSubject"]["$ref"].as_str().unwrap();
                schema.pointer(target.trim_start_matches('#')).unwrap()
            }
        };
        assert_eq!(closed["additionalProperties"], serde_json::json!(false), "{schema_ref}");
        assert!(closed["allOf"].as_array().is_some_and(|rules| !rules.is_empty()), "{schema_ref}");
    }
}

#[test]
fn v2_envelopes_stay_open_for_credential_extensions() {
    let v2_refs =
        SchemaRef::all().into_iter().filter(|candidate| candidate.version == SchemaVersion::V2);
    for schema_ref in v2_refs {
        let schema: serde_json::Value =
            serde_json::from_str(builtin_schema_text(schema_ref)).unwrap();
        assert!(schema.get("additionalProperties").is_none(), "{schema_ref}");
    }
}

#[test]
fn directory_source_loads_artifact_below_root() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), DEVELOPER_V1, builtin_schema_text(DEVELOPER_V1));
    let source = DirectorySchemaSource::new(dir.path());
    let artifact = source.load(DEVELOPER_V1).unwrap();
    assert_eq!(artifact.schema_ref, DEVELOPER_V1);
    assert_eq!(artifact.location, source.artifact_path(DEVELOPER_V1).display().to_string());
    directory_registry(source).resolve(DEVELOPER_V1).unwrap();
}

#[test]
fn directory_source_missing_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let registry = directory_registry(DirectorySchemaSource::new(dir.path()));
    let Err(err) = registry.resolve(AGENT_V2) else {
        panic!("missing artifact must not resolve");
    };
    assert_eq!(
        err,
        SchemaError::NotFound {
            schema_ref: AGENT_V2
        }
    );
}

#[test]
fn directory_source_rejects_oversized_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), DEVELOPER_V1, builtin_schema_text(DEVELOPER_V1));
    let source = DirectorySchemaSource::new(dir.path()).with_max_bytes(64);
    match source.load(DEVELOPER_V1) {
        Err(SchemaError::Compile {
            diagnostic,
            ..
        }) => assert!(diagnostic.contains("size limit"), "{diagnostic}"),
        other => panic!("expected size limit failure, got {other:?}"),
    }
}

#[test]
fn directory_source_rejects_directory_in_place_of_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(DEVELOPER_V1.artifact_path())).unwrap();
    let source = DirectorySchemaSource::new(dir.path());
    assert!(matches!(source.load(DEVELOPER_V1), Err(SchemaError::Compile { .. })));
}

#[test]
fn malformed_json_artifact_is_a_compile_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), AGENT_V2, "{ \"type\": \"object\", ");
    let registry = directory_registry(DirectorySchemaSource::new(dir.path()));
    let Err(err) = registry.resolve(AGENT_V2) else {
        panic!("malformed artifact must not resolve");
    };
    assert!(matches!(err, SchemaError::Compile { schema_ref, .. } if schema_ref == AGENT_V2));
    assert_eq!(registry.resolve(AGENT_V2).err(), Some(err));
}

#[test]
fn invalid_schema_keyword_is_a_compile_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(
        dir.path(),
        AGENT_V2,
        r#"{"$schema": "https://json-schema.org/draft/2020-12/schema", "type": 12}"#,
    );
    let registry = directory_registry(DirectorySchemaSource::new(dir.path()));
    match registry.resolve(AGENT_V2) {
        Err(SchemaError::Compile {
            location,
            ..
        }) => assert!(location.ends_with("agent-credential-v2.schema.json"), "{location}"),
        Err(other) => panic!("expected compile failure, got {other:?}"),
        Ok(_) => panic!("invalid schema must not compile"),
    }
}
