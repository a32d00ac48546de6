// crates/credential-gate-schemas/src/builtin.rs
// ============================================================================
// Module: Builtin Schemas
// Description: Credential schemas embedded into the binary.
// Purpose: Resolve every known schema reference without filesystem access.
// Dependencies: credential-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Every [`SchemaRef`] has exactly one embedded artifact. Embedded text is
//! still parsed at load time, so a corrupted artifact surfaces as a
//! [`SchemaError::Compile`] for that reference only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use credential_gate_core::CredentialType;
use credential_gate_core::SchemaArtifact;
use credential_gate_core::SchemaError;
use credential_gate_core::SchemaRef;
use credential_gate_core::SchemaSource;
use credential_gate_core::SchemaVersion;

// ============================================================================
// SECTION: Artifacts
// ============================================================================

/// Returns the embedded schema text for a reference.
#[must_use]
pub const fn builtin_schema_text(schema_ref: SchemaRef) -> &'static str {
    match (schema_ref.credential_type, schema_ref.version) {
        (CredentialType::Agent, SchemaVersion::V1) => {
            include_str!("../schemas/agent/v1/agent-credential-v1.schema.json")
        }
        (CredentialType::Agent, SchemaVersion::V2) => {
            include_str!("../schemas/agent/v2/agent-credential-v2.schema.json")
        }
        (CredentialType::Developer, SchemaVersion::V1) => {
            include_str!("../schemas/developer/v1/developer-credential-v1.schema.json")
        }
        (CredentialType::Developer, SchemaVersion::V2) => {
            include_str!("../schemas/developer/v2/developer-credential-v2.schema.json")
        }
    }
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Schema source backed by the embedded artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSchemaSource;

impl SchemaSource for BuiltinSchemaSource {
    fn load(&self, schema_ref: SchemaRef) -> Result<SchemaArtifact, SchemaError> {
        let location = format!("builtin:{}", schema_ref.artifact_path());
        let schema = serde_json::from_str(builtin_schema_text(schema_ref)).map_err(|err| {
            SchemaError::Compile {
                schema_ref,
                location: location.clone(),
                diagnostic: err.to_string(),
            }
        })?;
        Ok(SchemaArtifact {
            schema_ref,
            location,
            schema,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
