// crates/credential-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Credential Gate Identifiers
// Description: Schema references and rule identifiers.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`SchemaRef`] names one versioned credential schema (`developer/v1`,
//! `agent/v2`, ...). Rule identifiers are opaque strings; builtin rules use the
//! `{type}.{version}.{name}` form so they sort by schema first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Identity
// ============================================================================

/// Credential family described by a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    /// AI agent identity credential.
    Agent,
    /// Developer (organization or individual) identity credential.
    Developer,
}

impl CredentialType {
    /// All credential types in canonical order.
    pub const ALL: [Self; 2] = [Self::Agent, Self::Developer];

    /// Returns the stable label used in paths and rule identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Developer => "developer",
        }
    }

    /// Returns the W3C `type` entry used by v2 documents.
    #[must_use]
    pub const fn vc_type(self) -> &'static str {
        match self {
            Self::Agent => "AgentCredential",
            Self::Developer => "DeveloperCredential",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Legacy flat credential layout.
    V1,
    /// W3C Verifiable Credentials 2.0 aligned layout.
    V2,
}

impl SchemaVersion {
    /// All schema versions in canonical order.
    pub const ALL: [Self; 2] = [Self::V1, Self::V2];

    /// Returns the stable label used in paths and rule identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one versioned credential schema.
///
/// # Invariants
/// - Each value maps to at most one compiled schema in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaRef {
    /// Credential family.
    pub credential_type: CredentialType,
    /// Schema generation.
    pub version: SchemaVersion,
}

impl SchemaRef {
    /// Creates a schema reference.
    #[must_use]
    pub const fn new(credential_type: CredentialType, version: SchemaVersion) -> Self {
        Self {
            credential_type,
            version,
        }
    }

    /// Every schema reference known to the engine, in canonical order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        CredentialType::ALL
            .iter()
            .flat_map(|kind| SchemaVersion::ALL.iter().map(|version| Self::new(*kind, *version)))
            .collect()
    }

    /// Returns the conventional relative path of the schema artifact.
    #[must_use]
    pub fn artifact_path(&self) -> String {
        format!(
            "{kind}/{version}/{kind}-credential-{version}.schema.json",
            kind = self.credential_type.as_str(),
            version = self.version.as_str()
        )
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.credential_type, self.version)
    }
}

/// Error returned when a schema reference label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema reference `{0}` (expected agent|developer/v1|v2)")]
pub struct SchemaRefParseError(pub String);

impl FromStr for SchemaRef {
    type Err = SchemaRefParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, version) =
            value.split_once('/').ok_or_else(|| SchemaRefParseError(value.to_string()))?;
        let credential_type = match kind {
            "agent" => CredentialType::Agent,
            "developer" => CredentialType::Developer,
            _ => return Err(SchemaRefParseError(value.to_string())),
        };
        let version = match version {
            "v1" => SchemaVersion::V1,
            "v2" => SchemaVersion::V2,
            _ => return Err(SchemaRefParseError(value.to_string())),
        };
        Ok(Self::new(credential_type, version))
    }
}

/// Infers the schema reference a document declares about itself.
///
/// v2 documents declare their family through the W3C `type` array; v1
/// documents carry a `schemaVersion` of `1.x` plus a family-specific field.
#[must_use]
pub fn detect_schema_ref(document: &Value) -> Option<SchemaRef> {
    if let Some(types) = document.get("type").and_then(Value::as_array) {
        let has = |name: &str| types.iter().any(|entry| entry.as_str() == Some(name));
        if !has("VerifiableCredential") {
            return None;
        }
        return CredentialType::ALL
            .into_iter()
            .find(|kind| has(kind.vc_type()))
            .map(|kind| SchemaRef::new(kind, SchemaVersion::V2));
    }
    let version = document.get("schemaVersion").and_then(Value::as_str)?;
    if !version.starts_with("1.") {
        return None;
    }
    if document.get("agentId").is_some() {
        Some(SchemaRef::new(CredentialType::Agent, SchemaVersion::V1))
    } else if document.get("legalName").is_some() {
        Some(SchemaRef::new(CredentialType::Developer, SchemaVersion::V1))
    } else {
        None
    }
}

// ============================================================================
// SECTION: Rule Identity
// ============================================================================

/// Stable identifier for a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new rule identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the identifier of a builtin rule scoped to one schema.
    #[must_use]
    pub fn scoped(schema_ref: SchemaRef, name: &str) -> Self {
        Self(format!("{}.{}.{name}", schema_ref.credential_type, schema_ref.version))
    }

    /// Builds the identifier reported for a structural keyword failure.
    #[must_use]
    pub fn structural(keyword: &str) -> Self {
        Self(format!("structural.{keyword}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use serde_json::json;

    use super::*;

    #[test]
    fn schema_ref_round_trips_through_label() {
        for schema_ref in SchemaRef::all() {
            let parsed: SchemaRef = schema_ref.to_string().parse().unwrap();
            assert_eq!(parsed, schema_ref);
        }
        assert!("developer/v3".parse::<SchemaRef>().is_err());
        assert!("developer".parse::<SchemaRef>().is_err());
    }

    #[test]
    fn artifact_path_follows_layout() {
        let schema_ref = SchemaRef::new(CredentialType::Developer, SchemaVersion::V1);
        assert_eq!(schema_ref.artifact_path(), "developer/v1/developer-credential-v1.schema.json");
    }

    #[test]
    fn detects_declared_schema() {
        let v2 = json!({"type": ["VerifiableCredential", "AgentCredential"]});
        assert_eq!(
            detect_schema_ref(&v2),
            Some(SchemaRef::new(CredentialType::Agent, SchemaVersion::V2))
        );
        let v1 = json!({"schemaVersion": "1.0", "legalName": "Acme"});
        assert_eq!(
            detect_schema_ref(&v1),
            Some(SchemaRef::new(CredentialType::Developer, SchemaVersion::V1))
        );
        assert_eq!(detect_schema_ref(&json!({"schemaVersion": "2.0", "agentId": "x"})), None);
        assert_eq!(detect_schema_ref(&json!({"type": ["DeveloperCredential"]})), None);
    }
}
