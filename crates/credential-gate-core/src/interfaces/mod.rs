// crates/credential-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Credential Gate Interfaces
// Description: Backend-agnostic seams for schema loading and structural checks.
// Purpose: Keep rule logic independent from any particular schema engine.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The engine talks to two external collaborators through these traits:
//! - [`SchemaSource`] produces the raw schema artifact for a [`SchemaRef`].
//! - [`SchemaBackend`] compiles an artifact into a [`CompiledSchema`] that
//!   evaluates documents in collect-all mode.
//!
//! Any JSON-Schema-compatible engine can be substituted behind these traits
//! without touching runtime rules or verdict composition.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::core::SchemaRef;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal schema resolution failures.
///
/// # Invariants
/// - Cloneable so a failed resolution can be cached and replayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No schema artifact exists for the reference.
    #[error("schema not found for {schema_ref}")]
    NotFound {
        /// Requested schema reference.
        schema_ref: SchemaRef,
    },
    /// The artifact exists but could not be read, parsed, or compiled.
    #[error("schema {schema_ref} failed to compile ({location}): {diagnostic}")]
    Compile {
        /// Requested schema reference.
        schema_ref: SchemaRef,
        /// Location of the offending artifact.
        location: String,
        /// Loader or compiler diagnostic.
        diagnostic: String,
    },
}

impl SchemaError {
    /// Returns the schema reference the error concerns.
    #[must_use]
    pub const fn schema_ref(&self) -> SchemaRef {
        match self {
            Self::NotFound {
                schema_ref,
            }
            | Self::Compile {
                schema_ref, ..
            } => *schema_ref,
        }
    }
}

// ============================================================================
// SECTION: Schema Source
// ============================================================================

/// Raw schema artifact as loaded from its backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaArtifact {
    /// Schema reference the artifact belongs to.
    pub schema_ref: SchemaRef,
    /// Human-readable location (file path or embedded name).
    pub location: String,
    /// Parsed schema document.
    pub schema: Value,
}

/// Loads schema artifacts by reference.
pub trait SchemaSource: Send + Sync {
    /// Loads the artifact for a schema reference.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] when no artifact exists and
    /// [`SchemaError::Compile`] when the artifact is unreadable or not JSON.
    fn load(&self, schema_ref: SchemaRef) -> Result<SchemaArtifact, SchemaError>;
}

// ============================================================================
// SECTION: Schema Backend
// ============================================================================

/// One structural defect reported by a schema backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralFinding {
    /// Instance location of the defect.
    pub path: Vec<String>,
    /// Schema keyword that failed (`required`, `enum`, `format`, ...).
    pub keyword: String,
    /// Backend message.
    pub message: String,
    /// Backend-native parameters, passed through verbatim.
    pub params: BTreeMap<String, Value>,
}

/// A schema compiled by a backend.
pub trait CompiledSchema: Send + Sync {
    /// Evaluates a document and returns every structural defect, in the
    /// backend's deterministic order.
    fn evaluate(&self, document: &Value) -> Vec<StructuralFinding>;
}

/// Compiles schema artifacts into evaluators.
pub trait SchemaBackend: Send + Sync {
    /// Compiles an artifact.
    ///
    /// # Errors
    ///
    /// Returns the compiler diagnostic when the schema is malformed.
    fn compile(&self, artifact: &SchemaArtifact) -> Result<Box<dyn CompiledSchema>, String>;
}
