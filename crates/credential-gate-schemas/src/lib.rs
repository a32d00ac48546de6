// crates/credential-gate-schemas/src/lib.rs
// ============================================================================
// Module: Credential Gate Schemas Library
// Description: Schema artifacts and the JSON Schema structural backend.
// Purpose: Provide concrete schema sources and a compiler for the core engine.
// Dependencies: credential-gate-core, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! This crate supplies everything the core engine treats as an external
//! collaborator on the schema side:
//! - [`BuiltinSchemaSource`] serves the agent and developer schemas (v1, v2)
//!   embedded at build time.
//! - [`DirectorySchemaSource`] loads the same layout from disk so schemas can
//!   be revised without rebuilding.
//! - [`JsonSchemaBackend`] compiles artifacts with `jsonschema` (Draft 2020-12)
//!   and reports every error in collect-all mode.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backend;
pub mod builtin;
pub mod directory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use backend::JsonSchemaBackend;
pub use builtin::BuiltinSchemaSource;
pub use builtin::builtin_schema_text;
pub use directory::DEFAULT_MAX_SCHEMA_BYTES;
pub use directory::DirectorySchemaSource;
