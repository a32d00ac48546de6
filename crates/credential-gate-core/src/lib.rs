// crates/credential-gate-core/src/lib.rs
// ============================================================================
// Module: Credential Gate Core Library
// Description: Public API surface for the credential validation engine.
// Purpose: Expose core types, interfaces, runtime stages, and fixture helpers.
// Dependencies: crate::{core, interfaces, runtime, fixtures}
// ============================================================================

//! ## Overview
//! Credential Gate core validates agent and developer credentials against
//! versioned schemas and layers runtime temporal and consistency rules on top
//! of structural validation. Every call yields one tiered, explainable
//! verdict. The structural backend is pluggable through
//! [`interfaces::SchemaBackend`]; this crate does not embed a JSON Schema
//! engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod fixtures;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use fixtures::Annotation;
pub use fixtures::Classification;
pub use fixtures::ClassificationOutcome;
pub use fixtures::Expectation;
pub use fixtures::FixtureCase;
pub use fixtures::FixtureSummary;
pub use fixtures::classify;
pub use interfaces::CompiledSchema;
pub use interfaces::SchemaArtifact;
pub use interfaces::SchemaBackend;
pub use interfaces::SchemaError;
pub use interfaces::SchemaSource;
pub use interfaces::StructuralFinding;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::RuleCatalogOptions;
pub use runtime::RuleSet;
pub use runtime::RuleSetError;
pub use runtime::RuleSpec;
pub use runtime::SchemaRegistry;
pub use runtime::ValidationEngine;
pub use runtime::ValidationMode;
pub use runtime::builtin_rule_set;
