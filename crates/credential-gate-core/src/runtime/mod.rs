// crates/credential-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Credential Gate Runtime
// Description: Schema registry, rule evaluation, composition, and the engine.
// Purpose: Execute credential validation against pluggable schema backends.
// Dependencies: crate::{core, interfaces}, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Runtime modules implement every validation stage. External surfaces (CLI,
//! fixture suites) call into [`ValidationEngine`] so results stay identical
//! across entry points.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod composer;
pub mod engine;
pub mod registry;
pub mod rules;
pub mod structural;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SchemaAuditEvent;
pub use audit::SchemaResolutionOutcome;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditSink;
pub use catalog::RuleCatalogOptions;
pub use catalog::builtin_rule_ids;
pub use catalog::builtin_rule_set;
pub use catalog::is_staleness_rule;
pub use composer::compose;
pub use composer::compose_structural_only;
pub use engine::EngineConfig;
pub use engine::EngineError;
pub use engine::ValidationEngine;
pub use engine::ValidationMode;
pub use registry::SchemaRegistry;
pub use rules::DateBound;
pub use rules::MALFORMED_VALUE_RULE_ID;
pub use rules::MalformedField;
pub use rules::OrderingRule;
pub use rules::RuleOutcome;
pub use rules::RulePredicate;
pub use rules::RuleSet;
pub use rules::RuleSetError;
pub use rules::RuleSpec;
pub use rules::StalenessRule;
pub use rules::StatusExpiryRule;
pub use structural::StructuralValidator;
