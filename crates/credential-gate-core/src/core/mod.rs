// crates/credential-gate-core/src/core/mod.rs
// ============================================================================
// Module: Credential Gate Core Types
// Description: Canonical identifiers, time values, violations, and verdicts.
// Purpose: Provide stable, serializable types shared by every validation stage.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types are the canonical source of truth for any derived surface
//! (CLI reports, audit events, fixture suites).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod path;
pub mod time;
pub mod verdict;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::CredentialType;
pub use identifiers::RuleId;
pub use identifiers::SchemaRef;
pub use identifiers::SchemaRefParseError;
pub use identifiers::SchemaVersion;
pub use identifiers::detect_schema_ref;
pub use path::FieldPath;
pub use self::time::ReferenceTime;
pub use self::time::parse_instant;
pub use verdict::TierCounts;
pub use verdict::Verdict;
pub use verdict::VerdictBuilder;
pub use violation::Tier;
pub use violation::Violation;
