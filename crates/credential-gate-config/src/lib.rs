// crates/credential-gate-config/src/lib.rs
// ============================================================================
// Module: Credential Gate Config Library
// Description: Canonical config model, validation, and fixture manifests.
// Purpose: Single source of truth for credential-gate.toml semantics.
// Dependencies: credential-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `credential-gate-config` defines the canonical configuration model for
//! Credential Gate and the manifest format of fixture suites. Both are parsed
//! from TOML with strict, fail-closed validation.
//!
//! Security posture: config inputs are untrusted; reads are size-capped and
//! every section is validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod fixtures;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use fixtures::FIXTURE_MANIFEST_NAME;
pub use fixtures::FixtureManifest;
