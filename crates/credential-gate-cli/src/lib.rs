// crates/credential-gate-cli/src/lib.rs
// ============================================================================
// Module: Credential Gate CLI Library
// Description: Shared helpers for the credential-gate binary.
// Purpose: Expose message catalog, engine setup, and report rendering.
// Dependencies: credential-gate-config, credential-gate-core, credential-gate-schemas
// ============================================================================

//! ## Overview
//! Library half of the `credential-gate` binary. The entry point in
//! `main.rs` only parses arguments, reads bounded inputs, and writes output;
//! engine assembly and rendering live here so they can be tested directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
pub mod report;
pub mod setup;
