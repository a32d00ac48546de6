// crates/credential-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for schema resolution and validation.
// Purpose: Emit JSON-line logs without hard dependencies on a logging stack.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for validation logging.
//! Events never contain document contents, only schema identity, outcome, and
//! violation tallies. Deployments route events by choosing a sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ReferenceTime;
use crate::core::SchemaRef;
use crate::core::TierCounts;
use crate::core::Verdict;
use crate::interfaces::SchemaError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Schema the document was validated against.
    pub schema: String,
    /// Reference instant supplied by the caller.
    pub reference_time: String,
    /// Verdict validity.
    pub is_valid: bool,
    /// Whether runtime rules were evaluated.
    pub runtime_evaluated: bool,
    /// Total violation count.
    pub violation_count: usize,
    /// Violation counts per tier.
    pub tier_counts: TierCounts,
}

/// Outcome label for schema resolution events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaResolutionOutcome {
    /// Schema compiled and cached.
    Compiled,
    /// No artifact exists.
    NotFound,
    /// Artifact exists but failed to load or compile.
    CompileFailed,
}

/// Schema resolution audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Schema reference being resolved.
    pub schema: String,
    /// Artifact location when known.
    pub location: Option<String>,
    /// Resolution outcome.
    pub outcome: SchemaResolutionOutcome,
    /// Loader or compiler diagnostic on failure.
    pub diagnostic: Option<String>,
}

impl ValidationAuditEvent {
    /// Creates a validation event from a frozen verdict.
    #[must_use]
    pub fn new(schema_ref: SchemaRef, reference_time: ReferenceTime, verdict: &Verdict) -> Self {
        Self {
            event: "credential_validation",
            timestamp_ms: now_millis(),
            schema: schema_ref.to_string(),
            reference_time: reference_time.to_string(),
            is_valid: verdict.is_valid(),
            runtime_evaluated: verdict.runtime_evaluated(),
            violation_count: verdict.violations().len(),
            tier_counts: verdict.tier_counts(),
        }
    }
}

impl SchemaAuditEvent {
    /// Creates a schema resolution event.
    #[must_use]
    pub fn new(schema_ref: SchemaRef, location: Option<String>, error: Option<&SchemaError>) -> Self {
        let (outcome, location, diagnostic) = match error {
            None => (SchemaResolutionOutcome::Compiled, location, None),
            Some(SchemaError::NotFound {
                ..
            }) => (SchemaResolutionOutcome::NotFound, location, None),
            Some(SchemaError::Compile {
                location,
                diagnostic,
                ..
            }) => (
                SchemaResolutionOutcome::CompileFailed,
                Some(location.clone()),
                Some(diagnostic.clone()),
            ),
        };
        Self {
            event: "schema_resolution",
            timestamp_ms: now_millis(),
            schema: schema_ref.to_string(),
            location,
            outcome,
            diagnostic,
        }
    }
}

/// Returns wall-clock milliseconds for event stamping.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record a validation event.
    fn record_validation(&self, event: &ValidationAuditEvent);

    /// Record a schema resolution event.
    fn record_schema(&self, _event: &SchemaAuditEvent) {}
}

/// Audit sink that discards events.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record_validation(&self, _event: &ValidationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record_validation(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_schema(&self, event: &SchemaAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized payload.
    fn append(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record_validation(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }

    fn record_schema(&self, event: &SchemaAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }
}
