// crates/credential-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Schema Registry
// Description: Resolves schema references to compiled schemas, once per key.
// Purpose: Share compiled schemas across concurrent validation calls.
// Dependencies: crate::{core, interfaces, runtime::audit}
// ============================================================================

//! ## Overview
//! The registry loads an artifact through a [`SchemaSource`], compiles it with
//! a [`SchemaBackend`], and publishes the outcome in a per-key [`OnceLock`].
//! Concurrent first callers for the same key block on the same cell, so every
//! schema compiles exactly once. Failures are published too: a missing or
//! malformed schema is a fatal condition for that key and is never retried or
//! replaced by a fallback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::core::SchemaRef;
use crate::interfaces::CompiledSchema;
use crate::interfaces::SchemaBackend;
use crate::interfaces::SchemaError;
use crate::interfaces::SchemaSource;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::SchemaAuditEvent;
use crate::runtime::audit::ValidationAuditSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Published outcome of resolving one schema reference.
type Resolution = Result<Arc<dyn CompiledSchema>, SchemaError>;

/// Per-key compute-once cell.
type Slot = Arc<OnceLock<Resolution>>;

/// Lazily populated, never invalidated cache of compiled schemas.
///
/// # Invariants
/// - Each [`SchemaRef`] is loaded and compiled at most once per registry.
/// - Repeated resolution of an equal reference returns the same `Arc`.
pub struct SchemaRegistry {
    /// Artifact loader.
    source: Arc<dyn SchemaSource>,
    /// Structural schema compiler.
    backend: Arc<dyn SchemaBackend>,
    /// Audit sink for resolution events.
    audit: Arc<dyn ValidationAuditSink>,
    /// Compute-once cells keyed by schema reference.
    slots: RwLock<BTreeMap<SchemaRef, Slot>>,
}

impl SchemaRegistry {
    /// Creates a registry over a source and backend.
    #[must_use]
    pub fn new(source: Arc<dyn SchemaSource>, backend: Arc<dyn SchemaBackend>) -> Self {
        Self {
            source,
            backend,
            audit: Arc::new(NoopAuditSink),
            slots: RwLock::new(BTreeMap::new()),
        }
    }

    /// Routes resolution events to an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Resolves a schema reference to its compiled schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] or [`SchemaError::Compile`]; the same
    /// error is returned on every later call for that reference.
    pub fn resolve(&self, schema_ref: SchemaRef) -> Result<Arc<dyn CompiledSchema>, SchemaError> {
        let slot = self.slot(schema_ref);
        slot.get_or_init(|| self.load_and_compile(schema_ref)).clone()
    }

    /// Returns the schema references resolved so far (successfully or not).
    #[must_use]
    pub fn resolved(&self) -> Vec<SchemaRef> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.iter().filter(|(_, slot)| slot.get().is_some()).map(|(key, _)| *key).collect()
    }

    /// Returns the cell for a key, inserting an empty one on first use.
    fn slot(&self, schema_ref: SchemaRef) -> Slot {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(&schema_ref) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(schema_ref).or_default())
    }

    /// Loads and compiles an artifact, recording the outcome.
    fn load_and_compile(&self, schema_ref: SchemaRef) -> Resolution {
        let artifact = match self.source.load(schema_ref) {
            Ok(artifact) => artifact,
            Err(err) => {
                self.audit.record_schema(&SchemaAuditEvent::new(schema_ref, None, Some(&err)));
                return Err(err);
            }
        };
        let compiled = self.backend.compile(&artifact).map_err(|diagnostic| SchemaError::Compile {
            schema_ref,
            location: artifact.location.clone(),
            diagnostic,
        });
        match compiled {
            Ok(compiled) => {
                self.audit.record_schema(&SchemaAuditEvent::new(
                    schema_ref,
                    Some(artifact.location),
                    None,
                ));
                Ok(Arc::from(compiled))
            }
            Err(err) => {
                self.audit.record_schema(&SchemaAuditEvent::new(
                    schema_ref,
                    Some(artifact.location),
                    Some(&err),
                ));
                Err(err)
            }
        }
    }
}
