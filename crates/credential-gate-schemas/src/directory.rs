// crates/credential-gate-schemas/src/directory.rs
// ============================================================================
// Module: Directory Schema Source
// Description: Loads schema artifacts from a directory tree.
// Purpose: Serve revised schemas from disk using the builtin layout.
// Dependencies: credential-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Artifacts live at `{root}/{type}/{version}/{type}-credential-{version}.schema.json`.
//! A missing file is [`SchemaError::NotFound`]; an oversized, unreadable, or
//! non-JSON file is [`SchemaError::Compile`].
//!
//! Security posture: schema files are operator input; reads are size-capped
//! and never follow references outside the artifact itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use credential_gate_core::SchemaArtifact;
use credential_gate_core::SchemaError;
use credential_gate_core::SchemaRef;
use credential_gate_core::SchemaSource;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum schema artifact size in bytes.
pub const DEFAULT_MAX_SCHEMA_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Source
// ============================================================================

/// Schema source reading artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    /// Root of the schema tree.
    root: PathBuf,
    /// Maximum artifact size in bytes.
    max_bytes: usize,
}

impl DirectorySchemaSource {
    /// Creates a source rooted at `root` with the default size cap.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_SCHEMA_BYTES,
        }
    }

    /// Overrides the maximum artifact size.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the artifact path for a reference.
    #[must_use]
    pub fn artifact_path(&self, schema_ref: SchemaRef) -> PathBuf {
        self.root.join(schema_ref.artifact_path())
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn load(&self, schema_ref: SchemaRef) -> Result<SchemaArtifact, SchemaError> {
        let path = self.artifact_path(schema_ref);
        let location = path.display().to_string();
        let compile_error = |diagnostic: String| SchemaError::Compile {
            schema_ref,
            location: location.clone(),
            diagnostic,
        };
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SchemaError::NotFound {
                    schema_ref,
                });
            }
            Err(err) => return Err(compile_error(err.to_string())),
        };
        if !metadata.is_file() {
            return Err(compile_error("schema path is not a regular file".to_string()));
        }
        let limit = u64::try_from(self.max_bytes).unwrap_or(u64::MAX);
        if metadata.len() > limit {
            return Err(compile_error(format!(
                "schema file exceeds size limit of {} bytes",
                self.max_bytes
            )));
        }
        let bytes = fs::read(&path).map_err(|err| compile_error(err.to_string()))?;
        let schema = serde_json::from_slice(&bytes).map_err(|err| compile_error(err.to_string()))?;
        Ok(SchemaArtifact {
            schema_ref,
            location,
            schema,
        })
    }
}
