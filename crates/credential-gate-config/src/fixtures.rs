// crates/credential-gate-config/src/fixtures.rs
// ============================================================================
// Module: Fixture Manifests
// Description: Per-directory manifest describing a fixture suite.
// Purpose: Supply schema, reference time, and runtime-only flags to the runner.
// Dependencies: credential-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! A fixture directory may carry a `fixtures.toml` naming the schema its
//! documents target, the reference time they were authored against, and which
//! fixtures only the runtime rules can reject:
//!
//! ```toml
//! schema = "developer/v1"
//! reference_time = "2025-06-01T00:00:00Z"
//! requires_runtime_evaluation = ["tier2-invalid-screening-stale"]
//! ```
//!
//! Expectations themselves come from fixture file names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use credential_gate_core::Expectation;
use credential_gate_core::FixtureCase;
use credential_gate_core::ReferenceTime;
use credential_gate_core::SchemaRef;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::config::MAX_CONFIG_FILE_SIZE;
use crate::config::validate_path;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Manifest filename inside a fixture directory.
pub const FIXTURE_MANIFEST_NAME: &str = "fixtures.toml";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Raw manifest as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixtureManifest {
    /// Schema reference string, e.g. `agent/v2`.
    #[serde(default)]
    schema: Option<String>,
    /// RFC 3339 reference instant or full date.
    #[serde(default)]
    reference_time: Option<String>,
    /// Fixture names only runtime rules can reject.
    #[serde(default)]
    requires_runtime_evaluation: Vec<String>,
}

/// Validated fixture suite manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureManifest {
    /// Schema every fixture in the directory targets.
    pub schema: Option<SchemaRef>,
    /// Reference time the fixtures were authored against.
    pub reference_time: Option<ReferenceTime>,
    /// Fixture names (file stems) flagged as runtime-only rejections.
    pub requires_runtime_evaluation: BTreeSet<String>,
}

impl FixtureManifest {
    /// Loads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes =
            fs::read(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("fixture manifest exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("fixture manifest must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Loads `fixtures.toml` from a directory, or an empty manifest when the
    /// directory has none.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present manifest is invalid.
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(FIXTURE_MANIFEST_NAME);
        if path.is_file() { Self::load(&path) } else { Ok(Self::default()) }
    }

    /// Parses and validates a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text cannot be parsed or validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawFixtureManifest =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let schema = raw
            .schema
            .as_deref()
            .map(str::parse::<SchemaRef>)
            .transpose()
            .map_err(|err| ConfigError::Invalid(format!("schema: {err}")))?;
        let reference_time = raw
            .reference_time
            .as_deref()
            .map(ReferenceTime::parse)
            .transpose()
            .map_err(|err| ConfigError::Invalid(format!("reference_time: {err}")))?;
        let mut flagged = BTreeSet::new();
        for name in raw.requires_runtime_evaluation {
            match Expectation::from_fixture_name(&name) {
                Some(Expectation::MustBeTier1Invalid | Expectation::MustBeTier2Invalid) => {}
                Some(Expectation::MustBeValid) => {
                    return Err(ConfigError::Invalid(format!(
                        "requires_runtime_evaluation: {name} is expected to be valid"
                    )));
                }
                None => {
                    return Err(ConfigError::Invalid(format!(
                        "requires_runtime_evaluation: {name} has no expectation prefix"
                    )));
                }
            }
            if !flagged.insert(name.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "requires_runtime_evaluation: duplicate fixture {name}"
                )));
            }
        }
        Ok(Self {
            schema,
            reference_time,
            requires_runtime_evaluation: flagged,
        })
    }

    /// Builds the case for a fixture name, or `None` when the name carries no
    /// expectation prefix.
    #[must_use]
    pub fn case_for(&self, name: &str) -> Option<FixtureCase> {
        let expectation = Expectation::from_fixture_name(name)?;
        let case = FixtureCase::new(name, expectation);
        if self.requires_runtime_evaluation.contains(name) {
            Some(case.requiring_runtime_evaluation())
        } else {
            Some(case)
        }
    }
}
