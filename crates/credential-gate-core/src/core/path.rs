// crates/credential-gate-core/src/core/path.rs
// ============================================================================
// Module: Document Field Paths
// Description: Field locations inside credential documents.
// Purpose: Address nested credential fields for runtime rules and reports.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`FieldPath`] is an ordered list of object keys (or array indices) into a
//! credential document. Paths are written in dotted form when rules are
//! declared (`credentialSubject.lastUpdated`) and rendered as JSON pointers in
//! reports (`/credentialSubject/lastUpdated`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Field Path
// ============================================================================

/// Location of a field inside a credential document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Builds a path from a dotted field expression.
    #[must_use]
    pub fn dotted(expression: &str) -> Self {
        Self(
            expression
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Builds a path from explicit segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parses an RFC 6901 JSON pointer (`/a/b~1c`) into a path.
    #[must_use]
    pub fn from_pointer(pointer: &str) -> Self {
        Self(
            pointer
                .split('/')
                .skip(1)
                .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
                .collect(),
        )
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Consumes the path and returns its segments.
    #[must_use]
    pub fn into_segments(self) -> Vec<String> {
        self.0
    }

    /// Resolves the path against a document.
    ///
    /// Returns `None` when any segment is missing. Explicit JSON `null` values
    /// are treated as absent.
    #[must_use]
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for segment in &self.0 {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() { None } else { Some(current) }
    }
}

/// Renders path segments as a JSON pointer; the document root renders as `/`.
#[must_use]
pub fn render_pointer(segments: &[String]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut rendered, segment| {
        rendered.push('/');
        rendered.push_str(&segment.replace('~', "~0").replace('/', "~1"));
        rendered
    })
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_pointer(&self.0))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
