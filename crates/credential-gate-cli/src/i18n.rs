// crates/credential-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and placeholder substitution.
// Purpose: Centralize user-facing strings for consistent CLI output.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Every user-facing CLI string lives in a single catalog and is rendered
//! through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions are applied in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "credential-gate {version}"),
    ("main.no_command", "No command given; run `credential-gate --help` for usage."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    ("input.parse_failed", "Failed to parse {kind} at {path} as JSON: {error}"),
    ("input.kind.document", "credential document"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config OK ({source})."),
    ("config.validate.defaults", "built-in defaults"),
    ("setup.failed", "Failed to initialize validation engine: {error}"),
    ("schema.ref_invalid", "{error}"),
    ("schema.detect_failed", "Cannot detect the schema of {path}; pass --schema explicitly."),
    ("schema.resolve_failed", "Schema resolution failed: {error}"),
    ("reference_time.invalid", "Invalid --reference-time {value}: {error}"),
    ("validate.valid", "{path}: VALID ({schema})"),
    ("validate.invalid", "{path}: INVALID ({schema}, {count} violation(s))"),
    ("validate.violation", "  [{tier}] {rule_id} at {pointer}: {message}"),
    ("validate.runtime_skipped", "  note: runtime rules were not evaluated"),
    ("fixtures.dir_failed", "Failed to list fixtures in {path}: {error}"),
    (
        "fixtures.schema_missing",
        "No schema for fixtures in {path}; pass --schema or set it in the manifest.",
    ),
    ("fixtures.manifest_failed", "Failed to load fixture manifest: {error}"),
    (
        "fixtures.none_found",
        "No fixtures with a valid-, invalid-, or tier2-invalid- prefix found in {path}",
    ),
    ("fixtures.header", "Fixture suite {path} ({schema} at {reference_time}):"),
    ("fixtures.pass", "PASS  {name} ({expectation})"),
    ("fixtures.pass_deferred", "PASS* {name} ({expectation}; requires runtime evaluation)"),
    ("fixtures.fail", "FAIL  {name} ({expectation}): {count} violation(s)"),
    (
        "fixtures.summary",
        "{total} fixture(s): {passed} passed, {deferred} require runtime evaluation, {failed} \
         failed",
    ),
    ("schemas.entry.ok", "{schema}  {location}  ok"),
    ("schemas.entry.failed", "{schema}  {location}  FAILED: {error}"),
];

/// Returns the message catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args` into its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
