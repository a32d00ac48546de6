// crates/credential-gate-schemas/src/backend.rs
// ============================================================================
// Module: JSON Schema Backend
// Description: Structural schema compilation and evaluation via `jsonschema`.
// Purpose: Implement the core schema backend with Draft 2020-12 semantics.
// Dependencies: credential-gate-core, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Schemas compile under Draft 2020-12 with format assertions enabled by
//! default, so `date`, `date-time`, and `uri` values are checked
//! structurally. Evaluation collects every error. Each finding's keyword is
//! the last keyword segment of the failing schema location. Its params carry
//! the backend's typed parameter for that keyword (enum options, the missing
//! property, a numeric limit) under the keyword name, plus the `schema_path`.
//! Keywords without a typed parameter fall back to the keyword's schema value,
//! following local `$ref` hops along the schema location.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use credential_gate_core::CompiledSchema;
use credential_gate_core::FieldPath;
use credential_gate_core::SchemaArtifact;
use credential_gate_core::SchemaBackend;
use credential_gate_core::StructuralFinding;
use jsonschema::Draft;
use jsonschema::ValidationError;
use jsonschema::Validator;
use jsonschema::error::TypeKind;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

// ============================================================================
// SECTION: Backend
// ============================================================================

/// Schema backend built on the `jsonschema` crate.
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaBackend {
    /// Whether `format` keywords are asserted.
    validate_formats: bool,
}

impl JsonSchemaBackend {
    /// Creates a backend with format assertions enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validate_formats: true,
        }
    }

    /// Enables or disables `format` assertions.
    #[must_use]
    pub const fn with_format_validation(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }
}

impl Default for JsonSchemaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBackend for JsonSchemaBackend {
    fn compile(&self, artifact: &SchemaArtifact) -> Result<Box<dyn CompiledSchema>, String> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .should_validate_formats(self.validate_formats)
            .build(&artifact.schema)
            .map_err(|err| err.to_string())?;
        Ok(Box::new(CompiledJsonSchema {
            validator,
            schema: artifact.schema.clone(),
        }))
    }
}

// ============================================================================
// SECTION: Compiled Schema
// ============================================================================

/// A compiled validator together with its source schema.
struct CompiledJsonSchema {
    /// Compiled validator.
    validator: Validator,
    /// Source schema, read for keyword parameters.
    schema: Value,
}

impl CompiledSchema for CompiledJsonSchema {
    fn evaluate(&self, document: &Value) -> Vec<StructuralFinding> {
        self.validator.iter_errors(document).map(|err| self.finding(&err)).collect()
    }
}

impl CompiledJsonSchema {
    /// Converts a backend error into a finding.
    fn finding(&self, err: &ValidationError<'_>) -> StructuralFinding {
        let schema_path = err.schema_path.as_str();
        let keyword = keyword_of(schema_path);
        let mut params = BTreeMap::new();
        let param = kind_param(&err.kind)
            .or_else(|| resolve_schema_path(&self.schema, schema_path).cloned());
        if let Some(value) = param {
            params.insert(keyword.clone(), value);
        }
        params.insert("schema_path".to_string(), Value::String(schema_path.to_string()));
        StructuralFinding {
            path: FieldPath::from_pointer(err.instance_path.as_str()).into_segments(),
            keyword,
            message: err.to_string(),
            params,
        }
    }
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Returns the backend's typed parameter for an error, when it carries one.
fn kind_param(kind: &ValidationErrorKind) -> Option<Value> {
    let value = match kind {
        ValidationErrorKind::Enum {
            options,
        } => options.clone(),
        ValidationErrorKind::Constant {
            expected_value,
        } => expected_value.clone(),
        ValidationErrorKind::Required {
            property,
        } => property.clone(),
        ValidationErrorKind::Pattern {
            pattern,
        } => Value::String(pattern.clone()),
        ValidationErrorKind::Format {
            format,
        } => Value::String(format.clone()),
        ValidationErrorKind::Minimum {
            limit,
        }
        | ValidationErrorKind::Maximum {
            limit,
        }
        | ValidationErrorKind::ExclusiveMinimum {
            limit,
        }
        | ValidationErrorKind::ExclusiveMaximum {
            limit,
        } => limit.clone(),
        ValidationErrorKind::MinLength {
            limit,
        }
        | ValidationErrorKind::MaxLength {
            limit,
        }
        | ValidationErrorKind::MinItems {
            limit,
        }
        | ValidationErrorKind::MaxItems {
            limit,
        }
        | ValidationErrorKind::MinProperties {
            limit,
        }
        | ValidationErrorKind::MaxProperties {
            limit,
        } => Value::from(*limit),
        ValidationErrorKind::AdditionalProperties {
            unexpected,
        }
        | ValidationErrorKind::UnevaluatedProperties {
            unexpected,
        }
        | ValidationErrorKind::UnevaluatedItems {
            unexpected,
        } => Value::from(unexpected.clone()),
        ValidationErrorKind::Type {
            kind,
        } => match kind {
            TypeKind::Single(single) => Value::String(single.to_string()),
            TypeKind::Multiple(set) => {
                Value::Array(set.iter().map(|item| Value::String(item.to_string())).collect())
            }
        },
        _ => return None,
    };
    Some(value)
}

/// Resolves a schema location against the root schema, following local `$ref`s.
///
/// Locations reported by the backend name `$ref` as a segment; the referenced
/// subschema is looked up from the root before the walk continues.
fn resolve_schema_path<'a>(root: &'a Value, schema_path: &str) -> Option<&'a Value> {
    let mut current = root;
    for raw in schema_path.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        current = if segment == "$ref" {
            let target = current.get("$ref")?.as_str()?;
            root.pointer(target.strip_prefix('#')?)?
        } else {
            match current {
                Value::Object(map) => map.get(&segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            }
        };
    }
    Some(current)
}

/// Returns the last keyword segment of a schema location.
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.bytes().all(|byte| byte.is_ascii_digit()))
        .map_or_else(|| "schema".to_string(), |segment| segment.replace("~1", "/").replace("~0", "~"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
