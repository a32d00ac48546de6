//! Config load validation tests for credential-gate-config.
// crates/credential-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

#![allow(
    clippy::use_debug,
    clippy::panic_in_result_fn,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::io::Write;
use std::path::Path;

use credential_gate_config::AuditSinkKind;
use credential_gate_config::ConfigError;
use credential_gate_config::CredentialGateConfig;
use credential_gate_core::RuleId;
use credential_gate_core::ValidationMode;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CredentialGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(CredentialGateConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(CredentialGateConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(CredentialGateConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(CredentialGateConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(CredentialGateConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("[validation\nmode = ")?;
    assert_invalid(CredentialGateConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_section() -> TestResult {
    let file = write_config("[server]\nport = 8080\n")?;
    assert_invalid(CredentialGateConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_empty_file_yields_defaults() -> TestResult {
    let file = write_config("")?;
    let config = CredentialGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.validation.mode != ValidationMode::Full {
        return Err("default mode should be full".to_string());
    }
    if !config.validation.validate_formats {
        return Err("format validation should default on".to_string());
    }
    if config.schemas.root.is_some() {
        return Err("builtin schemas should be the default".to_string());
    }
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit should default to none".to_string());
    }
    if config.source_path.as_deref() != Some(file.path()) {
        return Err("source path should be recorded".to_string());
    }
    Ok(())
}

#[test]
fn load_full_config_round_trips_sections() -> TestResult {
    let file = write_config(
        r#"
[schemas]
root = "schemas"
max_schema_bytes = 65536

[validation]
mode = "structural_only"
validate_formats = false
max_document_bytes = 4096

[rules]
disabled = ["agent.v1.security_audit_fresh"]

[rules.staleness_days]
"developer.v1.sanctions_screening_fresh" = 30

[audit]
sink = "file"
path = "audit.log"
"#,
    )?;
    let config = CredentialGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.engine_config().mode != ValidationMode::StructuralOnly {
        return Err("mode should map into the engine config".to_string());
    }
    if config.validation.validate_formats {
        return Err("format validation should be off".to_string());
    }
    if config.schemas.max_schema_bytes != 65_536 || config.validation.max_document_bytes != 4_096 {
        return Err("limits should be read".to_string());
    }
    let options = config.catalog_options();
    if !options.disabled.contains(&RuleId::from("agent.v1.security_audit_fresh")) {
        return Err("disabled rule should map into catalog options".to_string());
    }
    let window = options.staleness_overrides.get(&RuleId::from("developer.v1.sanctions_screening_fresh"));
    if window != Some(&time::Duration::days(30)) {
        return Err(format!("unexpected staleness override {window:?}"));
    }
    Ok(())
}
