// crates/credential-gate-core/src/runtime/catalog.rs
// ============================================================================
// Module: Builtin Rule Catalog
// Description: Runtime rules shipped for agent and developer credentials.
// Purpose: Bind rule families to concrete credential fields per schema version.
// Dependencies: crate::{core, runtime::rules}, time
// ============================================================================

//! ## Overview
//! Each builtin rule is scoped to exactly one schema; its id is
//! `{type}.{version}.{name}`. v1 documents are flat, v2 documents carry the
//! subject fields under `credentialSubject` and use the W3C `validFrom` /
//! `validUntil` window.
//!
//! | name | family | tier |
//! |------|--------|------|
//! | `validity_window_order` | ordering | Tier 1 |
//! | `last_updated_after_issuance` (developer) | ordering | Tier 1 |
//! | `last_updated_not_future` (developer) | ordering vs. reference time | Tier 1 |
//! | `safety_evaluation_not_future` (agent) | ordering vs. reference time | Tier 1 |
//! | `status_matches_expiry` | derived status | Tier 2 |
//! | `sanctions_screening_fresh` (developer, 90 days) | staleness | Tier 2 |
//! | `pep_assessment_fresh` (developer, 180 days) | staleness | Tier 2 |
//! | `tax_verification_fresh` (developer, 365 days) | staleness | Tier 2 |
//! | `safety_evaluation_fresh` (agent, 180 days) | staleness | Tier 2 |
//! | `security_audit_fresh` (agent, 365 days) | staleness | Tier 2 |

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use time::Duration;

use crate::core::CredentialType;
use crate::core::FieldPath;
use crate::core::RuleId;
use crate::core::SchemaRef;
use crate::core::SchemaVersion;
use crate::core::Tier;
use crate::runtime::rules::OrderingRule;
use crate::runtime::rules::RulePredicate;
use crate::runtime::rules::RuleSet;
use crate::runtime::rules::RuleSetError;
use crate::runtime::rules::RuleSpec;
use crate::runtime::rules::StalenessRule;
use crate::runtime::rules::StatusExpiryRule;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Adjustments applied when building the builtin rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalogOptions {
    /// Rules to leave out.
    pub disabled: BTreeSet<RuleId>,
    /// Replacement maximum ages for staleness rules.
    pub staleness_overrides: BTreeMap<RuleId, Duration>,
}

// ============================================================================
// SECTION: Catalog Entries
// ============================================================================

/// Field layout that differs between schema versions.
struct Layout {
    /// Prefix for subject fields (`""` for v1, `credentialSubject.` for v2).
    subject_prefix: &'static str,
    /// Validity start field.
    valid_from: &'static str,
    /// Validity end field.
    valid_until: &'static str,
    /// Declared status field.
    status: String,
}

impl Layout {
    /// Returns the layout for a schema.
    fn for_schema(schema_ref: SchemaRef) -> Self {
        match (schema_ref.version, schema_ref.credential_type) {
            (SchemaVersion::V1, CredentialType::Developer) => Self {
                subject_prefix: "",
                valid_from: "issuanceDate",
                valid_until: "expirationDate",
                status: "credentialStatus".to_string(),
            },
            (SchemaVersion::V1, CredentialType::Agent) => Self {
                subject_prefix: "",
                valid_from: "credentialIssuanceDate",
                valid_until: "credentialExpirationDate",
                status: "credentialStatus".to_string(),
            },
            (SchemaVersion::V2, _) => Self {
                subject_prefix: "credentialSubject.",
                valid_from: "validFrom",
                valid_until: "validUntil",
                status: "credentialSubject.status".to_string(),
            },
        }
    }

    /// Qualifies a subject field name.
    fn subject(&self, field: &str) -> String {
        format!("{}{field}", self.subject_prefix)
    }
}

/// One catalog rule plus the attestation field when it is a staleness rule.
struct CatalogEntry {
    /// Rule as shipped.
    spec: RuleSpec,
    /// Attestation field for staleness rules, used to rebuild overrides.
    staleness_field: Option<FieldPath>,
}

/// Accumulates catalog entries for one schema.
struct EntryBuilder<'a> {
    /// Schema the rules are scoped to.
    schema_ref: SchemaRef,
    /// Output list.
    entries: &'a mut Vec<CatalogEntry>,
}

impl EntryBuilder<'_> {
    /// Adds an ordering or derived-status rule.
    fn rule(&mut self, name: &str, tier: Tier, predicate: impl RulePredicate + 'static) {
        self.entries.push(CatalogEntry {
            spec: RuleSpec::new(RuleId::scoped(self.schema_ref, name), tier, [self.schema_ref], predicate),
            staleness_field: None,
        });
    }

    /// Adds a Tier 2 staleness rule.
    fn staleness(&mut self, name: &str, field: &str, max_age_days: i64) {
        let rule = StalenessRule::days(field, max_age_days);
        let staleness_field = Some(rule.field().clone());
        self.entries.push(CatalogEntry {
            spec: RuleSpec::new(
                RuleId::scoped(self.schema_ref, name),
                Tier::Tier2Consistency,
                [self.schema_ref],
                rule,
            ),
            staleness_field,
        });
    }
}

/// Builds every builtin rule, before options are applied.
fn catalog_entries() -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for schema_ref in SchemaRef::all() {
        let layout = Layout::for_schema(schema_ref);
        let mut builder = EntryBuilder {
            schema_ref,
            entries: &mut entries,
        };
        builder.rule(
            "validity_window_order",
            Tier::Tier1Critical,
            OrderingRule::fields(layout.valid_from, layout.valid_until),
        );
        builder.rule(
            "status_matches_expiry",
            Tier::Tier2Consistency,
            StatusExpiryRule::new(&layout.status, layout.valid_until),
        );
        match schema_ref.credential_type {
            CredentialType::Developer => {
                let last_updated = match schema_ref.version {
                    SchemaVersion::V1 => "lastUpdatedDate".to_string(),
                    SchemaVersion::V2 => layout.subject("lastUpdated"),
                };
                builder.rule(
                    "last_updated_after_issuance",
                    Tier::Tier1Critical,
                    OrderingRule::fields(layout.valid_from, &last_updated),
                );
                builder.rule(
                    "last_updated_not_future",
                    Tier::Tier1Critical,
                    OrderingRule::not_in_future(&last_updated),
                );
                builder.staleness(
                    "sanctions_screening_fresh",
                    &layout.subject("sanctionsScreeningLastChecked"),
                    90,
                );
                builder.staleness("pep_assessment_fresh", &layout.subject("pepRiskLastAssessed"), 180);
                builder.staleness(
                    "tax_verification_fresh",
                    &layout.subject("taxIdLastVerifiedDate"),
                    365,
                );
            }
            CredentialType::Agent => {
                let safety = layout.subject("safetyEvaluationDate");
                builder.rule(
                    "safety_evaluation_not_future",
                    Tier::Tier1Critical,
                    OrderingRule::not_in_future(&safety),
                );
                builder.staleness("safety_evaluation_fresh", &safety, 180);
                builder.staleness(
                    "security_audit_fresh",
                    &layout.subject("lastSecurityAuditDate"),
                    365,
                );
            }
        }
    }
    entries
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns the ids of every builtin rule in canonical order.
#[must_use]
pub fn builtin_rule_ids() -> Vec<RuleId> {
    let mut ids: Vec<RuleId> =
        catalog_entries().iter().map(|entry| entry.spec.rule_id().clone()).collect();
    ids.sort();
    ids
}

/// Returns true when a builtin rule id names a staleness rule.
#[must_use]
pub fn is_staleness_rule(rule_id: &RuleId) -> bool {
    catalog_entries()
        .iter()
        .any(|entry| entry.staleness_field.is_some() && entry.spec.rule_id() == rule_id)
}

/// Builds the builtin rule set with options applied.
///
/// # Errors
///
/// Returns [`RuleSetError`] when an option names an unknown rule, a staleness
/// override targets a non-staleness rule, or an override is not positive.
pub fn builtin_rule_set(options: &RuleCatalogOptions) -> Result<RuleSet, RuleSetError> {
    let entries: BTreeMap<RuleId, CatalogEntry> = catalog_entries()
        .into_iter()
        .map(|entry| (entry.spec.rule_id().clone(), entry))
        .collect();
    if let Some(unknown) = options.disabled.iter().find(|id| !entries.contains_key(*id)) {
        return Err(RuleSetError::UnknownRule(unknown.clone()));
    }
    for (rule_id, max_age) in &options.staleness_overrides {
        let Some(entry) = entries.get(rule_id) else {
            return Err(RuleSetError::UnknownRule(rule_id.clone()));
        };
        if entry.staleness_field.is_none() {
            return Err(RuleSetError::NotStaleness(rule_id.clone()));
        }
        if !max_age.is_positive() {
            return Err(RuleSetError::InvalidMaxAge(rule_id.clone()));
        }
    }
    let mut set = RuleSet::new();
    for (rule_id, entry) in entries {
        if options.disabled.contains(&rule_id) {
            continue;
        }
        let spec = match (options.staleness_overrides.get(&rule_id), entry.staleness_field) {
            (Some(max_age), Some(field)) => RuleSpec::new(
                rule_id,
                entry.spec.tier(),
                entry.spec.applicable().iter().copied(),
                StalenessRule::new(field, *max_age),
            ),
            _ => entry.spec,
        };
        set.register(spec)?;
    }
    Ok(set)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_scoped() {
        let ids = builtin_rule_ids();
        let unique: BTreeSet<&RuleId> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), 24);
        assert!(ids.iter().any(|id| id.as_str() == "developer.v1.sanctions_screening_fresh"));
        assert!(ids.iter().any(|id| id.as_str() == "agent.v2.validity_window_order"));
    }

    #[test]
    fn every_builtin_rule_applies_to_exactly_one_schema() {
        let set = builtin_rule_set(&RuleCatalogOptions::default()).unwrap();
        for spec in set.iter() {
            assert_eq!(spec.applicable().len(), 1);
            let schema_ref = *spec.applicable().iter().next().unwrap();
            assert!(spec.rule_id().as_str().starts_with(&format!(
                "{}.{}.",
                schema_ref.credential_type, schema_ref.version
            )));
            assert_ne!(spec.tier(), Tier::Structural);
        }
    }

    #[test]
    fn options_are_validated() {
        let mut options = RuleCatalogOptions::default();
        options.disabled.insert(RuleId::new("developer.v1.nope"));
        assert_eq!(
            builtin_rule_set(&options).err(),
            Some(RuleSetError::UnknownRule(RuleId::new("developer.v1.nope")))
        );

        let mut options = RuleCatalogOptions::default();
        options
            .staleness_overrides
            .insert(RuleId::new("developer.v1.validity_window_order"), Duration::days(3));
        assert_eq!(
            builtin_rule_set(&options).err(),
            Some(RuleSetError::NotStaleness(RuleId::new("developer.v1.validity_window_order")))
        );

        let mut options = RuleCatalogOptions::default();
        options
            .staleness_overrides
            .insert(RuleId::new("agent.v1.security_audit_fresh"), Duration::ZERO);
        assert_eq!(
            builtin_rule_set(&options).err(),
            Some(RuleSetError::InvalidMaxAge(RuleId::new("agent.v1.security_audit_fresh")))
        );
    }

    #[test]
    fn disabled_rules_are_left_out() {
        let mut options = RuleCatalogOptions::default();
        options.disabled.insert(RuleId::new("developer.v2.pep_assessment_fresh"));
        let set = builtin_rule_set(&options).unwrap();
        assert_eq!(set.len(), 23);
        assert!(set.get(&RuleId::new("developer.v2.pep_assessment_fresh")).is_none());
    }
}
