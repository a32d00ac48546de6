// crates/credential-gate-core/src/runtime/rules.rs
// ============================================================================
// Module: Temporal and Consistency Rules
// Description: Runtime predicates that a declarative schema cannot express.
// Purpose: Evaluate ordering, staleness, and derived-status rules deterministically.
// Dependencies: crate::core, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Every runtime rule is a pure function of `(document, reference_time)` and
//! reports at most one defect. Three families are provided:
//! - [`OrderingRule`]: a date must not be after another date (or after the
//!   reference time).
//! - [`StalenessRule`]: an attestation must not be older than a maximum age;
//!   exactly the maximum age is still fresh.
//! - [`StatusExpiryRule`]: a declared status must agree with the status
//!   derived from an expiry date.
//!
//! Absent fields make a rule not applicable; required-field checks belong to
//! structural validation. Present values that cannot be interpreted are
//! collected by the [`RuleSet`] and reported once per path as a Tier 1
//! `document.malformed_value` violation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

use crate::core::FieldPath;
use crate::core::ReferenceTime;
use crate::core::RuleId;
use crate::core::SchemaRef;
use crate::core::Tier;
use crate::core::Violation;
use crate::core::parse_instant;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rule identifier reported for present-but-uninterpretable values.
pub const MALFORMED_VALUE_RULE_ID: &str = "document.malformed_value";

/// Rule identifier prefix reserved for structural violations.
const STRUCTURAL_RULE_PREFIX: &str = "structural.";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule registration and catalog errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    /// A rule id was registered twice.
    #[error("duplicate rule id {0}")]
    DuplicateRuleId(RuleId),
    /// Runtime rules cannot claim the structural tier.
    #[error("rule {0} declares the structural tier, which is reserved for schema validation")]
    StructuralTier(RuleId),
    /// A rule id collides with an engine-reserved identifier.
    #[error("rule id {0} is reserved")]
    ReservedRuleId(RuleId),
    /// A rule declares no applicable schema.
    #[error("rule {0} applies to no schema")]
    EmptyApplicability(RuleId),
    /// An option references a rule the catalog does not define.
    #[error("unknown rule id {0}")]
    UnknownRule(RuleId),
    /// A staleness override targets a rule of another family.
    #[error("rule {0} is not a staleness rule")]
    NotStaleness(RuleId),
    /// A staleness window must be strictly positive.
    #[error("rule {0} staleness window must be positive")]
    InvalidMaxAge(RuleId),
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// A present value a rule could not interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedField {
    /// Location of the value.
    pub path: FieldPath,
    /// The offending value, verbatim.
    pub value: Value,
    /// Why the value could not be interpreted.
    pub reason: String,
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule holds.
    Holds,
    /// The fields the rule inspects are absent.
    NotApplicable,
    /// The rule failed with exactly one defect.
    Violated {
        /// Location of the defect.
        path: FieldPath,
        /// Human-readable explanation.
        message: String,
        /// Parameters backing the message.
        params: BTreeMap<String, Value>,
    },
    /// Inputs the rule depends on are present but uninterpretable.
    Malformed(Vec<MalformedField>),
}

/// A runtime predicate over a document and reference time.
///
/// # Invariants
/// - Implementations are pure: no clock reads, no I/O, no shared mutation.
pub trait RulePredicate: Send + Sync {
    /// Evaluates the predicate.
    fn evaluate(&self, document: &Value, reference_time: ReferenceTime) -> RuleOutcome;
}

// ============================================================================
// SECTION: Field Readers
// ============================================================================

/// A parsed date together with its raw text.
struct DateValue<'a> {
    /// Parsed instant.
    instant: OffsetDateTime,
    /// Raw field text.
    raw: &'a str,
}

/// Reads an optional date field.
fn read_date<'a>(
    document: &'a Value,
    path: &FieldPath,
) -> Result<Option<DateValue<'a>>, MalformedField> {
    let Some(value) = path.lookup(document) else {
        return Ok(None);
    };
    let Some(raw) = value.as_str() else {
        return Err(MalformedField {
            path: path.clone(),
            value: value.clone(),
            reason: "expected a date string".to_string(),
        });
    };
    match parse_instant(raw) {
        Ok(instant) => Ok(Some(DateValue {
            instant,
            raw,
        })),
        Err(reason) => Err(MalformedField {
            path: path.clone(),
            value: value.clone(),
            reason,
        }),
    }
}

/// Reads an optional string field.
fn read_string<'a>(document: &'a Value, path: &FieldPath) -> Result<Option<&'a str>, MalformedField> {
    let Some(value) = path.lookup(document) else {
        return Ok(None);
    };
    value.as_str().map(Some).ok_or_else(|| MalformedField {
        path: path.clone(),
        value: value.clone(),
        reason: "expected a string".to_string(),
    })
}

/// Reads several dates, gathering every malformed value.
fn read_dates<'a, const N: usize>(
    document: &'a Value,
    paths: [&FieldPath; N],
) -> Result<[Option<DateValue<'a>>; N], RuleOutcome> {
    let mut malformed = Vec::new();
    let values = paths.map(|path| match read_date(document, path) {
        Ok(value) => value,
        Err(field) => {
            malformed.push(field);
            None
        }
    });
    if malformed.is_empty() { Ok(values) } else { Err(RuleOutcome::Malformed(malformed)) }
}

// ============================================================================
// SECTION: Ordering Rules
// ============================================================================

/// Upper bound of an ordering rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    /// Another date field of the document.
    Field(FieldPath),
    /// The reference time of the validation call.
    ReferenceTime,
}

/// "A must not be after B".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingRule {
    /// Field that must come first.
    earlier: FieldPath,
    /// Bound it must not exceed.
    later: DateBound,
}

impl OrderingRule {
    /// Orders two fields.
    #[must_use]
    pub fn fields(earlier: &str, later: &str) -> Self {
        Self {
            earlier: FieldPath::dotted(earlier),
            later: DateBound::Field(FieldPath::dotted(later)),
        }
    }

    /// Requires a field not to be after the reference time.
    #[must_use]
    pub fn not_in_future(field: &str) -> Self {
        Self {
            earlier: FieldPath::dotted(field),
            later: DateBound::ReferenceTime,
        }
    }
}

impl RulePredicate for OrderingRule {
    fn evaluate(&self, document: &Value, reference_time: ReferenceTime) -> RuleOutcome {
        let reference_raw = reference_time.to_string();
        let (earlier, later, later_label) = match &self.later {
            DateBound::Field(path) => match read_dates(document, [&self.earlier, path]) {
                Ok([Some(earlier), Some(later)]) => (earlier, later, path.to_string()),
                Ok(_) => return RuleOutcome::NotApplicable,
                Err(outcome) => return outcome,
            },
            DateBound::ReferenceTime => match read_dates(document, [&self.earlier]) {
                Ok([Some(earlier)]) => (
                    earlier,
                    DateValue {
                        instant: reference_time.instant(),
                        raw: reference_raw.as_str(),
                    },
                    "reference time".to_string(),
                ),
                Ok(_) => return RuleOutcome::NotApplicable,
                Err(outcome) => return outcome,
            },
        };
        if earlier.instant <= later.instant {
            return RuleOutcome::Holds;
        }
        let mut params = BTreeMap::new();
        params.insert("field".to_string(), json!(self.earlier.to_string()));
        params.insert("value".to_string(), json!(earlier.raw));
        params.insert("bound".to_string(), json!(later_label));
        params.insert("bound_value".to_string(), json!(later.raw));
        RuleOutcome::Violated {
            path: self.earlier.clone(),
            message: format!(
                "{} ({}) must not be after {} ({})",
                self.earlier, earlier.raw, later_label, later.raw
            ),
            params,
        }
    }
}

// ============================================================================
// SECTION: Staleness Rules
// ============================================================================

/// "An attestation must be at most `max_age` old at the reference time".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessRule {
    /// Attestation timestamp field.
    attested_at: FieldPath,
    /// Maximum permitted age; exactly this age is still fresh.
    max_age: Duration,
}

impl StalenessRule {
    /// Creates a staleness rule with a maximum age in whole days.
    #[must_use]
    pub fn days(field: &str, max_age_days: i64) -> Self {
        Self::new(FieldPath::dotted(field), Duration::days(max_age_days))
    }

    /// Creates a staleness rule with an explicit maximum age.
    #[must_use]
    pub const fn new(attested_at: FieldPath, max_age: Duration) -> Self {
        Self {
            attested_at,
            max_age,
        }
    }

    /// Returns the maximum permitted age.
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns the attestation field.
    #[must_use]
    pub const fn field(&self) -> &FieldPath {
        &self.attested_at
    }
}

impl RulePredicate for StalenessRule {
    fn evaluate(&self, document: &Value, reference_time: ReferenceTime) -> RuleOutcome {
        let attested = match read_dates(document, [&self.attested_at]) {
            Ok([Some(attested)]) => attested,
            Ok([None]) => return RuleOutcome::NotApplicable,
            Err(outcome) => return outcome,
        };
        let age = reference_time.instant() - attested.instant;
        if age <= self.max_age {
            return RuleOutcome::Holds;
        }
        let mut params = BTreeMap::new();
        params.insert("field".to_string(), json!(self.attested_at.to_string()));
        params.insert("attested_at".to_string(), json!(attested.raw));
        params.insert("max_age_days".to_string(), json!(self.max_age.whole_days()));
        params.insert("age_seconds".to_string(), json!(age.whole_seconds()));
        params.insert("reference_time".to_string(), json!(reference_time.to_string()));
        RuleOutcome::Violated {
            path: self.attested_at.clone(),
            message: format!(
                "{} ({}) is stale: {} days old, maximum is {} days",
                self.attested_at,
                attested.raw,
                age.whole_days(),
                self.max_age.whole_days()
            ),
            params,
        }
    }
}

// ============================================================================
// SECTION: Derived-Status Rules
// ============================================================================

/// Status label derived when an expiry date has passed.
const DERIVED_EXPIRED: &str = "expired";
/// Status label derived when an expiry date has not passed.
const DERIVED_NOT_EXPIRED: &str = "not_expired";

/// "A declared status must agree with the status derived from expiry".
///
/// The derived status is `expired` when the expiry is strictly before the
/// reference time, otherwise the declared status stands. Exempt statuses
/// (terminal states such as `revoked`) are never flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusExpiryRule {
    /// Declared status field.
    status: FieldPath,
    /// Expiry date field.
    expiry: FieldPath,
    /// Status value that means "expired".
    expired_value: String,
    /// Status values exempt from the check.
    exempt: BTreeSet<String>,
}

impl StatusExpiryRule {
    /// Creates a rule with `expired` as the expired status and `revoked` exempt.
    #[must_use]
    pub fn new(status: &str, expiry: &str) -> Self {
        Self {
            status: FieldPath::dotted(status),
            expiry: FieldPath::dotted(expiry),
            expired_value: DERIVED_EXPIRED.to_string(),
            exempt: BTreeSet::from(["revoked".to_string()]),
        }
    }

    /// Replaces the exempt status set.
    #[must_use]
    pub fn with_exempt<I, S>(mut self, exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt = exempt.into_iter().map(Into::into).collect();
        self
    }
}

impl RulePredicate for StatusExpiryRule {
    fn evaluate(&self, document: &Value, reference_time: ReferenceTime) -> RuleOutcome {
        let status = read_string(document, &self.status);
        let expiry = read_dates(document, [&self.expiry]);
        let (status, expiry) = match (status, expiry) {
            (Ok(Some(status)), Ok([Some(expiry)])) => (status, expiry),
            (Err(field), Err(RuleOutcome::Malformed(mut fields))) => {
                fields.insert(0, field);
                return RuleOutcome::Malformed(fields);
            }
            (Err(field), _) => return RuleOutcome::Malformed(vec![field]),
            (_, Err(outcome)) => return outcome,
            _ => return RuleOutcome::NotApplicable,
        };
        if self.exempt.contains(status) {
            return RuleOutcome::Holds;
        }
        let now = reference_time.instant();
        let derived = if status == self.expired_value {
            if expiry.instant > now { DERIVED_NOT_EXPIRED } else { return RuleOutcome::Holds }
        } else if expiry.instant < now {
            DERIVED_EXPIRED
        } else {
            return RuleOutcome::Holds;
        };
        let mut params = BTreeMap::new();
        params.insert("declared".to_string(), json!(status));
        params.insert("derived".to_string(), json!(derived));
        params.insert("expiry_field".to_string(), json!(self.expiry.to_string()));
        params.insert("expiry".to_string(), json!(expiry.raw));
        params.insert("reference_time".to_string(), json!(reference_time.to_string()));
        RuleOutcome::Violated {
            path: self.status.clone(),
            message: format!(
                "{} declares `{status}` but {} ({}) derives `{derived}` at {reference_time}",
                self.status, self.expiry, expiry.raw
            ),
            params,
        }
    }
}

// ============================================================================
// SECTION: Rule Specs
// ============================================================================

/// A registered runtime rule.
///
/// # Invariants
/// - `tier` is never [`Tier::Structural`].
/// - `applicable` is non-empty.
#[derive(Clone)]
pub struct RuleSpec {
    /// Globally unique rule identifier.
    rule_id: RuleId,
    /// Schemas the rule applies to.
    applicable: BTreeSet<SchemaRef>,
    /// Severity of the rule's violations.
    tier: Tier,
    /// The predicate.
    predicate: Arc<dyn RulePredicate>,
}

impl RuleSpec {
    /// Creates a rule spec.
    pub fn new(
        rule_id: impl Into<RuleId>,
        tier: Tier,
        applicable: impl IntoIterator<Item = SchemaRef>,
        predicate: impl RulePredicate + 'static,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            applicable: applicable.into_iter().collect(),
            tier,
            predicate: Arc::new(predicate),
        }
    }

    /// Returns the rule identifier.
    #[must_use]
    pub const fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    /// Returns the tier.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Returns the applicable schemas.
    #[must_use]
    pub const fn applicable(&self) -> &BTreeSet<SchemaRef> {
        &self.applicable
    }

    /// Returns true when the rule applies to a schema.
    #[must_use]
    pub fn applies_to(&self, schema_ref: SchemaRef) -> bool {
        self.applicable.contains(&schema_ref)
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn evaluate(&self, document: &Value, reference_time: ReferenceTime) -> RuleOutcome {
        self.predicate.evaluate(document, reference_time)
    }
}

// ============================================================================
// SECTION: Rule Set
// ============================================================================

/// Malformed value accumulated across rules.
struct MalformedEntry {
    /// The offending value.
    value: Value,
    /// Reason from the first rule that reported it.
    reason: String,
    /// Rules that depended on the value.
    reported_by: BTreeSet<RuleId>,
}

/// Immutable-after-construction collection of runtime rules.
///
/// # Invariants
/// - Rule ids are unique.
/// - Evaluation walks rules in id order; results never depend on that order.
#[derive(Clone, Default)]
pub struct RuleSet {
    /// Rules keyed by identifier.
    rules: BTreeMap<RuleId, RuleSpec>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError`] when the id is duplicate or reserved, the tier
    /// is structural, or the rule applies to no schema.
    pub fn register(&mut self, spec: RuleSpec) -> Result<(), RuleSetError> {
        let rule_id = spec.rule_id.clone();
        if rule_id.as_str() == MALFORMED_VALUE_RULE_ID
            || rule_id.as_str().starts_with(STRUCTURAL_RULE_PREFIX)
        {
            return Err(RuleSetError::ReservedRuleId(rule_id));
        }
        if spec.tier == Tier::Structural {
            return Err(RuleSetError::StructuralTier(rule_id));
        }
        if spec.applicable.is_empty() {
            return Err(RuleSetError::EmptyApplicability(rule_id));
        }
        if self.rules.contains_key(&rule_id) {
            return Err(RuleSetError::DuplicateRuleId(rule_id));
        }
        self.rules.insert(rule_id, spec);
        Ok(())
    }

    /// Builds a rule set from specs.
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, RuleSetError> {
        let mut set = Self::new();
        for spec in specs {
            set.register(spec)?;
        }
        Ok(set)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns a rule by id.
    #[must_use]
    pub fn get(&self, rule_id: &RuleId) -> Option<&RuleSpec> {
        self.rules.get(rule_id)
    }

    /// Iterates rules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.values()
    }

    /// Evaluates every applicable rule against a document.
    ///
    /// Rules whose applicability excludes `schema_ref` are skipped. Malformed
    /// values are reported once per path, regardless of how many rules read
    /// them.
    #[must_use]
    pub fn evaluate(
        &self,
        document: &Value,
        schema_ref: SchemaRef,
        reference_time: ReferenceTime,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut malformed: BTreeMap<FieldPath, MalformedEntry> = BTreeMap::new();
        for spec in self.rules.values().filter(|spec| spec.applies_to(schema_ref)) {
            match spec.evaluate(document, reference_time) {
                RuleOutcome::Holds | RuleOutcome::NotApplicable => {}
                RuleOutcome::Violated {
                    path,
                    message,
                    params,
                } => violations.push(Violation::new(
                    spec.rule_id.clone(),
                    spec.tier,
                    path.into_segments(),
                    message,
                    params,
                )),
                RuleOutcome::Malformed(fields) => {
                    for field in fields {
                        malformed
                            .entry(field.path)
                            .or_insert_with(|| MalformedEntry {
                                value: field.value,
                                reason: field.reason,
                                reported_by: BTreeSet::new(),
                            })
                            .reported_by
                            .insert(spec.rule_id.clone());
                    }
                }
            }
        }
        violations.extend(malformed.into_iter().map(|(path, entry)| malformed_violation(path, entry)));
        violations
    }
}

/// Builds the Tier 1 violation for an uninterpretable value.
fn malformed_violation(path: FieldPath, entry: MalformedEntry) -> Violation {
    let message = format!("{path} cannot be interpreted: {}", entry.reason);
    let reported_by: Vec<&str> = entry.reported_by.iter().map(RuleId::as_str).collect();
    let mut params = BTreeMap::new();
    params.insert("reason".to_string(), json!(entry.reason));
    params.insert("value".to_string(), entry.value);
    params.insert("reported_by".to_string(), json!(reported_by));
    Violation::new(
        RuleId::new(MALFORMED_VALUE_RULE_ID),
        Tier::Tier1Critical,
        path.into_segments(),
        message,
        params,
    )
}
