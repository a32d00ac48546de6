// crates/credential-gate-core/src/core/time.rs
// ============================================================================
// Module: Credential Gate Time Model
// Description: Explicit reference instants and credential date parsing.
// Purpose: Keep temporal rules deterministic and replayable.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Temporal rules never read wall-clock time. Every validation call receives a
//! [`ReferenceTime`] from its caller; production hosts pass the current instant
//! and tests pin fixed instants.
//!
//! Credential dates are RFC 3339 date-times or full dates (`YYYY-MM-DD`). A
//! full date is interpreted as midnight UTC so both forms share one ordering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use time::Date;
use time::Month;
use time::OffsetDateTime;
use time::Time;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Reference Time
// ============================================================================

/// The "current instant" a validation call is evaluated against.
///
/// # Invariants
/// - Values are explicitly provided by callers; rules never read a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceTime(OffsetDateTime);

impl ReferenceTime {
    /// Wraps an explicit instant.
    #[must_use]
    pub const fn new(instant: OffsetDateTime) -> Self {
        Self(instant)
    }

    /// Returns the current UTC instant. Intended for production callers only.
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parses an RFC 3339 date-time or full date into a reference time.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic string when the value is not a supported date.
    pub fn parse(value: &str) -> Result<Self, String> {
        parse_instant(value).map(Self)
    }

    /// Returns the wrapped instant.
    #[must_use]
    pub const fn instant(self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for ReferenceTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for ReferenceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(rendered) => f.write_str(&rendered),
            Err(_) => write!(f, "{}", self.0.unix_timestamp()),
        }
    }
}

impl Serialize for ReferenceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// SECTION: Date Parsing
// ============================================================================

/// Parses a credential date value.
///
/// Accepts RFC 3339 date-times and full dates; a full date resolves to
/// midnight UTC.
///
/// # Errors
///
/// Returns a diagnostic string when the value matches neither form.
pub fn parse_instant(value: &str) -> Result<OffsetDateTime, String> {
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(instant);
    }
    parse_full_date(value)
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
        .ok_or_else(|| format!("`{value}` is not an RFC 3339 date-time or YYYY-MM-DD date"))
}

/// Parses an RFC 3339 full-date value (YYYY-MM-DD).
fn parse_full_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if ![year, month, day].iter().all(|part| part.bytes().all(|byte| byte.is_ascii_digit())) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
