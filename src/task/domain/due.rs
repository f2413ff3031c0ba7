//! Due-date parsing and the invalid-input sentinel.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Due date derived from raw caller input.
///
/// Unparseable input is preserved as an explicit [`DueDate::Invalid`]
/// sentinel rather than silently becoming "now" or failing the admission.
/// Overdue comparisons are only ever made against [`DueDate::At`]; the other
/// variants are never compared and never overdue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DueDate {
    /// The caller supplied no due date.
    Unset,
    /// The caller's input could not be parsed; the raw input is retained.
    Invalid(String),
    /// A concrete point in time.
    At(DateTime<Utc>),
}

impl DueDate {
    /// Parses raw caller input into a due date.
    ///
    /// Accepts RFC 3339 timestamps and `YYYY-MM-DD` dates (interpreted as
    /// midnight UTC). Missing or blank input yields [`DueDate::Unset`];
    /// anything else unparseable yields [`DueDate::Invalid`].
    #[must_use]
    pub fn parse(input: Option<&str>) -> Self {
        let Some(raw) = input else {
            return Self::Unset;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Unset;
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::At(instant.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Self::At(midnight.and_utc());
            }
        }
        Self::Invalid(raw.to_owned())
    }

    /// Returns the concrete due instant, if one was parsed.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(at) => Some(*at),
            Self::Unset | Self::Invalid(_) => None,
        }
    }

    /// Returns `true` when the due date is a concrete instant strictly
    /// before `now`. Unset and invalid due dates are never overdue.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::At(at) => *at < now,
            Self::Unset | Self::Invalid(_) => false,
        }
    }
}
