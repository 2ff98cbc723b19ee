//! Leap second bookkeeping.
//!
//! Leap seconds are injected as an explicit table rather than a hardcoded
//! global constant, so callers can supply a current IERS Bulletin C count
//! (or a historical one, for reprocessing old data) without recompiling.

use chrono::{DateTime, Utc};

/// A single leap second insertion: TAI-UTC became `tai_minus_utc` seconds
/// for all epochs on or after `effective`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeapSecondEntry {
    /// The UTC instant at which this TAI-UTC offset takes effect.
    pub effective: DateTime<Utc>,
    /// TAI minus UTC, in seconds, from `effective` onward.
    pub tai_minus_utc: f64,
}

/// A table of leap second insertions, looked up by epoch.
///
/// `LeapSecondTable::current_estimate()` provides a reasonable built-in
/// default (37 s, valid since 2017-01-01) for callers who don't need to
/// track historical leap seconds precisely; production users should build
/// a table from IERS Bulletin C and pass it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct LeapSecondTable {
    entries: Vec<LeapSecondEntry>,
}

impl LeapSecondTable {
    /// Build a table from an explicit, time-ordered list of entries.
    ///
    /// Entries do not need to be pre-sorted; this constructor sorts them by
    /// `effective` ascending.
    #[must_use]
    pub fn new(mut entries: Vec<LeapSecondEntry>) -> Self {
        entries.sort_by_key(|e| e.effective);
        Self { entries }
    }

    /// A single-entry table holding the 37 s offset that has been in effect
    /// since 2017-01-01, the most recent leap second insertion as of this
    /// writing.
    #[must_use]
    pub fn current_estimate() -> Self {
        use chrono::TimeZone;
        Self::new(vec![LeapSecondEntry {
            effective: Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap(),
            tai_minus_utc: 37.0,
        }])
    }

    /// TAI minus UTC, in seconds, applicable at `epoch`.
    ///
    /// Returns 10.0 (the original 1972 offset) if `epoch` predates every
    /// entry in the table.
    #[must_use]
    pub fn tai_minus_utc(&self, epoch: DateTime<Utc>) -> f64 {
        self.entries
            .iter()
            .rev()
            .find(|e| e.effective <= epoch)
            .map_or(10.0, |e| e.tai_minus_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_estimate_is_37_seconds() {
        let table = LeapSecondTable::current_estimate();
        assert_eq!(table.tai_minus_utc(Utc::now()), 37.0);
    }

    #[test]
    fn lookup_before_first_entry_uses_1972_offset() {
        use chrono::TimeZone;
        let table = LeapSecondTable::current_estimate();
        let early = Utc.with_ymd_and_hms(1975, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(table.tai_minus_utc(early), 10.0);
    }
}
