//! Time interval value type and overlap predicate

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A time range with `end` strictly after `start`.
///
/// Two intervals conflict iff they strictly overlap: an interval ending
/// exactly when another begins does NOT conflict. Back-to-back bookings
/// are a supported pattern and that boundary must hold exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting empty or inverted ranges
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(Error::Validation(format!(
                "interval end ({end}) must be after start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from values already known to satisfy `end > start`,
    /// e.g. fields loaded from the database
    pub(crate) fn new_unchecked(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(end > start, "interval end {end} not after start {start}");
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Strict overlap: `a.start < b.end && b.start < a.end`.
    /// Symmetric; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn iv(start_hour: u32, end_hour: u32) -> Interval {
        Interval::new(at(start_hour), at(end_hour)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_and_empty() {
        assert!(Interval::new(at(10), at(9)).is_err());
        assert!(Interval::new(at(10), at(10)).is_err());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (iv(9, 11), iv(10, 12)),
            (iv(9, 12), iv(10, 11)),
            (iv(9, 10), iv(10, 11)),
            (iv(8, 9), iv(15, 16)),
        ];
        for (a, b) in cases {
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        // One booking ending exactly when another begins is allowed
        assert!(!iv(9, 10).overlaps(&iv(10, 11)));
        assert!(!iv(10, 11).overlaps(&iv(9, 10)));
    }

    #[test]
    fn test_partial_and_full_overlap() {
        assert!(iv(9, 11).overlaps(&iv(10, 12)));
        assert!(iv(9, 12).overlaps(&iv(10, 11)));
        assert!(iv(10, 11).overlaps(&iv(9, 12)));
        assert!(iv(9, 10).overlaps(&iv(9, 10)));
    }

    #[test]
    fn test_disjoint_does_not_overlap() {
        assert!(!iv(8, 9).overlaps(&iv(11, 12)));
    }

    #[test]
    fn test_duration() {
        assert_eq!(iv(9, 11).duration(), Duration::hours(2));
    }
}
