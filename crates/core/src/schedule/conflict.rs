//! Conflict checking against existing bookings

use super::interval::Interval;

/// True iff any existing interval strictly overlaps the candidate.
///
/// Linear scan; per-room booking volumes are small enough that no
/// indexing structure is warranted. Makes no ordering assumption on
/// `existing` and has no side effects.
pub fn has_conflict<'a, I>(candidate: &Interval, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Interval>,
{
    existing.into_iter().any(|i| i.overlaps(candidate))
}

/// The first existing interval that overlaps the candidate, for error
/// reporting
pub fn first_conflict<'a, I>(candidate: &Interval, existing: I) -> Option<&'a Interval>
where
    I: IntoIterator<Item = &'a Interval>,
{
    existing.into_iter().find(|i| i.overlaps(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

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
    fn test_no_existing_bookings() {
        assert!(!has_conflict(&iv(9, 10), &[]));
    }

    #[test]
    fn test_detects_any_overlap_regardless_of_order() {
        let existing = [iv(14, 15), iv(8, 9), iv(11, 13)];
        assert!(has_conflict(&iv(12, 14), &existing));
        assert!(!has_conflict(&iv(9, 11), &existing));
    }

    #[test]
    fn test_adjacent_bookings_are_allowed() {
        let existing = [iv(9, 10), iv(11, 12)];
        assert!(!has_conflict(&iv(10, 11), &existing));
    }

    #[test]
    fn test_first_conflict_reports_offender() {
        let existing = [iv(8, 9), iv(11, 13)];
        assert_eq!(first_conflict(&iv(12, 14), &existing), Some(&existing[1]));
        assert_eq!(first_conflict(&iv(9, 11), &existing), None);
    }
}
