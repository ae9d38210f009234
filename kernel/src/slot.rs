//! Bookable-time rules: fixed business hours, fixed 30-minute granularity.
//!
//! Everything here is a pure function of the time values; persistence and
//! conflict scanning live in the adapter.

use chrono::{NaiveTime, Timelike};
use shared::error::{AppError, AppResult};

/// Opening boundary, minutes from midnight (09:00).
pub const OPENING_MINUTE: u32 = 9 * 60;
/// Closing boundary, minutes from midnight (18:00). Valid only as an end time.
pub const CLOSING_MINUTE: u32 = 18 * 60;
/// Booking granularity.
pub const SLOT_MINUTES: u32 = 30;
/// Number of bookable slots in one day (18 for 09:00-18:00).
pub const SLOTS_PER_DAY: i64 = ((CLOSING_MINUTE - OPENING_MINUTE) / SLOT_MINUTES) as i64;

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Checks the shape of a proposed interval. The order error takes precedence,
/// so an interval like (18:00, 18:00) is reported as mis-ordered rather than
/// out of hours.
pub fn validate_interval(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::SlotOrder);
    }
    for t in [start, end] {
        let m = minute_of_day(t);
        if m < OPENING_MINUTE || m > CLOSING_MINUTE {
            return Err(AppError::SlotOutOfHours);
        }
        if t.minute() % SLOT_MINUTES != 0 {
            return Err(AppError::SlotAlignment);
        }
    }
    Ok(())
}

/// Half-open interval overlap: touching endpoints do not conflict.
pub fn overlaps(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn accepts_every_aligned_in_hours_interval() {
        // All 30-minute-aligned pairs within business hours.
        let boundaries: Vec<NaiveTime> = (OPENING_MINUTE..=CLOSING_MINUTE)
            .step_by(SLOT_MINUTES as usize)
            .map(|m| t(m / 60, m % 60))
            .collect();
        for (i, &start) in boundaries.iter().enumerate() {
            for &end in &boundaries[i + 1..] {
                assert!(validate_interval(start, end).is_ok(), "{start}..{end}");
            }
        }
    }

    #[test]
    fn rejects_reversed_or_empty_interval_first() {
        assert!(matches!(
            validate_interval(t(10, 0), t(10, 0)),
            Err(AppError::SlotOrder)
        ));
        assert!(matches!(
            validate_interval(t(11, 0), t(10, 30)),
            Err(AppError::SlotOrder)
        ));
        // Order wins even when the times are also unaligned and out of hours.
        assert!(matches!(
            validate_interval(t(20, 15), t(8, 45)),
            Err(AppError::SlotOrder)
        ));
    }

    #[test]
    fn rejects_times_outside_business_hours() {
        assert!(matches!(
            validate_interval(t(8, 30), t(9, 30)),
            Err(AppError::SlotOutOfHours)
        ));
        assert!(matches!(
            validate_interval(t(17, 30), t(18, 30)),
            Err(AppError::SlotOutOfHours)
        ));
    }

    #[test]
    fn closing_time_is_a_valid_end_boundary_only() {
        assert!(validate_interval(t(17, 30), t(18, 0)).is_ok());
        assert!(matches!(
            validate_interval(t(18, 0), t(18, 30)),
            Err(AppError::SlotOutOfHours)
        ));
    }

    #[test]
    fn rejects_unaligned_minutes() {
        assert!(matches!(
            validate_interval(t(9, 15), t(10, 0)),
            Err(AppError::SlotAlignment)
        ));
        assert!(matches!(
            validate_interval(t(9, 0), t(10, 45)),
            Err(AppError::SlotAlignment)
        ));
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 30), t(10, 30)));
        assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
        // Containment and identity.
        assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(10, 30)));
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
        // Touching endpoints are free.
        assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn a_full_day_is_eighteen_slots() {
        assert_eq!(SLOTS_PER_DAY, 18);
    }
}
