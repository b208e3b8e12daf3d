//! Derived medication state.
//!
//! All flags are computed from the stored record and an explicit instant;
//! nothing here is persisted. Callers capture `now` once per request so
//! every row in a response is classified against the same instant.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Stock at or below this value counts as low
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Days ahead within which a medication counts as near expiry
pub const NEAR_EXPIRY_HORIZON_DAYS: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until midnight of the expiry date, rounded up.
/// Zero or negative means the expiry date has been reached or passed.
pub fn days_until_expiry(expiry_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry_midnight = expiry_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let secs = (expiry_midnight - now).num_seconds();
    let extra = if secs.rem_euclid(SECONDS_PER_DAY) > 0 { 1 } else { 0 };
    secs.div_euclid(SECONDS_PER_DAY) + extra
}

/// Strictly before today; a medication expiring today is not yet expired
pub fn is_expired(expiry_date: NaiveDate, now: DateTime<Utc>) -> bool {
    expiry_date < now.date_naive()
}

/// Expiring within `horizon_days`, exclusive of today. Mutually exclusive
/// with [`is_expired`] for any given instant.
pub fn is_near_expiry(expiry_date: NaiveDate, now: DateTime<Utc>, horizon_days: i64) -> bool {
    let days = days_until_expiry(expiry_date, now);
    days > 0 && days <= horizon_days
}

pub fn is_low_stock(stock: i32, threshold: i32) -> bool {
    stock <= threshold
}

/// Date `days` ahead of `today`, clamped to the calendar bounds so a
/// caller-supplied horizon can never overflow the date arithmetic.
pub fn horizon_date(today: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("{date}T{time}Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn day(date: &str) -> NaiveDate {
        date.parse().unwrap()
    }

    #[test]
    fn test_expiring_today_is_not_expired() {
        let now = at("2025-06-15", "14:00:00");
        assert!(!is_expired(day("2025-06-15"), now));
        assert!(is_expired(day("2025-06-14"), now));
    }

    #[test]
    fn test_days_until_expiry_rounds_up() {
        // 2025-06-16 midnight is ten hours away: still one whole day out
        let now = at("2025-06-15", "14:00:00");
        assert_eq!(days_until_expiry(day("2025-06-16"), now), 1);
        assert_eq!(days_until_expiry(day("2025-06-15"), now), 0);
        assert_eq!(days_until_expiry(day("2025-06-14"), now), -1);
        assert_eq!(days_until_expiry(day("2025-07-15"), now), 30);
    }

    #[test]
    fn test_near_expiry_boundaries() {
        let now = at("2025-06-15", "09:30:00");
        // day 30 is in, day 31 is out, day 0 (today) is out
        assert!(is_near_expiry(day("2025-07-15"), now, 30));
        assert!(!is_near_expiry(day("2025-07-16"), now, 30));
        assert!(!is_near_expiry(day("2025-06-15"), now, 30));
        assert!(is_near_expiry(day("2025-06-16"), now, 30));
    }

    #[test]
    fn test_expired_and_near_expiry_are_exclusive() {
        let now = at("2025-06-15", "23:59:59");
        for offset in -40i64..=40 {
            let date = now.date_naive() + chrono::Duration::days(offset);
            let both = is_expired(date, now) && is_near_expiry(date, now, 30);
            assert!(!both, "offset {offset} classified as both");
        }
    }

    #[test]
    fn test_horizon_date_clamps_extreme_days() {
        let today = day("2025-06-15");
        assert_eq!(horizon_date(today, 30), day("2025-07-15"));
        assert_eq!(horizon_date(today, -7), day("2025-06-08"));
        assert_eq!(horizon_date(today, 1_000_000_000), NaiveDate::MAX);
        assert_eq!(horizon_date(today, i64::MAX), NaiveDate::MAX);
        assert_eq!(horizon_date(today, -1_000_000_000), NaiveDate::MIN);
        assert_eq!(horizon_date(today, i64::MIN), NaiveDate::MIN);
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        assert!(is_low_stock(10, LOW_STOCK_THRESHOLD));
        assert!(is_low_stock(0, LOW_STOCK_THRESHOLD));
        assert!(!is_low_stock(11, LOW_STOCK_THRESHOLD));
    }
}
