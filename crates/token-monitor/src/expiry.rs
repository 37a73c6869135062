//! Token expiry rules.
//!
//! FYERS access tokens die at 08:00 IST every trading day regardless of
//! when they were minted (the nominal 8-hour validity is marketing; the
//! boundary is what matters). Refresh tokens live a flat 10 days from
//! creation, in plain UTC arithmetic.
//!
//! Two deliberately different access-token views coexist:
//! [`is_access_token_expired`] keys off the token's own creation date,
//! while [`access_token_minutes_remaining`] reports time to the *next*
//! daily boundary only. They can disagree between midnight and 08:00 IST.
//! Both behaviors are load-bearing for the notification UI; do not unify
//! them without checking which one the bell dropdown actually wants.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;

/// Hour of day (IST) at which access tokens expire.
pub const DAILY_EXPIRY_HOUR: u32 = 8;

/// Refresh token validity window in days.
pub const REFRESH_TOKEN_VALIDITY_DAYS: i64 = 10;

/// The 08:00 IST boundary on a given IST calendar date.
fn daily_boundary(date: NaiveDate) -> DateTime<Tz> {
    let eight_am = NaiveTime::from_hms_opt(DAILY_EXPIRY_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    // IST has no DST; 08:00 always exists exactly once.
    Kolkata
        .from_local_datetime(&date.and_time(eight_am))
        .earliest()
        .unwrap_or_else(|| Kolkata.from_utc_datetime(&date.and_time(eight_am)))
}

/// Whether the access token minted at `created_at` (UTC) is past its
/// daily 08:00 IST boundary.
///
/// A token created today (IST) survives until tomorrow 08:00; one created
/// on any earlier date expired at today's 08:00. No stored creation
/// timestamp means no usable token, which reads as expired.
#[must_use]
pub fn is_access_token_expired(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(created_at) = created_at else {
        return true;
    };

    let now_ist = now.with_timezone(&Kolkata);
    let created_ist = created_at.with_timezone(&Kolkata);

    let boundary_date = if created_ist.date_naive() == now_ist.date_naive() {
        now_ist.date_naive() + Duration::days(1)
    } else {
        now_ist.date_naive()
    };

    now_ist > daily_boundary(boundary_date)
}

/// Whole minutes until the next daily 08:00 IST boundary, floored at zero.
///
/// Intentionally ignores when the current token was created: before 08:00
/// the boundary is today's, afterwards tomorrow's. This is the countdown
/// the notification bell shows, not the token's exact remaining life.
#[must_use]
pub fn access_token_minutes_remaining(now: DateTime<Utc>) -> i64 {
    let now_ist = now.with_timezone(&Kolkata);
    let boundary_date = if now_ist.hour() < DAILY_EXPIRY_HOUR {
        now_ist.date_naive()
    } else {
        now_ist.date_naive() + Duration::days(1)
    };

    (daily_boundary(boundary_date) - now_ist).num_minutes().max(0)
}

/// Whether the refresh token is missing or past its 10-day window.
#[must_use]
pub fn is_refresh_token_expired(
    refresh_token: Option<&str>,
    created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match (refresh_token, created_at) {
        (Some(token), Some(created_at)) if !token.is_empty() => {
            now >= created_at + Duration::days(REFRESH_TOKEN_VALIDITY_DAYS)
        }
        _ => true,
    }
}

/// Whole days of refresh-token life left, floored at zero.
#[must_use]
pub fn refresh_token_days_remaining(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    created_at.map_or(0, |created_at| {
        (created_at + Duration::days(REFRESH_TOKEN_VALIDITY_DAYS) - now)
            .num_days()
            .max(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an IST wall-clock instant as UTC.
    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Kolkata
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn missing_creation_timestamp_is_expired() {
        assert!(is_access_token_expired(None, utc("2025-07-01T06:00:00Z")));
    }

    #[test]
    fn token_created_this_morning_survives_until_tomorrow_boundary() {
        // Created 07:59 IST; still valid at 23:00 IST same day and at
        // 07:59 IST the next day, dead after 08:00 the next day.
        let created = ist(2025, 7, 1, 7, 59, 0);
        assert!(!is_access_token_expired(Some(created), ist(2025, 7, 1, 23, 0, 0)));
        assert!(!is_access_token_expired(Some(created), ist(2025, 7, 2, 7, 59, 0)));
        assert!(is_access_token_expired(Some(created), ist(2025, 7, 2, 8, 0, 1)));
    }

    #[test]
    fn token_created_after_boundary_also_gets_tomorrow() {
        let created = ist(2025, 7, 1, 8, 1, 0);
        assert!(!is_access_token_expired(Some(created), ist(2025, 7, 1, 20, 0, 0)));
        assert!(is_access_token_expired(Some(created), ist(2025, 7, 2, 8, 0, 1)));
    }

    #[test]
    fn yesterdays_token_dies_at_todays_boundary() {
        let created = ist(2025, 6, 30, 15, 0, 0);
        assert!(!is_access_token_expired(Some(created), ist(2025, 7, 1, 7, 59, 59)));
        assert!(is_access_token_expired(Some(created), ist(2025, 7, 1, 8, 0, 1)));
    }

    #[test]
    fn minutes_remaining_counts_to_todays_boundary_before_eight() {
        // 07:00 IST -> 60 minutes to today's 08:00.
        assert_eq!(access_token_minutes_remaining(ist(2025, 7, 1, 7, 0, 0)), 60);
    }

    #[test]
    fn minutes_remaining_counts_to_tomorrows_boundary_after_eight() {
        // 09:00 IST -> 23 hours to tomorrow's 08:00.
        assert_eq!(
            access_token_minutes_remaining(ist(2025, 7, 1, 9, 0, 0)),
            23 * 60
        );
    }

    #[test]
    fn minutes_remaining_at_eight_sharp_rolls_to_tomorrow() {
        assert_eq!(
            access_token_minutes_remaining(ist(2025, 7, 1, 8, 0, 0)),
            24 * 60
        );
    }

    #[test]
    fn refresh_token_expires_at_exactly_ten_days() {
        let created = utc("2025-06-21T10:00:00Z");
        assert!(is_refresh_token_expired(
            Some("rt"),
            Some(created),
            utc("2025-07-01T10:00:00Z")
        ));
        // 9 days 23:59:59 — still alive.
        assert!(!is_refresh_token_expired(
            Some("rt"),
            Some(created),
            utc("2025-07-01T09:59:59Z")
        ));
    }

    #[test]
    fn missing_refresh_token_or_timestamp_is_expired() {
        let now = utc("2025-07-01T10:00:00Z");
        assert!(is_refresh_token_expired(None, Some(now), now));
        assert!(is_refresh_token_expired(Some("rt"), None, now));
        assert!(is_refresh_token_expired(Some(""), Some(now), now));
    }

    #[test]
    fn refresh_days_remaining_floors_and_clamps() {
        let created = utc("2025-06-21T10:00:00Z");
        // 2.5 days left -> 2.
        assert_eq!(
            refresh_token_days_remaining(Some(created), utc("2025-06-28T22:00:00Z")),
            2
        );
        // Already past -> 0.
        assert_eq!(
            refresh_token_days_remaining(Some(created), utc("2025-07-05T00:00:00Z")),
            0
        );
        assert_eq!(refresh_token_days_remaining(None, created), 0);
    }
}
