//! Expiry check for stored cookie `expires` strings.
//!
//! Independent of the network validator; callers may use it as a cheap
//! pre-filter before replaying cookies.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Recognized formats, tried in order: (pattern, carries a trailing zone name).
const EXPIRY_FORMATS: &[(&str, bool)] = &[
    ("%a, %d %b %Y %H:%M:%S", true),
    ("%a, %d-%b-%Y %H:%M:%S", true),
    ("%Y-%m-%d %H:%M:%S", false),
    ("%Y-%m-%dT%H:%M:%S", false),
];

/// Zone names accepted after RFC-1123 and RFC-850 style dates. Both mean UTC.
const UTC_ZONES: &[&str] = &["GMT", "UTC"];

/// Parse an `expires` string with the first matching format.
///
/// Zone-less ISO forms are read as UTC.
pub fn parse_expiry(expires: &str) -> Option<DateTime<Utc>> {
    let expires = expires.trim();
    if expires.is_empty() {
        return None;
    }

    for (pattern, zoned) in EXPIRY_FORMATS {
        let candidate = if *zoned {
            match expires.rsplit_once(' ') {
                Some((rest, zone)) if UTC_ZONES.contains(&zone) => rest,
                _ => continue,
            }
        } else {
            expires
        };

        if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, pattern) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Whether `expires` lies strictly before `now`.
///
/// Empty or unrecognized strings are treated as non-expiring.
pub fn is_expired_at(expires: &str, now: DateTime<Utc>) -> bool {
    parse_expiry(expires).is_some_and(|at| at < now)
}

/// Whether `expires` lies strictly before the current time.
pub fn is_expired(expires: &str) -> bool {
    is_expired_at(expires, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_space_in_past() {
        assert!(is_expired("2020-01-01 00:00:00"));
    }

    #[test]
    fn test_iso_t_separator() {
        assert!(is_expired("2020-01-01T00:00:00"));
        assert!(!is_expired("2999-01-01T00:00:00"));
    }

    #[test]
    fn test_empty_is_not_expired() {
        assert!(!is_expired(""));
        assert!(!is_expired("   "));
    }

    #[test]
    fn test_unparseable_is_not_expired() {
        assert!(!is_expired("next tuesday"));
        assert!(!is_expired("2020/01/01"));
    }

    #[test]
    fn test_rfc1123() {
        let parsed = parse_expiry("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap());
        assert!(is_expired("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert!(!is_expired("Fri, 01 Jan 2100 00:00:00 GMT"));
    }

    #[test]
    fn test_rfc850_style() {
        let parsed = parse_expiry("Wed, 21-Oct-2015 07:28:00 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap());
    }

    #[test]
    fn test_rfc1123_requires_zone() {
        assert!(parse_expiry("Wed, 21 Oct 2015 07:28:00").is_none());
        assert!(parse_expiry("Wed, 21 Oct 2015 07:28:00 PST").is_none());
    }

    #[test]
    fn test_strictly_before_now() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_expired_at("2020-01-01 00:00:00", at));
        assert!(is_expired_at("2020-01-01 00:00:00", at + chrono::Duration::seconds(1)));
    }
}
