//! Conversions between AD interval time (I8 syntax) and Unix epoch milliseconds
//!
//! AD stores timestamps and durations as a signed 64-bit count of 100-nanosecond
//! intervals since 1601-01-01T00:00:00Z. Durations are stored negated.

/// AD value for "never" (usable as a `maximum_password_age` sentinel)
pub const NEVER: i64 = i64::MIN;

/// One second as an AD duration
pub const SECOND: i64 = -10_000_000;

/// One minute as an AD duration
pub const MINUTE: i64 = 60 * SECOND;

/// One hour as an AD duration
pub const HOUR: i64 = 60 * MINUTE;

/// One day as an AD duration
pub const DAY: i64 = 24 * HOUR;

/// Days between 1601 (base of AD dates) and the Unix epoch:
/// 369 years * 365 days + 92 leap years - 3 non-leap centuries
pub const DAYS_1601_TO_1970: i64 = 134_774;

/// Positive delta between the Unix epoch and the AD base, in 100ns ticks
pub const AD_TO_EPOCH: i64 = -(DAYS_1601_TO_1970 * DAY);

/// Scale factor between AD ticks (100ns) and milliseconds
pub const AD_TO_EPOCH_SCALE: i64 = 10_000;

/// Convert an AD timestamp to milliseconds since the Unix epoch.
///
/// Sub-millisecond ticks are truncated; see [`to_ad_value`].
pub const fn to_epoch_millis(ad_value: i64) -> i64 {
    (ad_value - AD_TO_EPOCH) / AD_TO_EPOCH_SCALE
}

/// Convert milliseconds since the Unix epoch to an AD timestamp.
///
/// `to_epoch_millis(to_ad_value(t)) == t` for every representable `t`; the
/// reverse trip loses the sub-10_000-tick remainder.
pub const fn to_ad_value(epoch_millis: i64) -> i64 {
    epoch_millis * AD_TO_EPOCH_SCALE + AD_TO_EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 2012-08-08 13:41 CET, four trailing zeroes so the reverse trip is exact
    const REF_AD_VALUE: i64 = 129_888_996_667_350_000;

    #[test]
    fn test_epoch_of_ad_base_delta() {
        assert_eq!(AD_TO_EPOCH, 116_444_736_000_000_000);
        assert_eq!(to_epoch_millis(AD_TO_EPOCH), 0);
        assert_eq!(to_ad_value(0), AD_TO_EPOCH);
    }

    #[test]
    fn test_reference_value_round_trip() {
        assert_eq!(REF_AD_VALUE, to_ad_value(to_epoch_millis(REF_AD_VALUE)));
    }

    proptest! {
        #[test]
        fn round_trip_from_millis(t in -800_000_000_000_000i64..800_000_000_000_000) {
            prop_assert_eq!(to_epoch_millis(to_ad_value(t)), t);
        }

        #[test]
        fn lossy_round_trip_from_ad(v in -8_000_000_000_000_000_000i64..8_000_000_000_000_000_000) {
            let back = to_ad_value(to_epoch_millis(v));
            prop_assert!((v - back).abs() <= AD_TO_EPOCH_SCALE - 1);
            if (v - AD_TO_EPOCH) % AD_TO_EPOCH_SCALE == 0 {
                prop_assert_eq!(back, v);
            }
        }
    }
}
