//! Password settings objects and per-password metadata
//!
//! A [`PasswordSettings`] models either the domain-wide default policy or one
//! fine-grained Password Settings Object (PSO, since AD2008), see
//! <http://technet.microsoft.com/en-us/library/cc770842%28v=ws.10%29>.

use serde::Serialize;

use crate::adtime;

/// Effective password-policy parameters for a set of accounts.
///
/// Duration fields use the AD interval format: negative 100ns tick counts,
/// with [`adtime::NEVER`] as the "password never expires" sentinel.
///
/// An instance that fails referential integrity is still constructible so a
/// caller can inspect why; consumers that need a usable policy must check
/// [`PasswordSettings::is_valid`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PasswordSettings {
    reversible_encryption: bool,
    history_length: u32,
    password_complexity: bool,
    minimum_password_length: u32,
    minimum_password_age: i64,
    maximum_password_age: i64,
    lockout_threshold: u32,
    lockout_duration: i64,
    lockout_observation_window: i64,
    valid: bool,
}

impl PasswordSettings {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reversible_encryption: bool,
        history_length: u32,
        password_complexity: bool,
        minimum_password_length: u32,
        minimum_password_age: i64,
        maximum_password_age: i64,
        lockout_threshold: u32,
        lockout_duration: i64,
        lockout_observation_window: i64,
    ) -> Self {
        let mut settings = Self {
            reversible_encryption,
            history_length,
            password_complexity,
            minimum_password_length,
            minimum_password_age,
            maximum_password_age,
            lockout_threshold,
            lockout_duration,
            lockout_observation_window,
            valid: false,
        };
        settings.validate();
        settings
    }

    /// Referential integrity check, see
    /// <http://technet.microsoft.com/en-us/library/cc753858%28v=ws.10%29.aspx>.
    ///
    /// Beware: durations are negative AD intervals, so "minimum age not longer
    /// than maximum age" reads as `minimum_password_age >= maximum_password_age`.
    fn validate(&mut self) {
        self.valid = self.maximum_password_age != 0
            && self.minimum_password_age >= self.maximum_password_age
            && self.lockout_duration <= self.lockout_observation_window;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn reversible_encryption(&self) -> bool {
        self.reversible_encryption
    }

    pub fn set_reversible_encryption(&mut self, reversible_encryption: bool) {
        self.reversible_encryption = reversible_encryption;
    }

    pub fn history_length(&self) -> u32 {
        self.history_length
    }

    pub fn set_history_length(&mut self, history_length: u32) {
        self.history_length = history_length;
    }

    pub fn password_complexity(&self) -> bool {
        self.password_complexity
    }

    pub fn set_password_complexity(&mut self, password_complexity: bool) {
        self.password_complexity = password_complexity;
    }

    pub fn minimum_password_length(&self) -> u32 {
        self.minimum_password_length
    }

    pub fn set_minimum_password_length(&mut self, minimum_password_length: u32) {
        self.minimum_password_length = minimum_password_length;
    }

    pub fn minimum_password_age(&self) -> i64 {
        self.minimum_password_age
    }

    pub fn set_minimum_password_age(&mut self, minimum_password_age: i64) {
        self.minimum_password_age = minimum_password_age;
        self.validate();
    }

    pub fn maximum_password_age(&self) -> i64 {
        self.maximum_password_age
    }

    pub fn set_maximum_password_age(&mut self, maximum_password_age: i64) {
        self.maximum_password_age = maximum_password_age;
        self.validate();
    }

    pub fn lockout_threshold(&self) -> u32 {
        self.lockout_threshold
    }

    pub fn set_lockout_threshold(&mut self, lockout_threshold: u32) {
        self.lockout_threshold = lockout_threshold;
    }

    pub fn lockout_duration(&self) -> i64 {
        self.lockout_duration
    }

    pub fn set_lockout_duration(&mut self, lockout_duration: i64) {
        self.lockout_duration = lockout_duration;
        self.validate();
    }

    pub fn lockout_observation_window(&self) -> i64 {
        self.lockout_observation_window
    }

    pub fn set_lockout_observation_window(&mut self, lockout_observation_window: i64) {
        self.lockout_observation_window = lockout_observation_window;
        self.validate();
    }
}

/// Metadata attached to one password instance.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PasswordMetaData {
    /// Password last set, in AD format (100ns ticks since 1601-01-01)
    last_set: i64,
}

impl PasswordMetaData {
    pub fn new(last_set: i64) -> Self {
        Self { last_set }
    }

    pub fn last_set(&self) -> i64 {
        self.last_set
    }

    /// Password last set time, in milliseconds since the Unix epoch.
    pub fn last_set_epoch_millis(&self) -> i64 {
        adtime::to_epoch_millis(self.last_set)
    }

    /// Password expiration time under `settings`, in milliseconds since the
    /// Unix epoch.
    ///
    /// When `settings.maximum_password_age()` is the [`adtime::NEVER`]
    /// sentinel the subtraction wraps and the result lands in the far past;
    /// callers must test for the sentinel before treating the result as a
    /// deadline.
    pub fn expiration_epoch_millis(&self, settings: &PasswordSettings) -> i64 {
        adtime::to_epoch_millis(self.last_set.wrapping_sub(settings.maximum_password_age()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Utc};

    // Constant taken from AD: 2012-08-08
    const REF_LAST_SET: i64 = 129_888_871_432_515_000;

    // 2012-08-08 13:41 CET
    const REF_LAST_SET2: i64 = 129_888_996_667_358_750;

    fn ninety_day_settings() -> PasswordSettings {
        PasswordSettings::new(
            false,
            0,
            false,
            8,
            0,
            90 * adtime::DAY,
            5,
            5 * adtime::MINUTE,
            2 * adtime::MINUTE,
        )
    }

    #[test]
    fn test_zero_maximum_age_is_invalid() {
        let settings = PasswordSettings::new(false, 0, false, 0, 0, 0, 0, 0, 0);
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_lockout_window_longer_than_duration_is_invalid() {
        // 5 minute lockout with a 2 minute observation window is consistent
        assert!(ninety_day_settings().is_valid());

        // A 2 minute lockout cannot be observed over a 5 minute window;
        // numerically the negative duration exceeds the negative window
        let settings = PasswordSettings::new(
            false,
            10,
            true,
            8,
            adtime::DAY,
            90 * adtime::DAY,
            5,
            2 * adtime::MINUTE,
            5 * adtime::MINUTE,
        );
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_minimum_age_longer_than_maximum_is_invalid() {
        let settings = PasswordSettings::new(
            false,
            10,
            true,
            8,
            91 * adtime::DAY,
            90 * adtime::DAY,
            0,
            0,
            0,
        );
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_guarded_setters_revalidate() {
        let mut settings = PasswordSettings::new(
            false,
            10,
            true,
            8,
            adtime::DAY,
            90 * adtime::DAY,
            5,
            5 * adtime::MINUTE,
            2 * adtime::MINUTE,
        );
        assert!(settings.is_valid());

        settings.set_maximum_password_age(0);
        assert!(!settings.is_valid());
        settings.set_maximum_password_age(90 * adtime::DAY);
        assert!(settings.is_valid());

        settings.set_lockout_duration(adtime::MINUTE);
        assert!(!settings.is_valid());
        settings.set_lockout_observation_window(adtime::MINUTE);
        assert!(settings.is_valid());

        settings.set_minimum_password_age(120 * adtime::DAY);
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_last_set_epoch_millis() {
        let meta = PasswordMetaData::new(REF_LAST_SET);
        let date = Utc.timestamp_millis_opt(meta.last_set_epoch_millis()).unwrap();
        assert_eq!((2012, 8, 8), (date.year(), date.month(), date.day()));

        let meta = PasswordMetaData::new(REF_LAST_SET2);
        let date = Utc.timestamp_millis_opt(meta.last_set_epoch_millis()).unwrap();
        assert_eq!((2012, 8, 8), (date.year(), date.month(), date.day()));
        // 13:41 CET is 11:41 UTC
        assert_eq!((11, 41, 6), (date.hour(), date.minute(), date.second()));
        assert_eq!(735_000_000, date.nanosecond());
    }

    #[test]
    fn test_expiration_time() {
        let now = Utc::now().timestamp_millis();
        let settings = ninety_day_settings();

        // Password set exactly 90 days ago expires right now
        let mut last_set = adtime::to_ad_value(now) + 90 * adtime::DAY;
        let meta = PasswordMetaData::new(last_set);
        assert_eq!(now, meta.expiration_epoch_millis(&settings));

        // One hour older: expired one hour ago
        last_set += adtime::HOUR;
        let meta = PasswordMetaData::new(last_set);
        assert_eq!(3_600_000, now - meta.expiration_epoch_millis(&settings));

        // Two hours newer: expires in one hour
        last_set -= 2 * adtime::HOUR;
        let meta = PasswordMetaData::new(last_set);
        assert_eq!(3_600_000, meta.expiration_epoch_millis(&settings) - now);
    }

    #[test]
    fn test_expiration_with_never_sentinel_is_far_past() {
        let mut settings = ninety_day_settings();
        settings.set_maximum_password_age(adtime::NEVER);

        let meta = PasswordMetaData::new(REF_LAST_SET);
        let expiration = meta.expiration_epoch_millis(&settings);
        assert!(expiration < meta.last_set_epoch_millis());
        assert!(expiration < 0);
    }
}
