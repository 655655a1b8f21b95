//! Password settings sources
//!
//! Two source kinds exist: a default-policy source producing at most one
//! [`PasswordSettings`] (the domain head entry, or a fixed fallback) and a
//! container source producing one settings object per PSO found under the
//! Password Settings Container.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::directory::{leaf_rdn, DirectoryClient, DirectoryEntry};
use crate::error::{AdPolicyError, Result};
use crate::policy::PasswordSettings;

/// Default Domain Policy attribute: maximum password age, AD interval
pub const AD_MAX_PWD_AGE: &str = "maxPwdAge";

/// Default Domain Policy attribute: minimum password age, AD interval
pub const AD_MIN_PWD_AGE: &str = "minPwdAge";

/// Default Domain Policy attribute: minimum password length
pub const AD_MIN_PWD_LENGTH: &str = "minPwdLength";

/// Default Domain Policy attribute: account lockout duration, AD interval
pub const AD_LOCKOUT_DURATION: &str = "lockoutDuration";

/// Default Domain Policy attribute: lockout observation window, AD interval
pub const AD_LOCKOUT_WINDOW: &str = "lockoutObservationWindow";

/// Default Domain Policy attribute: account lockout threshold
pub const AD_LOCKOUT_THRESHOLD: &str = "lockoutThreshold";

/// Default Domain Policy attribute: password history length
pub const AD_PWD_HISTORY_LENGTH: &str = "pwdHistoryLength";

/// Default Domain Policy attribute: bitmap of password properties
pub const AD_PWD_PROPERTIES: &str = "pwdProperties";

/// Windows password complexity flag inside `pwdProperties`
pub const DOMAIN_PASSWORD_COMPLEX: u32 = 1;

/// Attributes read from the Default Domain Policy head entry
pub const DEFAULT_DOMAIN_POLICY_ATTRS: [&str; 8] = [
    AD_MAX_PWD_AGE,
    AD_MIN_PWD_AGE,
    AD_MIN_PWD_LENGTH,
    AD_LOCKOUT_DURATION,
    AD_LOCKOUT_WINDOW,
    AD_LOCKOUT_THRESHOLD,
    AD_PWD_HISTORY_LENGTH,
    AD_PWD_PROPERTIES,
];

/// PSO attribute: maximum password age, AD interval
pub const AD_PSO_MAX_PWD_AGE: &str = "msDS-MaximumPasswordAge";

/// PSO attribute: minimum password age, AD interval
pub const AD_PSO_MIN_PWD_AGE: &str = "msDS-MinimumPasswordAge";

/// PSO attribute: minimum password length
pub const AD_PSO_MIN_PWD_LENGTH: &str = "msDS-MinimumPasswordLength";

/// PSO attribute: password history length
pub const AD_PSO_PWD_HISTORY_LENGTH: &str = "msDS-PasswordHistoryLength";

/// PSO attribute: password complexity enabled
pub const AD_PSO_COMPLEXITY: &str = "msDS-PasswordComplexityEnabled";

/// PSO attribute: reversible encryption enabled
pub const AD_PSO_REVERSIBLE_ENC: &str = "msDS-PasswordReversibleEncryptionEnabled";

/// PSO attribute: lockout observation window, AD interval
pub const AD_PSO_LOCKOUT_WINDOW: &str = "msDS-LockoutObservationWindow";

/// PSO attribute: account lockout duration, AD interval
pub const AD_PSO_LOCKOUT_DURATION: &str = "msDS-LockoutDuration";

/// PSO attribute: account lockout threshold
pub const AD_PSO_LOCKOUT_THRESHOLD: &str = "msDS-LockoutThreshold";

/// Attributes read from each Password Settings Object
pub const PSO_ATTRS: [&str; 9] = [
    AD_PSO_MAX_PWD_AGE,
    AD_PSO_MIN_PWD_AGE,
    AD_PSO_MIN_PWD_LENGTH,
    AD_PSO_PWD_HISTORY_LENGTH,
    AD_PSO_COMPLEXITY,
    AD_PSO_REVERSIBLE_ENC,
    AD_PSO_LOCKOUT_WINDOW,
    AD_PSO_LOCKOUT_DURATION,
    AD_PSO_LOCKOUT_THRESHOLD,
];

/// String representation of boolean true returned by AD
pub const LDAP_TRUE_VALUE: &str = "TRUE";

/// Object class filter matching PSOs inside the container
pub const PSO_FILTER: &str = "(objectClass=msDS-PasswordSettings)";

/// Usual RDN of the password settings container, relative to the domain DN
pub const DEFAULT_CONTAINER_RDN: &str = "CN=Password Settings Container,CN=System";

fn attr_interval(entry: &DirectoryEntry, attribute: &str) -> Result<i64> {
    match entry.attribute(attribute) {
        Some(value) => value
            .parse()
            .map_err(|_| AdPolicyError::MalformedAttribute {
                attribute: attribute.to_string(),
                value: value.to_string(),
            }),
        // AD omits attributes it considers unset
        None => Ok(0),
    }
}

fn attr_count(entry: &DirectoryEntry, attribute: &str) -> Result<u32> {
    match entry.attribute(attribute) {
        Some(value) => value
            .parse()
            .map_err(|_| AdPolicyError::MalformedAttribute {
                attribute: attribute.to_string(),
                value: value.to_string(),
            }),
        None => Ok(0),
    }
}

fn attr_bool(entry: &DirectoryEntry, attribute: &str) -> bool {
    matches!(entry.attribute(attribute), Some(value) if value.eq_ignore_ascii_case(LDAP_TRUE_VALUE))
}

/// Map a Default Domain Policy head entry to password settings.
///
/// Complexity comes from bit 0 of `pwdProperties`; the domain policy has no
/// reversible-encryption attribute in this attribute set.
pub fn map_domain_entry(entry: &DirectoryEntry) -> Result<PasswordSettings> {
    let pwd_properties = attr_count(entry, AD_PWD_PROPERTIES)?;
    Ok(PasswordSettings::new(
        false,
        attr_count(entry, AD_PWD_HISTORY_LENGTH)?,
        pwd_properties & DOMAIN_PASSWORD_COMPLEX != 0,
        attr_count(entry, AD_MIN_PWD_LENGTH)?,
        attr_interval(entry, AD_MIN_PWD_AGE)?,
        attr_interval(entry, AD_MAX_PWD_AGE)?,
        attr_count(entry, AD_LOCKOUT_THRESHOLD)?,
        attr_interval(entry, AD_LOCKOUT_DURATION)?,
        attr_interval(entry, AD_LOCKOUT_WINDOW)?,
    ))
}

/// Map one PSO entry to password settings. Booleans are the literal string
/// `TRUE`, compared case-insensitively; anything else reads as false.
pub fn map_pso_entry(entry: &DirectoryEntry) -> Result<PasswordSettings> {
    Ok(PasswordSettings::new(
        attr_bool(entry, AD_PSO_REVERSIBLE_ENC),
        attr_count(entry, AD_PSO_PWD_HISTORY_LENGTH)?,
        attr_bool(entry, AD_PSO_COMPLEXITY),
        attr_count(entry, AD_PSO_MIN_PWD_LENGTH)?,
        attr_interval(entry, AD_PSO_MIN_PWD_AGE)?,
        attr_interval(entry, AD_PSO_MAX_PWD_AGE)?,
        attr_count(entry, AD_PSO_LOCKOUT_THRESHOLD)?,
        attr_interval(entry, AD_PSO_LOCKOUT_DURATION)?,
        attr_interval(entry, AD_PSO_LOCKOUT_WINDOW)?,
    ))
}

/// A source that can produce the policy applying when no override matches.
pub trait DefaultPolicySource: Send + Sync {
    /// `Ok(None)` means the lookup legitimately found nothing usable; hard
    /// transport failures come back as `Err`.
    fn fetch(&self) -> Result<Option<PasswordSettings>>;
}

/// A source producing the full name → settings map of fine-grained policies.
pub trait ContainerPolicySource: Send + Sync {
    /// A member failing to map is skipped, its siblings still come back.
    fn fetch_all(&self) -> Result<HashMap<String, PasswordSettings>>;
}

/// Default Domain Policy read from the domain head entry.
pub struct DomainPolicySource {
    client: Arc<dyn DirectoryClient>,
    domain_dn: String,
}

impl DomainPolicySource {
    pub fn new(client: Arc<dyn DirectoryClient>, domain_dn: impl Into<String>) -> Self {
        Self {
            client,
            domain_dn: domain_dn.into(),
        }
    }
}

impl DefaultPolicySource for DomainPolicySource {
    fn fetch(&self) -> Result<Option<PasswordSettings>> {
        debug!(domain_dn = %self.domain_dn, "reading default domain password policy");
        let Some(entry) = self
            .client
            .lookup(&self.domain_dn, &DEFAULT_DOMAIN_POLICY_ATTRS)?
        else {
            return Ok(None);
        };
        match map_domain_entry(&entry) {
            Ok(settings) => Ok(Some(settings)),
            Err(err) => {
                warn!(%err, domain_dn = %self.domain_dn, "default domain policy entry is unusable");
                Ok(None)
            }
        }
    }
}

/// Fine-grained policies read from the Password Settings Container
/// (since AD2008), usual DN:
/// `CN=Password Settings Container,CN=System,DC=example,DC=com`.
pub struct PsoContainerSource {
    client: Arc<dyn DirectoryClient>,
    container_dn: String,
    filter: String,
}

impl PsoContainerSource {
    pub fn new(client: Arc<dyn DirectoryClient>, container_dn: impl Into<String>) -> Self {
        Self {
            client,
            container_dn: container_dn.into(),
            filter: PSO_FILTER.to_string(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

impl ContainerPolicySource for PsoContainerSource {
    fn fetch_all(&self) -> Result<HashMap<String, PasswordSettings>> {
        debug!(container_dn = %self.container_dn, filter = %self.filter, "searching password settings container");
        let entries = self
            .client
            .search(&self.container_dn, &self.filter, &PSO_ATTRS)?;

        let mut policies = HashMap::with_capacity(entries.len());
        for entry in entries {
            let Some(key) = leaf_rdn(&entry.name) else {
                warn!(name = %entry.name, "PSO entry without a usable RDN, skipping");
                continue;
            };
            match map_pso_entry(&entry) {
                Ok(settings) => {
                    policies.insert(key, settings);
                }
                Err(err) => warn!(%err, name = %entry.name, "skipping unparsable PSO entry"),
            }
        }
        Ok(policies)
    }
}

/// Manually fed default settings, for deployments without a readable domain
/// policy. Construction rejects settings that fail referential integrity.
pub struct FixedPolicySource {
    settings: PasswordSettings,
}

impl FixedPolicySource {
    pub fn new(settings: PasswordSettings) -> Result<Self> {
        if !settings.is_valid() {
            return Err(AdPolicyError::InvalidSettings);
        }
        Ok(Self { settings })
    }
}

impl DefaultPolicySource for FixedPolicySource {
    fn fetch(&self) -> Result<Option<PasswordSettings>> {
        Ok(Some(self.settings.clone()))
    }
}
