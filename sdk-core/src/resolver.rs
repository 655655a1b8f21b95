//! TTL-cached policy resolution
//!
//! [`CachingResolver`] wraps a default-policy source and, optionally, a PSO
//! container source. Each wrapped source gets its own cache cell; a cell is
//! refreshed lazily when a read finds it stale. The cell mutex covers the
//! whole check / fetch / publish sequence, so at most one directory round
//! trip is in flight per source however many callers race the TTL expiry.
//! Published values are shared as `Arc` and replaced wholesale, never
//! mutated, so once a policy has been fetched successfully the resolver
//! keeps serving it through any later source outage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::directory::leaf_rdn;
use crate::policy::PasswordSettings;
use crate::source::{ContainerPolicySource, DefaultPolicySource};

/// Key of the domain default policy in the merged [`CachingResolver::all_policies`]
/// view. PSO keys are `attr=value` RDNs and always contain `=`, so the two
/// namespaces cannot collide.
pub const DEFAULT_POLICY_KEY: &str = "default";

/// Default time between two reloads of a source: one day.
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 86_400_000;

struct CacheCell<T> {
    value: Option<Arc<T>>,
    last_fetched_ms: i64,
}

impl<T> CacheCell<T> {
    const fn empty() -> Self {
        Self {
            value: None,
            last_fetched_ms: 0,
        }
    }

    fn fresh(&self, now: i64, refresh_interval_ms: i64) -> bool {
        self.value.is_some() && now <= self.last_fetched_ms + refresh_interval_ms
    }
}

type PsoMap = HashMap<String, Arc<PasswordSettings>>;

pub struct CachingResolver {
    default_source: Box<dyn DefaultPolicySource>,
    container_source: Option<Box<dyn ContainerPolicySource>>,
    refresh_interval_ms: i64,
    default_cache: Mutex<CacheCell<PasswordSettings>>,
    container_cache: Mutex<CacheCell<PsoMap>>,
}

impl CachingResolver {
    pub fn new(default_source: Box<dyn DefaultPolicySource>) -> Self {
        Self {
            default_source,
            container_source: None,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            default_cache: Mutex::new(CacheCell::empty()),
            container_cache: Mutex::new(CacheCell::empty()),
        }
    }

    /// Add a PSO container source; without one every lookup resolves to the
    /// default policy (the pre-AD2008 behavior).
    pub fn with_container_source(mut self, source: Box<dyn ContainerPolicySource>) -> Self {
        self.container_source = Some(source);
        self
    }

    pub fn with_refresh_interval_ms(mut self, refresh_interval_ms: i64) -> Self {
        self.refresh_interval_ms = refresh_interval_ms;
        self
    }

    pub fn refresh_interval_ms(&self) -> i64 {
        self.refresh_interval_ms
    }

    /// Eager warm-up: force a fetch of every configured source once. A
    /// failure leaves the resolver usable; the next read retries.
    pub fn warm_up(&self) {
        if self.refresh_default(true).is_none() {
            info!("default policy not fetched by warm-up, will retry at first query");
        }
        if self.container_source.is_some() && self.refresh_container(true).is_none() {
            info!("password settings container not fetched by warm-up, will retry at first query");
        }
    }

    /// Current default domain policy, refreshing it first when stale.
    pub fn default_policy(&self) -> Option<Arc<PasswordSettings>> {
        self.refresh_default(false)
    }

    /// Policy applying to the object named by `dn`: the PSO whose key equals
    /// the lower-cased leftmost RDN when one exists, the default policy
    /// otherwise.
    pub fn policy_for_dn(&self, dn: &str) -> Option<Arc<PasswordSettings>> {
        if let Some(key) = leaf_rdn(dn) {
            if let Some(policies) = self.refresh_container(false) {
                if let Some(settings) = policies.get(&key) {
                    return Some(Arc::clone(settings));
                }
            }
        }
        self.default_policy()
    }

    /// Every known policy: the PSO map plus the default policy under
    /// [`DEFAULT_POLICY_KEY`].
    pub fn all_policies(&self) -> PsoMap {
        let mut all = match self.refresh_container(false) {
            Some(policies) => (*policies).clone(),
            None => HashMap::new(),
        };
        if let Some(default) = self.default_policy() {
            all.insert(DEFAULT_POLICY_KEY.to_string(), default);
        }
        all
    }

    /// Epoch millis of the last successful default-policy fetch, 0 if none.
    pub fn last_fetched_default_ms(&self) -> i64 {
        lock_cell(&self.default_cache).last_fetched_ms
    }

    /// Epoch millis of the last successful container fetch, 0 if none.
    pub fn last_fetched_container_ms(&self) -> i64 {
        lock_cell(&self.container_cache).last_fetched_ms
    }

    fn refresh_default(&self, force: bool) -> Option<Arc<PasswordSettings>> {
        let mut cell = lock_cell(&self.default_cache);
        let now = Utc::now().timestamp_millis();
        if !force && cell.fresh(now, self.refresh_interval_ms) {
            return cell.value.clone();
        }

        debug!(
            force,
            never_fetched = cell.value.is_none(),
            "default password policy will be read"
        );
        match self.default_source.fetch() {
            Ok(Some(settings)) => {
                cell.value = Some(Arc::new(settings));
                cell.last_fetched_ms = now;
            }
            Ok(None) => {
                warn!("no default password policy readable, keeping cached value if any");
            }
            Err(err) => {
                warn!(%err, "default password policy refresh failed, keeping cached value if any");
            }
        }
        cell.value.clone()
    }

    fn refresh_container(&self, force: bool) -> Option<Arc<PsoMap>> {
        let source = self.container_source.as_deref()?;

        let mut cell = lock_cell(&self.container_cache);
        let now = Utc::now().timestamp_millis();
        if !force && cell.fresh(now, self.refresh_interval_ms) {
            return cell.value.clone();
        }

        debug!(
            force,
            never_fetched = cell.value.is_none(),
            "password settings container will be read"
        );
        match source.fetch_all() {
            Ok(policies) if policies.is_empty() => {
                warn!("no PSO read from the directory, check container ACLs; keeping cached map if any");
            }
            Ok(policies) => {
                cell.value = Some(Arc::new(
                    policies
                        .into_iter()
                        .map(|(name, settings)| (name, Arc::new(settings)))
                        .collect(),
                ));
                cell.last_fetched_ms = now;
            }
            Err(err) => {
                warn!(%err, "password settings container refresh failed, keeping cached map if any");
            }
        }
        cell.value.clone()
    }
}

// A panic while the lock was held cannot leave a torn value behind (cells are
// replaced wholesale), so a poisoned mutex is safe to keep using.
fn lock_cell<T>(cell: &Mutex<CacheCell<T>>) -> MutexGuard<'_, CacheCell<T>> {
    cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
