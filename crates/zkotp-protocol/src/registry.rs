//! # Secret Registry
//!
//! The roadside unit's table of vehicle secrets. Lookups are read-locked
//! and may run from many verifying threads at once; registration and
//! revocation take the write lock.
//!
//! Secrets never leave the registry by value. Callers get a closure over a
//! borrowed secret, so the only copy lives behind the lock.

use std::collections::HashMap;

use parking_lot::RwLock;
use zkotp_core::{Secret, VehicleId};

/// Thread-safe mapping from vehicle identifier to shared secret.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<VehicleId, Secret>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a vehicle's secret. Returns `true` if an entry
    /// was replaced.
    pub fn register(&self, id: VehicleId, secret: Secret) -> bool {
        self.entries.write().insert(id, secret).is_some()
    }

    /// Remove a vehicle. Returns `true` if it was registered.
    pub fn revoke(&self, id: &VehicleId) -> bool {
        self.entries.write().remove(id).is_some()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &VehicleId) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Number of registered vehicles.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no vehicle is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` over the secret for `id` while holding the read lock.
    /// Returns `None` if `id` is unknown.
    pub fn with_secret<R>(&self, id: &VehicleId, f: impl FnOnce(&Secret) -> R) -> Option<R> {
        self.entries.read().get(id).map(f)
    }
}

impl FromIterator<(VehicleId, Secret)> for Registry {
    fn from_iter<I: IntoIterator<Item = (VehicleId, Secret)>>(iter: I) -> Self {
        Self {
            entries: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Secret {
        Secret::try_from(s).unwrap()
    }

    #[test]
    fn lookup_unknown_is_none() {
        let reg = Registry::new();
        assert!(reg.with_secret(&VehicleId::from("VEH404"), |_| ()).is_none());
    }

    #[test]
    fn register_then_lookup() {
        let reg = Registry::new();
        assert!(!reg.register("VEH001".into(), secret("abc")));
        let bytes = reg.with_secret(&"VEH001".into(), |s| s.expose().to_vec());
        assert_eq!(bytes.as_deref(), Some(&b"abc"[..]));
    }

    #[test]
    fn register_replaces() {
        let reg = Registry::new();
        reg.register("VEH001".into(), secret("a"));
        assert!(reg.register("VEH001".into(), secret("b")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn revoke_removes() {
        let reg: Registry = [(VehicleId::from("VEH001"), secret("a"))].into_iter().collect();
        assert!(reg.revoke(&"VEH001".into()));
        assert!(!reg.revoke(&"VEH001".into()));
        assert!(reg.is_empty());
    }
}
