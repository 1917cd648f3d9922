// Persistent profile cache.
// Timestamped profile bundles in key/value storage, expired after a TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::github::ProfileBundle;

use super::storage::Storage;

const PROBE_KEY: &str = "__gh_cache_test__";

/// Persisted form of a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the bundle was written, in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub data: ProfileBundle,
}

impl CacheEntry {
    pub fn new(data: ProfileBundle, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp_millis(),
            data,
        }
    }

    /// An entry is expired once it is strictly older than `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.timestamp_millis().saturating_sub(self.timestamp);
        age > i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Profile bundles keyed by username, over best-effort storage.
///
/// Storage is probed once on construction. If the probe fails every
/// operation becomes a no-op and reads always miss.
#[derive(Clone)]
pub struct ProfileCache {
    storage: Arc<dyn Storage>,
    prefix: String,
    ttl: Duration,
    available: bool,
}

impl ProfileCache {
    pub fn new(storage: Arc<dyn Storage>, prefix: impl Into<String>, ttl: Duration) -> Self {
        let available = match probe(storage.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Storage unavailable, profile cache disabled: {}", e);
                false
            }
        };

        Self {
            storage,
            prefix: prefix.into(),
            ttl,
            available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn key(&self, username: &str) -> String {
        format!("{}{}", self.prefix, username)
    }

    /// Read a bundle that is still within its TTL.
    pub fn read(&self, username: &str) -> Option<ProfileBundle> {
        self.read_at(username, Utc::now())
    }

    /// Read a bundle as of `now`. Expired entries are removed.
    pub fn read_at(&self, username: &str, now: DateTime<Utc>) -> Option<ProfileBundle> {
        if !self.available {
            return None;
        }

        let key = self.key(username);
        let raw = match self.storage.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read profile cache for {}: {}", username, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable profile cache for {}: {}", username, e);
                return None;
            }
        };

        if entry.timestamp == 0 {
            return None;
        }

        if entry.is_expired(self.ttl, now) {
            if let Err(e) = self.storage.remove_item(&key) {
                warn!("Failed to drop expired profile cache for {}: {}", username, e);
            }
            return None;
        }

        Some(entry.data)
    }

    /// Persist a bundle stamped with the current time.
    pub fn write(&self, username: &str, bundle: &ProfileBundle) {
        self.write_at(username, bundle, Utc::now());
    }

    pub fn write_at(&self, username: &str, bundle: &ProfileBundle, now: DateTime<Utc>) {
        if !self.available {
            return;
        }

        let entry = CacheEntry::new(bundle.clone(), now);
        let result = serde_json::to_string(&entry)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(&self.key(username), &json));

        if let Err(e) = result {
            warn!("Failed to write profile cache for {}: {}", username, e);
        }
    }

    /// Delete the persisted bundle for a user.
    pub fn remove(&self, username: &str) {
        if !self.available {
            return;
        }
        if let Err(e) = self.storage.remove_item(&self.key(username)) {
            warn!("Failed to remove profile cache for {}: {}", username, e);
        }
    }
}

/// Check that storage accepts a write and a delete.
fn probe(storage: &dyn Storage) -> Result<(), StorageError> {
    storage.set_item(PROBE_KEY, "1")?;
    storage.remove_item(PROBE_KEY)?;
    Ok(())
}
