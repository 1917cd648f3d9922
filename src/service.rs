// Profile data service.
// Resolves a username to a profile bundle through the request cache, the persistent cache, and the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use tokio::task::JoinSet;

use crate::cache::{DisabledStorage, FileStorage, ProfileCache, Storage};
use crate::config::Config;
use crate::error::{ProfileError, Result};
use crate::github::{GitHubClient, ProfileBundle};

type SharedFetch = Shared<BoxFuture<'static, Result<ProfileBundle>>>;

/// Per-username entry in the request cache.
///
/// `id` tells apart entries created for the same username across
/// invalidations, so late fetches and refreshes only touch their own entry.
enum Slot {
    Pending { id: u64, fetch: SharedFetch },
    Resolved { id: u64, bundle: ProfileBundle },
}

/// Observable state of a username in the request cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Absent,
    Pending,
    Resolved,
}

struct Inner {
    client: GitHubClient,
    cache: ProfileCache,
    slots: Mutex<HashMap<String, Slot>>,
    next_id: Mutex<u64>,
    refreshes: Mutex<JoinSet<()>>,
    repo_limit: u32,
    refresh_delay: Duration,
}

/// Fetches and caches GitHub profile bundles.
///
/// Cloning is cheap and clones share the request cache, so concurrent
/// lookups of the same username through any clone result in one fetch chain.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<Inner>,
}

impl ProfileService {
    pub fn new(config: &Config, client: GitHubClient, storage: Arc<dyn Storage>) -> Self {
        let cache = ProfileCache::new(storage, config.cache_prefix.clone(), config.ttl);
        Self {
            inner: Arc::new(Inner {
                client,
                cache,
                slots: Mutex::new(HashMap::new()),
                next_id: Mutex::new(0),
                refreshes: Mutex::new(JoinSet::new()),
                repo_limit: config.repo_limit,
                refresh_delay: config.refresh_delay,
            }),
        }
    }

    /// Build a service with the reqwest transport and file-backed cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GitHubClient::from_config(config)?;
        let storage: Arc<dyn Storage> = if config.cache_disabled {
            Arc::new(DisabledStorage)
        } else {
            match config
                .cache_dir
                .clone()
                .map(FileStorage::new)
                .or_else(FileStorage::default_location)
            {
                Some(storage) => Arc::new(storage),
                None => Arc::new(DisabledStorage),
            }
        };
        Ok(Self::new(config, client, storage))
    }

    /// Whether bundles are persisted between runs.
    pub fn cache_enabled(&self) -> bool {
        self.inner.cache.is_available()
    }

    /// Current request-cache state for a username.
    pub fn state(&self, username: &str) -> SlotState {
        match self.inner.slots().get(username) {
            None => SlotState::Absent,
            Some(Slot::Pending { .. }) => SlotState::Pending,
            Some(Slot::Resolved { .. }) => SlotState::Resolved,
        }
    }

    /// Get the profile bundle for `username`.
    ///
    /// Served from the request cache when present, else from a persisted
    /// bundle within its TTL (refreshed in the background), else fetched.
    pub async fn get_profile(&self, username: &str) -> Result<ProfileBundle> {
        let fetch = {
            let mut slots = self.inner.slots();
            match slots.get(username) {
                Some(Slot::Resolved { bundle, .. }) => return Ok(bundle.clone()),
                Some(Slot::Pending { fetch, .. }) => fetch.clone(),
                None => {
                    let id = self.inner.next_id();

                    if let Some(bundle) = self.inner.cache.read(username) {
                        debug!("Serving cached profile for {}", username);
                        slots.insert(
                            username.to_string(),
                            Slot::Resolved {
                                id,
                                bundle: bundle.clone(),
                            },
                        );
                        self.spawn_refresh(username, id);
                        return Ok(bundle);
                    }

                    let fetch = self.start_fetch(username, id);
                    slots.insert(
                        username.to_string(),
                        Slot::Pending {
                            id,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Forget everything cached for `username`, in memory and on disk.
    pub fn invalidate(&self, username: &str) {
        self.inner.slots().remove(username);
        self.inner.cache.remove(username);
    }

    /// Wait for every background refresh started so far to finish.
    ///
    /// One-shot callers use this before exiting so that served cached
    /// bundles still get refreshed on disk.
    pub async fn wait_for_refreshes(&self) {
        let mut refreshes = std::mem::take(&mut *self.inner.refreshes());
        while let Some(joined) = refreshes.join_next().await {
            if let Err(e) = joined {
                warn!("Background refresh task failed: {}", e);
            }
        }
    }

    /// Foreground fetch chain. Settles the slot when it completes.
    fn start_fetch(&self, username: &str, id: u64) -> SharedFetch {
        let inner = self.inner.clone();
        let username = username.to_string();

        async move {
            let result = inner.fetch_bundle(&username).await;
            inner.settle(&username, id, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// Replace the cached bundle served as slot `id` with fresh data once it
    /// arrives. Failures leave the cached bundle in place.
    fn spawn_refresh(&self, username: &str, id: u64) {
        let inner = self.inner.clone();
        let username = username.to_string();

        let mut refreshes = self.inner.refreshes();
        // Reap finished refreshes so the set stays small in long sessions
        while refreshes.try_join_next().is_some() {}
        refreshes.spawn(async move {
            tokio::time::sleep(inner.refresh_delay).await;

            match inner.fetch_bundle(&username).await {
                Ok(bundle) => {
                    let mut slots = inner.slots();
                    // Anything newer than the served entry wins over this refresh
                    match slots.get_mut(&username) {
                        Some(Slot::Resolved {
                            id: current,
                            bundle: slot,
                        }) if *current == id => {
                            inner.cache.write(&username, &bundle);
                            *slot = bundle;
                            debug!("Refreshed cached profile for {}", username);
                        }
                        _ => debug!("Discarded stale refresh of {}", username),
                    }
                }
                Err(e @ ProfileError::RateLimited { .. }) => {
                    debug!("Skipped refresh of {}: {}", username, e);
                }
                Err(e) => {
                    warn!("Failed to refresh GitHub profile for {}: {}", username, e);
                }
            }
        });
    }
}

impl Inner {
    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn refreshes(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.refreshes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> u64 {
        let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        *next += 1;
        *next
    }

    /// Run the user, repository, and README fetches together.
    ///
    /// The user is mandatory. Repositories and README degrade to empty when
    /// they fail, unless the failure is a rate limit.
    async fn fetch_bundle(&self, username: &str) -> Result<ProfileBundle> {
        let (user, repos, readme) = futures::join!(
            self.client.get_user(username),
            self.client.get_recent_repos(username, self.repo_limit),
            self.client.get_profile_readme(username),
        );

        let user = user?;
        let repos = repos.or_else(|e| degrade(e, "repositories", username, Vec::new()))?;
        let readme = readme.or_else(|e| degrade(e, "README", username, None))?;

        Ok(ProfileBundle {
            user: Some(user),
            repos,
            readme,
        })
    }

    /// Record the outcome of a foreground fetch, unless the slot has since
    /// been invalidated or replaced.
    fn settle(&self, username: &str, id: u64, result: &Result<ProfileBundle>) {
        let mut slots = self.slots();
        let current = matches!(slots.get(username), Some(Slot::Pending { id: pending, .. }) if *pending == id);
        if !current {
            return;
        }

        match result {
            Ok(bundle) => {
                self.cache.write(username, bundle);
                slots.insert(
                    username.to_string(),
                    Slot::Resolved {
                        id,
                        bundle: bundle.clone(),
                    },
                );
            }
            Err(e) => {
                debug!("Fetch of {} failed: {}", username, e);
                slots.remove(username);
            }
        }
    }
}

fn degrade<T>(err: ProfileError, what: &str, username: &str, fallback: T) -> Result<T> {
    if err.is_rate_limited() {
        return Err(err);
    }
    debug!("No {} for {}: {}", what, username, err);
    Ok(fallback)
}
