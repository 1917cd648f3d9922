// Cache module for persisted profile bundles.
// Storage backends plus the TTL-checked profile cache built on them.

pub mod paths;
pub mod storage;
pub mod store;

pub use storage::{DisabledStorage, FileStorage, Storage};
#[cfg(test)]
pub(crate) use storage::MemoryStorage;
pub use store::{CacheEntry, ProfileCache};
