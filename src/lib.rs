//! GitHub profile cards.
//!
//! [`service::ProfileService`] resolves a username to its user record, most
//! recently updated repositories, and profile README. Lookups are
//! de-duplicated in memory, persisted with a TTL, and served
//! stale-while-revalidate. The TUI and plain-text front-ends render the
//! results through [`view::ProfileView`].

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod github;
pub mod service;
mod ui;
pub mod view;

pub use error::{ProfileError, Result};
pub use github::{ProfileBundle, RepoRecord, UserRecord};
pub use service::{ProfileService, SlotState};
