// GitHub module.
// Client, transport, and types for the user, repository, and raw README endpoints.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub(crate) mod fake;
pub mod transport;
pub mod types;

pub use client::{GitHubClient, Host};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::*;
