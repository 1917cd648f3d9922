// Scripted transport for unit tests.
// Serves canned responses per URL, records every request, and can hold replies until released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tokio::sync::Semaphore;

use crate::error::{ProfileError, Result};

use super::transport::{HttpResponse, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<(String, HeaderMap)>>,
    gate: Arc<Semaphore>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    /// A transport whose requests block until [`FakeTransport::release`].
    pub fn held() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn release(&self) {
        self.gate.add_permits(1024);
    }

    pub fn route(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Response(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Failure(message.to_string()));
    }

    pub fn hits(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_headers(&self, url: &str) -> Option<HeaderMap> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.clone()));

        // Replies are fixed when the request is made, even if it is held
        let reply = self.routes.lock().unwrap().get(url).cloned();

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProfileError::unavailable(e.to_string()))?;

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(ProfileError::unavailable(message)),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}
