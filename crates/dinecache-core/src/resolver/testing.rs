//! In-memory `Fetch` used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, Fetch};

#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Body(body.to_string())
    }
}

/// Serves canned replies by exact URL and counts every request.
/// Unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    routes: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: &str, reply: Reply) {
        self.routes.lock().unwrap().insert(url.to_string(), reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for FakeFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.routes.lock().unwrap().get(url).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body.into_bytes()),
            Some(Reply::Status(status)) => Err(ApiError::Status {
                status,
                body: String::new(),
            }),
            None => Err(ApiError::Status {
                status: 404,
                body: url.to_string(),
            }),
        }
    }
}
