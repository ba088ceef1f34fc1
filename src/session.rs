//! Cookie-backed in-memory sessions.
//!
//! # Responsibilities
//! - Keep session data keyed by session ID
//! - Reuse the ID carried by the client cookie, or issue a new one
//! - Write the action's session changes back after dispatch
//! - Expire sessions that stay idle longer than the configured TTL
//!
//! # Design Decisions
//! - IDs are random UUID v4 values; unknown IDs are never adopted
//! - A new session is stored only once a dispatch succeeds, so failed
//!   requests leave nothing behind
//! - The store is shared across requests (`DashMap`, internal locking)

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header;
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::front::{Output, RequestContext, SessionInitializer};

/// Data of one session.
pub type SessionData = HashMap<String, String>;

/// Expired sessions are swept once every this many saves.
const SWEEP_EVERY: u64 = 256;

#[derive(Debug, Clone)]
struct SessionEntry {
    data: SessionData,
    last_seen: Instant,
}

/// Thread-safe map of session ID → session data.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<DashMap<String, SessionEntry>>,
    ttl: Duration,
    saves: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(SessionConfig::default().ttl_secs))
    }
}

impl SessionStore {
    /// Store whose sessions expire after `ttl` without access.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            saves: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Data of a live session. Touching a session extends its lifetime;
    /// an expired one is removed.
    pub fn get(&self, id: &str) -> Option<SessionData> {
        {
            let mut entry = self.inner.get_mut(id)?;
            if entry.last_seen.elapsed() < self.ttl {
                entry.last_seen = Instant::now();
                return Some(entry.data.clone());
            }
        }
        // The shard lock is released above; removing while holding it deadlocks.
        self.inner.remove(id);
        None
    }

    /// Insert or replace the data of a session.
    pub fn save(&self, id: &str, data: SessionData) {
        self.inner.insert(
            id.to_string(),
            SessionEntry {
                data,
                last_seen: Instant::now(),
            },
        );
        if self.saves.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.purge_expired();
        }
    }

    pub fn remove(&self, id: &str) -> Option<SessionData> {
        self.inner.remove(id).map(|(_, entry)| entry.data)
    }

    /// Drop every expired session and return how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.last_seen.elapsed() < self.ttl);
        let purged = before.saturating_sub(self.inner.len());
        if purged > 0 {
            tracing::debug!(purged, remaining = self.inner.len(), "Expired sessions purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Starts sessions from the configured cookie.
#[derive(Debug, Clone)]
pub struct CookieSessionInitializer {
    store: SessionStore,
    cookie_name: String,
}

impl CookieSessionInitializer {
    pub fn new(store: SessionStore, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie_name: config.cookie_name.clone(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

impl SessionInitializer for CookieSessionInitializer {
    fn start_session(&self, request: &mut RequestContext, output: &mut Output) {
        let existing = request
            .cookie(&self.cookie_name)
            .and_then(|id| self.store.get(id).map(|data| (id.to_string(), data)));

        let (id, data) = match existing {
            Some(found) => found,
            None => {
                // Stored by save_session once the dispatch succeeds.
                let id = Uuid::new_v4().to_string();
                tracing::debug!(session_id = %id, "Session issued");
                output.push_header(
                    header::SET_COOKIE.as_str(),
                    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.cookie_name, id),
                );
                (id, SessionData::new())
            }
        };

        request.session_id = Some(id);
        request.session = data;
    }

    fn save_session(&self, request: &RequestContext) {
        if let Some(id) = &request.session_id {
            self.store.save(id, request.session.clone());
        }
    }
}
