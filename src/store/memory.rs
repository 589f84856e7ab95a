//! In-process user store, selected with `DATABASE_URL=memory://`.
//!
//! Records outlive individual sessions: reconnecting through the same
//! [`MemoryBackend`] sees everything inserted before.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreBackend, StoreError, UserStore};
use crate::users::repo_types::User;

pub const SCHEME: &str = "memory://";

#[derive(Default)]
pub struct MemoryBackend {
    records: Arc<RwLock<Vec<User>>>,
    connects: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions opened so far.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn connect(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryStore {
            records: Arc::clone(&self.records),
            open: AtomicBool::new(true),
        }))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

pub struct MemoryStore {
    records: Arc<RwLock<Vec<User>>>,
    open: AtomicBool,
}

impl MemoryStore {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.ensure_open()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, StoreError> {
        self.ensure_open()?;
        let mut records = self.records.write().await;
        if records.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        records.push(user.clone());
        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.ensure_open()?;
        let mut rows = self.records.read().await.clone();
        rows.sort_by_key(|u| u.created_at);
        Ok(rows)
    }

    fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}
