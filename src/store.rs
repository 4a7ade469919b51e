use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::StoreError;
use crate::model::{ItemRecord, WishlistItem};

/// Key-based access to the wishlist collection. One implementation speaks
/// the Realtime Database REST protocol, the other keeps the collection in
/// memory for tests. Existence checks are the caller's business: `replace`
/// and `delete` act on whatever is (or is not) at the key.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<WishlistItem>, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<WishlistItem>, StoreError>;
    async fn create(&self, record: &ItemRecord) -> Result<String, StoreError>;
    async fn replace(&self, id: &str, record: &ItemRecord) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Shape of the store's answer to a push: the key it assigned.
#[derive(Debug, Deserialize)]
struct PushedKey {
    name: String,
}

pub struct FirebaseStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    pub async fn new(cfg: &Config) -> Result<Self> {
        let auth_token = cfg.resolve_credentials()?;
        let store = FirebaseStore {
            http: reqwest::Client::new(),
            base_url: cfg.app.get_database_url().trim_end_matches('/').to_string(),
            collection: cfg.app.get_collection().to_string(),
            auth_token,
        };

        store.ping().await?;
        Ok(store)
    }

    /// Startup probe: one shallow read of the collection node. A bad URL
    /// or rejected credentials surface here, not on the first request.
    async fn ping(&self) -> Result<()> {
        let resp = self
            .with_auth(self.http.get(self.collection_url()))
            .query(&[("shallow", "true")])
            .send()
            .await?;
        if !resp.status().is_success() {
            anyhow::bail!("store returned status {} during startup probe", resp.status());
        }
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.collection)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, self.collection, urlencoding::encode(id))
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.query(&[("auth", token.as_str())]),
            None => req,
        }
    }

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(StoreError::Status(resp.status().as_u16()))
        }
    }
}

#[async_trait]
impl ItemStore for FirebaseStore {
    async fn list_all(&self) -> Result<Vec<WishlistItem>, StoreError> {
        let resp = self.with_auth(self.http.get(self.collection_url())).send().await?;
        let resp = Self::check_status(resp)?;

        // An absent or empty collection node comes back as JSON null.
        let nodes: Option<HashMap<String, ItemRecord>> = resp.json().await?;
        Ok(nodes
            .unwrap_or_default()
            .into_iter()
            .map(|(id, record)| WishlistItem { id, record })
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<WishlistItem>, StoreError> {
        let resp = self.with_auth(self.http.get(self.record_url(id))).send().await?;
        let resp = Self::check_status(resp)?;

        let record: Option<ItemRecord> = resp.json().await?;
        Ok(record.map(|record| WishlistItem {
            id: id.to_string(),
            record,
        }))
    }

    async fn create(&self, record: &ItemRecord) -> Result<String, StoreError> {
        let resp = self
            .with_auth(self.http.post(self.collection_url()))
            .json(record)
            .send()
            .await?;
        let resp = Self::check_status(resp)?;

        let pushed: PushedKey = resp.json().await?;
        Ok(pushed.name)
    }

    async fn replace(&self, id: &str, record: &ItemRecord) -> Result<(), StoreError> {
        let resp = self
            .with_auth(self.http.put(self.record_url(id)))
            .json(record)
            .send()
            .await?;
        Self::check_status(resp)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let resp = self.with_auth(self.http.delete(self.record_url(id))).send().await?;
        Self::check_status(resp)?;
        Ok(())
    }
}

/// Map-backed store for tests. Counter keys are zero-padded and sort in
/// creation order, like store-assigned push keys.
pub struct MemoryStore {
    items: RwLock<HashMap<String, ItemRecord>>,
    next_key: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            items: RwLock::new(HashMap::new()),
            next_key: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<WishlistItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        Ok(items
            .iter()
            .map(|(id, record)| WishlistItem {
                id: id.clone(),
                record: record.clone(),
            })
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<WishlistItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        Ok(items.get(id).map(|record| WishlistItem {
            id: id.to_string(),
            record: record.clone(),
        }))
    }

    async fn create(&self, record: &ItemRecord) -> Result<String, StoreError> {
        let id = format!("-K{:016}", self.next_key.fetch_add(1, Ordering::Relaxed));
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        items.insert(id.clone(), record.clone());
        Ok(id)
    }

    async fn replace(&self, id: &str, record: &ItemRecord) -> Result<(), StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        items.insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        items.remove(id);
        Ok(())
    }
}
