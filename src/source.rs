//! Data source seam over the external store/category persistence layer

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{Category, Store};
use crate::{Result, StoreLocatorError};

/// Read-only access to store and category records.
///
/// Implementations are queried fresh on every service call; nothing here is
/// cached by the caller.
#[async_trait]
pub trait StoreSource: Send + Sync {
    /// Full store collection in its natural order
    async fn stores(&self) -> Result<Vec<Store>>;

    /// Look up one category, `Ok(None)` when it does not exist
    async fn category(&self, id: i64) -> Result<Option<Category>>;

    /// Look up several categories at once.
    ///
    /// Missing ids are simply absent from the returned map. Override this
    /// when the backing store can fetch in a single round trip.
    async fn categories(&self, ids: &[i64]) -> Result<HashMap<i64, Category>> {
        let mut found = HashMap::with_capacity(ids.len());
        for &id in ids {
            if let Some(category) = self.category(id).await? {
                found.insert(id, category);
            }
        }
        Ok(found)
    }
}

/// Seed file layout: `{"stores": [...], "categories": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// In-memory source, seeded up front and never mutated afterwards
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreSource {
    stores: Vec<Store>,
    categories: HashMap<i64, Category>,
}

impl InMemoryStoreSource {
    pub fn new(stores: Vec<Store>, categories: Vec<Category>) -> Self {
        Self {
            stores,
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Parse a JSON seed document
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: SeedData =
            serde_json::from_str(json).map_err(|e| StoreLocatorError::Seed(e.to_string()))?;
        Ok(Self::new(seed.stores, seed.categories))
    }

    /// Read and parse a JSON seed file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreLocatorError::Seed(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[async_trait]
impl StoreSource for InMemoryStoreSource {
    async fn stores(&self) -> Result<Vec<Store>> {
        Ok(self.stores.clone())
    }

    async fn category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.categories.get(&id).cloned())
    }

    async fn categories(&self, ids: &[i64]) -> Result<HashMap<i64, Category>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.categories.get(id).map(|c| (*id, c.clone())))
            .collect())
    }
}
