//! Batch loading with a per-query cache
//!
//! Radius searches resolve one category per store. Loading those through a
//! [`DataLoader`] turns N category lookups into one batch per distinct id set.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::Category;
use crate::source::StoreSource;
use crate::Result;

/// Batch loader trait for loading multiple items at once
#[async_trait]
pub trait BatchLoader<K, V>: Send + Sync
where
    K: Send + Sync + Clone + Eq + Hash,
    V: Send + Sync + Clone,
{
    /// Load batch of items by keys
    ///
    /// Keys with no value are left out of the map; only a failure to reach
    /// the backing store is an error.
    async fn load_batch(&self, keys: &[K]) -> Result<HashMap<K, V>>;
}

/// DataLoader with caching and batching
///
/// Meant to live for a single query; build a fresh one per call so cached
/// values never outlive the request that loaded them.
pub struct DataLoader<K, V, L>
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    loader: Arc<L>,
    cache: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V, L> DataLoader<K, V, L>
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Load multiple items, batching every key not already cached
    pub async fn load_many(&self, keys: Vec<K>) -> Result<HashMap<K, V>> {
        let mut result = HashMap::new();
        let mut uncached_keys = Vec::new();
        let mut seen = HashSet::new();

        {
            let cache = self.cache.lock().await;
            for key in keys {
                if let Some(value) = cache.get(&key) {
                    result.insert(key, value.clone());
                } else if seen.insert(key.clone()) {
                    uncached_keys.push(key);
                }
            }
        }

        if !uncached_keys.is_empty() {
            let batch_results = self.loader.load_batch(&uncached_keys).await?;

            let mut cache = self.cache.lock().await;
            for (k, v) in batch_results {
                cache.insert(k.clone(), v.clone());
                result.insert(k, v);
            }
        }

        Ok(result)
    }
}

/// Loads categories by id from a [`StoreSource`]
pub struct CategoryLoader<S: StoreSource + ?Sized> {
    source: Arc<S>,
}

impl<S: StoreSource + ?Sized> CategoryLoader<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: StoreSource + ?Sized> BatchLoader<i64, Category> for CategoryLoader<S> {
    async fn load_batch(&self, keys: &[i64]) -> Result<HashMap<i64, Category>> {
        self.source.categories(keys).await
    }
}
