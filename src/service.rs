//! Store queries: by category, by enabled status, and within a radius

use std::sync::Arc;

use crate::dataloaders::{CategoryLoader, DataLoader};
use crate::geo::distance_km;
use crate::model::{Store, StoreStatus, StoreWithDistance, StoreWithStatus};
use crate::observer::{QueryKind, QueryObserver, SkipReason, TracingObserver};
use crate::source::StoreSource;
use crate::Result;

/// Store paired with its derived display status
#[derive(Debug, Clone, PartialEq)]
pub struct StoreListing {
    pub store: Store,
    pub status: StoreStatus,
}

impl From<&StoreListing> for StoreWithStatus {
    fn from(listing: &StoreListing) -> Self {
        Self {
            store_name: listing.store.name.clone(),
            address: listing.store.formatted_address(),
            status: listing.status.to_string(),
        }
    }
}

/// Store paired with its distance from the query point
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDistance {
    pub store: Store,
    pub distance_km: f64,
}

impl From<&StoreDistance> for StoreWithDistance {
    fn from(hit: &StoreDistance) -> Self {
        Self {
            store_name: hit.store.name.clone(),
            address: hit.store.formatted_address(),
            distance: hit.distance_km,
        }
    }
}

/// Order radius results nearest first
pub fn sort_by_distance(results: &mut [StoreDistance]) {
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// Read-only query service over a [`StoreSource`].
///
/// The store collection is fetched from the source on every call. Results
/// keep the source's order unless noted otherwise.
pub struct StoreQueryService<S: StoreSource + ?Sized> {
    source: Arc<S>,
    observer: Arc<dyn QueryObserver>,
}

impl<S: StoreSource + ?Sized + 'static> StoreQueryService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_observer(source, Arc::new(TracingObserver))
    }

    pub fn with_observer(source: Arc<S>, observer: Arc<dyn QueryObserver>) -> Self {
        Self { source, observer }
    }

    /// Stores whose category id equals `category_id`.
    ///
    /// The category's own active flag is not consulted here, unlike
    /// [`Self::list_within_radius`].
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Store>> {
        let kind = QueryKind::ByCategory;
        self.observer
            .query_started(kind, &format!("category_id={category_id}"));

        let stores = self.fetch_stores(kind).await?;
        let matched: Vec<Store> = stores
            .into_iter()
            .filter(|store| store.category_id == category_id)
            .collect();

        self.observer.query_finished(kind, matched.len());
        Ok(matched)
    }

    /// All stores, or only those whose active flag equals `enabled`
    pub async fn list_all(&self, enabled: Option<bool>) -> Result<Vec<StoreListing>> {
        let kind = QueryKind::AllStores;
        self.observer.query_started(kind, &format!("enabled={enabled:?}"));

        let stores = self.fetch_stores(kind).await?;
        let matched: Vec<StoreListing> = stores
            .into_iter()
            .filter(|store| enabled.map_or(true, |want| store.is_active == want))
            .map(|store| StoreListing {
                status: store.status(),
                store,
            })
            .collect();

        self.observer.query_finished(kind, matched.len());
        Ok(matched)
    }

    /// Stores within `radius_km` of the point whose category resolves and is active.
    ///
    /// Results are unordered; see [`sort_by_distance`].
    pub async fn list_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<StoreDistance>> {
        let kind = QueryKind::WithinRadius;
        self.observer.query_started(
            kind,
            &format!("latitude={lat} longitude={lon} radius_km={radius_km}"),
        );

        let stores = self.fetch_stores(kind).await?;

        let loader = DataLoader::new(CategoryLoader::new(Arc::clone(&self.source)));
        let category_ids: Vec<i64> = stores.iter().map(|s| s.category_id).collect();
        let categories = loader
            .load_many(category_ids)
            .await
            .inspect_err(|e| self.observer.query_failed(kind, e))?;

        let mut hits = Vec::new();
        for store in stores {
            match categories.get(&store.category_id) {
                None => {
                    self.observer.store_skipped(
                        store.id,
                        store.category_id,
                        SkipReason::CategoryNotFound,
                    );
                    continue;
                }
                Some(category) if !category.is_active => {
                    self.observer.store_skipped(
                        store.id,
                        store.category_id,
                        SkipReason::CategoryInactive,
                    );
                    continue;
                }
                Some(_) => {}
            }

            let distance = distance_km(lat, lon, store.lat, store.lng);
            if distance <= radius_km {
                hits.push(StoreDistance {
                    store,
                    distance_km: distance,
                });
            }
        }

        self.observer.query_finished(kind, hits.len());
        Ok(hits)
    }

    async fn fetch_stores(&self, kind: QueryKind) -> Result<Vec<Store>> {
        self.source
            .stores()
            .await
            .inspect_err(|e| self.observer.query_failed(kind, e))
    }
}

impl<S: StoreSource + ?Sized> Clone for StoreQueryService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            observer: Arc::clone(&self.observer),
        }
    }
}
