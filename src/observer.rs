//! Observability hooks injected into the query service

use crate::StoreLocatorError;

/// Which store query is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    ByCategory,
    AllStores,
    WithinRadius,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByCategory => "by_category",
            Self::AllStores => "all_stores",
            Self::WithinRadius => "within_radius",
        }
    }
}

/// Why a store was left out of radius results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    CategoryNotFound,
    CategoryInactive,
}

/// Receives query lifecycle events. Every method defaults to a no-op.
pub trait QueryObserver: Send + Sync {
    fn query_started(&self, _kind: QueryKind, _params: &str) {}

    fn query_finished(&self, _kind: QueryKind, _matched: usize) {}

    fn query_failed(&self, _kind: QueryKind, _error: &StoreLocatorError) {}

    fn store_skipped(&self, _store_id: i64, _category_id: i64, _reason: SkipReason) {}
}

/// Emits `tracing` events for each query
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn query_started(&self, kind: QueryKind, params: &str) {
        tracing::info!(query = kind.as_str(), params, "store query started");
    }

    fn query_finished(&self, kind: QueryKind, matched: usize) {
        tracing::debug!(query = kind.as_str(), matched, "store query finished");
    }

    fn query_failed(&self, kind: QueryKind, error: &StoreLocatorError) {
        tracing::error!(query = kind.as_str(), error = %error, "store query failed");
    }

    fn store_skipped(&self, store_id: i64, category_id: i64, reason: SkipReason) {
        tracing::debug!(store_id, category_id, ?reason, "store skipped");
    }
}
