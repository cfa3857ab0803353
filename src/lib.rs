//! # store-locator-graphql
//!
//! GraphQL store locator for physical retail locations.
//!
//! ## Features
//!
//! - **Geo Distance** - Haversine great-circle distance in kilometres
//! - **Store Queries** - List by category, by enabled status, or within a radius
//! - **Cursor Pagination** - Relay-style connections over store listings
//! - **DataLoader** - Batched category resolution during radius searches
//! - **Request Context** - Explicit per-request context extracted from HTTP headers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use store_locator_graphql::{InMemoryStoreSource, StoreQueryService};
//!
//! # async fn example() -> store_locator_graphql::Result<()> {
//! let source = Arc::new(InMemoryStoreSource::default());
//! let service = StoreQueryService::new(source);
//! let _nearby = service.list_within_radius(40.0, -75.0, 25.0).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod dataloaders;
pub mod geo;
pub mod model;
pub mod observer;
pub mod pagination;
pub mod schema;
pub mod service;
pub mod source;
pub mod telemetry;

pub use config::LocatorConfig;
pub use context::{
    extract_request_context, graphql_handler, request_context, router, RequestContext,
};
pub use dataloaders::{BatchLoader, CategoryLoader, DataLoader};
pub use geo::{distance_km, GeoPoint, EARTH_RADIUS_KM};
pub use model::{Category, Store, StoreLocation, StoreStatus, StoreWithDistance, StoreWithStatus};
pub use observer::{QueryKind, QueryObserver, SkipReason, TracingObserver};
pub use pagination::{Connection, CursorCodec, Edge, PageInfo, PaginationInput};
pub use schema::{build_schema, QueryRoot, SchemaSettings, SharedStoreService, StoreLocatorSchema};
pub use service::{sort_by_distance, StoreDistance, StoreListing, StoreQueryService};
pub use source::{InMemoryStoreSource, StoreSource};

use thiserror::Error;

/// Store locator errors
#[derive(Error, Debug)]
pub enum StoreLocatorError {
    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration for {var}: {reason}")]
    Config { var: String, reason: String },

    #[error("Seed data error: {0}")]
    Seed(String),
}

impl StoreLocatorError {
    /// Machine-readable code attached to GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataAccess(_) | Self::Seed(_) => "DATA_ACCESS",
            Self::InvalidCursor(_) | Self::Pagination(_) | Self::InvalidArgument(_) => {
                "BAD_USER_INPUT"
            }
            Self::Config { .. } => "INTERNAL",
        }
    }
}

/// Result type for store locator operations
pub type Result<T> = std::result::Result<T, StoreLocatorError>;
