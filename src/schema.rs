//! GraphQL query root for the store locator

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema};

use crate::context::request_context;
use crate::geo::GeoPoint;
use crate::model::{StoreLocation, StoreWithDistance, StoreWithStatus};
use crate::pagination::{Connection, PaginationInput};
use crate::service::{sort_by_distance as order_nearest_first, StoreQueryService};
use crate::source::StoreSource;
use crate::StoreLocatorError;

pub type StoreLocatorSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Service type stored in schema data
pub type SharedStoreService = StoreQueryService<dyn StoreSource>;

/// Limits applied by the query root
#[derive(Debug, Clone, Copy)]
pub struct SchemaSettings {
    pub max_page_size: usize,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self { max_page_size: 100 }
    }
}

/// Build the schema around a source
pub fn build_schema(source: Arc<dyn StoreSource>, settings: SchemaSettings) -> StoreLocatorSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data::<SharedStoreService>(StoreQueryService::new(source))
        .data(settings)
        .finish()
}

fn to_graphql_error(err: StoreLocatorError) -> async_graphql::Error {
    let code = err.code();
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a SharedStoreService> {
    ctx.data::<SharedStoreService>()
}

#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Stores assigned to a category
    async fn stores_by_category(
        &self,
        ctx: &Context<'_>,
        category_id: i64,
    ) -> async_graphql::Result<Vec<StoreLocation>> {
        let request = request_context(ctx);
        tracing::debug!(request_id = %request.request_id, category_id, "storesByCategory");

        let stores = service(ctx)?
            .list_by_category(category_id)
            .await
            .map_err(to_graphql_error)?;
        Ok(stores.iter().map(StoreLocation::from).collect())
    }

    /// Every store, optionally filtered by enabled status
    async fn all_stores(
        &self,
        ctx: &Context<'_>,
        enabled: Option<bool>,
    ) -> async_graphql::Result<Vec<StoreWithStatus>> {
        let request = request_context(ctx);
        tracing::debug!(request_id = %request.request_id, ?enabled, "allStores");

        let listings = service(ctx)?
            .list_all(enabled)
            .await
            .map_err(to_graphql_error)?;
        Ok(listings.iter().map(StoreWithStatus::from).collect())
    }

    /// Stores within `radius` kilometres of a point
    async fn store_locator(
        &self,
        ctx: &Context<'_>,
        latitude: f64,
        longitude: f64,
        radius: f64,
        #[graphql(default = false)] sort_by_distance: bool,
    ) -> async_graphql::Result<Vec<StoreWithDistance>> {
        let request = request_context(ctx);
        tracing::info!(
            request_id = %request.request_id,
            latitude,
            longitude,
            radius,
            "storeLocator"
        );

        let point = GeoPoint::new(latitude, longitude).map_err(to_graphql_error)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(to_graphql_error(StoreLocatorError::InvalidArgument(format!(
                "radius {radius} must be a non-negative number"
            ))));
        }

        let mut hits = service(ctx)?
            .list_within_radius(point.lat, point.lng, radius)
            .await
            .map_err(to_graphql_error)?;
        if sort_by_distance {
            order_nearest_first(&mut hits);
        }
        Ok(hits.iter().map(StoreWithDistance::from).collect())
    }

    /// Cursor-paginated form of `allStores`
    async fn stores_connection(
        &self,
        ctx: &Context<'_>,
        enabled: Option<bool>,
        pagination: Option<PaginationInput>,
    ) -> async_graphql::Result<Connection<StoreWithStatus>> {
        let settings = ctx
            .data_opt::<SchemaSettings>()
            .copied()
            .unwrap_or_default();
        let pagination = pagination.unwrap_or_default();

        let listings = service(ctx)?
            .list_all(enabled)
            .await
            .map_err(to_graphql_error)?;
        let connection = Connection::paginate(listings, &pagination, settings.max_page_size)
            .map_err(to_graphql_error)?;
        Ok(connection.map(|listing| StoreWithStatus::from(&listing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Store};
    use crate::source::InMemoryStoreSource;
    use serde_json::json;

    fn schema() -> StoreLocatorSchema {
        let stores = vec![
            Store {
                id: 1,
                name: "Center City".to_string(),
                address: "1 Market St".to_string(),
                city: "Philadelphia".to_string(),
                country: "US".to_string(),
                lat: 40.0,
                lng: -75.0,
                category_id: 1,
                is_active: true,
            },
            Store {
                id: 2,
                name: "Old Town".to_string(),
                address: "9 Elm St".to_string(),
                city: "Philadelphia".to_string(),
                country: "US".to_string(),
                lat: 40.05,
                lng: -75.0,
                category_id: 2,
                is_active: false,
            },
        ];
        let categories = vec![
            Category {
                id: 1,
                name: Some("Retail".to_string()),
                is_active: true,
            },
            Category {
                id: 2,
                name: Some("Closed".to_string()),
                is_active: false,
            },
        ];
        build_schema(
            Arc::new(InMemoryStoreSource::new(stores, categories)),
            SchemaSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_stores_by_category_query() {
        let res = schema()
            .execute("{ storesByCategory(categoryId: 2) { storeName address } }")
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({"storesByCategory": [
                {"storeName": "Old Town", "address": "9 Elm St, Philadelphia, US"}
            ]})
        );
    }

    #[tokio::test]
    async fn test_all_stores_status() {
        let res = schema()
            .execute("{ allStores(enabled: true) { storeName status } }")
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({"allStores": [{"storeName": "Center City", "status": "Enabled"}]})
        );
    }

    #[tokio::test]
    async fn test_store_locator_skips_inactive_category() {
        let res = schema()
            .execute("{ storeLocator(latitude: 40.0, longitude: -75.0, radius: 50) { storeName distance } }")
            .await;
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({"storeLocator": [{"storeName": "Center City", "distance": 0.0}]})
        );
    }

    #[tokio::test]
    async fn test_store_locator_rejects_bad_coordinates() {
        let res = schema()
            .execute("{ storeLocator(latitude: 91.0, longitude: 0.0, radius: 5) { storeName } }")
            .await;
        assert_eq!(res.errors.len(), 1);
        let code = res.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("BAD_USER_INPUT")));
    }

    #[tokio::test]
    async fn test_stores_connection_pages() {
        let res = schema()
            .execute(
                "{ storesConnection(pagination: {first: 1}) { totalCount pageInfo { hasNextPage } edges { node { storeName } } } }",
            )
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        assert_eq!(
            res.data.into_json().unwrap(),
            json!({"storesConnection": {
                "totalCount": 2,
                "pageInfo": {"hasNextPage": true},
                "edges": [{"node": {"storeName": "Center City"}}]
            }})
        );
    }
}
