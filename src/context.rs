//! Per-request context and the HTTP entry point
//!
//! Provides helpers for:
//! - Extracting request id, customer id and store code from HTTP headers
//! - Injecting that context into each GraphQL request
//! - A standard Axum handler and router for the GraphQL endpoint

use async_graphql::{Context, Request, Response};
use axum::{extract::Extension, http::HeaderMap, routing::post, Json, Router};
use tracing::Instrument;
use uuid::Uuid;

use crate::schema::StoreLocatorSchema;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";
pub const STORE_CODE_HEADER: &str = "x-store-code";

/// Caller context passed explicitly into every resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub customer_id: Option<i64>,
    pub store_code: Option<String>,
}

impl RequestContext {
    /// Anonymous context with a fresh request id
    pub fn anonymous() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            customer_id: None,
            store_code: None,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Build a [`RequestContext`] from headers.
///
/// Malformed ids are ignored rather than rejected; a missing or malformed
/// request id is replaced with a fresh one.
pub fn extract_request_context(headers: &HeaderMap) -> RequestContext {
    RequestContext {
        request_id: header_str(headers, REQUEST_ID_HEADER)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4),
        customer_id: header_str(headers, CUSTOMER_ID_HEADER).and_then(|s| s.parse().ok()),
        store_code: header_str(headers, STORE_CODE_HEADER).map(str::to_string),
    }
}

/// GraphQL handler that injects the request context before execution
pub async fn graphql_handler(
    Extension(schema): Extension<StoreLocatorSchema>,
    headers: HeaderMap,
    req: Json<Request>,
) -> Json<Response> {
    let context = extract_request_context(&headers);
    let span = tracing::info_span!(
        "graphql",
        request_id = %context.request_id,
        customer_id = ?context.customer_id,
        store_code = ?context.store_code,
    );

    let request = req.0.data(context);
    Json(schema.execute(request).instrument(span).await)
}

/// Router serving the schema at `path`
pub fn router(schema: StoreLocatorSchema, path: &str) -> Router {
    Router::new()
        .route(path, post(graphql_handler))
        .layer(Extension(schema))
}

/// Get the request context from the GraphQL context, anonymous if absent
pub fn request_context(ctx: &Context<'_>) -> RequestContext {
    ctx.data_opt::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}
