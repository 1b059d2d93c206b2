//! # Backend Client
//!
//! [`StoreApi`] is the seam between the storefront and the network;
//! [`LarekClient`] is its reqwest implementation.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  {base_url}/product                                                │
//! │       ◄── { "total": 10, "items": [CatalogItem, ...] }                  │
//! │           each item.image is prefixed with cdn_url before returning     │
//! │                                                                         │
//! │  POST {base_url}/order                                                  │
//! │       ──► { payment, address, email, phone, total, items }              │
//! │       ◄── { "id": "...", "total": 2200 }                                │
//! │                                                                         │
//! │  non-2xx ◄── { "error": "..." }  → ApiError::Api { status, message }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use larek_core::types::{CatalogItem, Order, OrderResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// StoreApi Trait
// =============================================================================

/// The two calls the storefront makes.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Fetches the full catalog with image URIs resolved against the CDN.
    async fn fetch_catalog(&self) -> ApiResult<Vec<CatalogItem>>;

    /// Submits an order.
    async fn place_order(&self, order: &Order) -> ApiResult<OrderResult>;
}

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for [`LarekClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root, e.g. `https://larek-api.nomoreparties.co/api/weblarek`.
    pub base_url: String,
    /// Image root, e.g. `https://larek-api.nomoreparties.co/content/weblarek`.
    pub cdn_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Parses `raw` and checks it is an http(s) URL.
pub fn parse_http_url(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::InvalidUrl(format!(
            "{raw}: scheme must be http or https, got {other}"
        ))),
    }
}

// =============================================================================
// Wire Shapes
// =============================================================================

/// List envelope used by `GET /product`.
#[derive(Debug, Deserialize)]
pub struct ApiListResponse<T> {
    #[serde(default)]
    pub total: usize,
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// =============================================================================
// LarekClient
// =============================================================================

/// reqwest-backed [`StoreApi`].
#[derive(Debug, Clone)]
pub struct LarekClient {
    client: reqwest::Client,
    base_url: String,
    cdn_url: String,
}

impl LarekClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if either URL is not http(s), or `Http` if the
    /// underlying client fails to build.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        parse_http_url(&config.base_url)?;
        parse_http_url(&config.cdn_url)?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        info!(base_url = %config.base_url, "Backend client ready");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Prefixes a relative image path with the CDN root.
    fn resolve_image(&self, image: &str) -> String {
        if image.starts_with("http://") || image.starts_with("https://") {
            return image.to_string();
        }
        format!("{}/{}", self.cdn_url, image.trim_start_matches('/'))
    }

    /// Turns a response into `T`, surfacing the backend's error message on
    /// non-2xx statuses.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| status.to_string())
                });
            warn!(status = status.as_u16(), %message, "Backend rejected request");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StoreApi for LarekClient {
    async fn fetch_catalog(&self) -> ApiResult<Vec<CatalogItem>> {
        let url = self.endpoint("product");
        debug!(%url, "Fetching catalog");

        let response = self.client.get(&url).send().await?;
        let list: ApiListResponse<CatalogItem> = Self::handle_response(response).await?;

        let items: Vec<CatalogItem> = list
            .items
            .into_iter()
            .map(|mut item| {
                item.image = self.resolve_image(&item.image);
                item
            })
            .collect();

        info!(items = items.len(), total = list.total, "Catalog fetched");
        Ok(items)
    }

    async fn place_order(&self, order: &Order) -> ApiResult<OrderResult> {
        let url = self.endpoint("order");
        debug!(%url, items = order.items.len(), total = %order.total, "Submitting order");

        let response = self.client.post(&url).json(order).send().await?;
        let result: OrderResult = Self::handle_response(response).await?;

        info!(order_id = %result.id, total = %result.total, "Order accepted");
        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use larek_core::types::{Category, PaymentMethod};
    use larek_core::Money;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn_server(app: Router) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/api/weblarek")
    }

    fn client_for(base_url: String) -> LarekClient {
        LarekClient::new(&ApiConfig {
            base_url,
            cdn_url: "https://cdn.test/content/weblarek/".to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
        .unwrap()
    }

    fn order() -> Order {
        Order {
            payment: PaymentMethod::Card,
            address: "Main St".to_string(),
            email: "a@b.c".to_string(),
            phone: "+7000".to_string(),
            total: Money::from_synapses(100),
            items: vec!["a".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog_resolves_images() {
        let app = Router::new().route(
            "/api/weblarek/product",
            get(|| async {
                Json(json!({
                    "total": 2,
                    "items": [
                        {"id": "a", "title": "A", "category": "софт-скил", "price": 100, "image": "/a.svg"},
                        {"id": "b", "title": "B", "category": "кнопка", "price": null, "image": "https://elsewhere/b.svg",
                         "description": ["one", "two"]}
                    ]
                }))
            }),
        );
        let client = client_for(spawn_server(app).await);

        let items = client.fetch_catalog().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].image, "https://cdn.test/content/weblarek/a.svg");
        assert_eq!(items[0].category, Category::SoftSkill);
        assert_eq!(items[1].image, "https://elsewhere/b.svg");
        assert!(items[1].is_priceless());
    }

    #[tokio::test]
    async fn test_place_order_posts_payload() {
        let app = Router::new().route(
            "/api/weblarek/order",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["payment"], "card");
                assert_eq!(body["items"], json!(["a"]));
                Json(json!({"id": "X", "total": body["total"]}))
            }),
        );
        let client = client_for(spawn_server(app).await);

        let result = client.place_order(&order()).await.unwrap();

        assert_eq!(result.id, "X");
        assert_eq!(result.total, Money::from_synapses(100));
    }

    #[tokio::test]
    async fn test_backend_error_message_is_surfaced() {
        let app = Router::new().route(
            "/api/weblarek/order",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Неверная сумма заказа"})),
                )
            }),
        );
        let client = client_for(spawn_server(app).await);

        match client.place_order(&order()).await {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Неверная сумма заказа");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_text_when_no_error_body() {
        let app = Router::new().route(
            "/api/weblarek/product",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = client_for(spawn_server(app).await);

        match client.fetch_catalog().await {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let app = Router::new().route(
            "/api/weblarek/product",
            get(|| async { Json(json!({"total": 0})) }),
        );
        let client = client_for(spawn_server(app).await);

        assert!(matches!(client.fetch_catalog().await, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let result = LarekClient::new(&ApiConfig {
            base_url: "ftp://example.com".to_string(),
            cdn_url: "https://cdn.test".to_string(),
            timeout: DEFAULT_TIMEOUT,
        });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));

        assert!(parse_http_url("not a url").is_err());
        assert!(parse_http_url("https://larek-api.nomoreparties.co/api/weblarek").is_ok());
    }
}
