//! Catalog Client
//!
//! The `Catalog` trait is the network boundary of the harness. `HttpCatalog`
//! talks to the real service; tests substitute scripted implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use super::{CacheSignal, ProductList, ProductRecord, ProductUpdate, CACHE_STATUS_HEADER};
use crate::error::{HarnessError, Result};

// == Catalog Response ==
/// A decoded product plus the catalog's own cache report, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogResponse {
    pub product: ProductRecord,
    pub cache_signal: Option<CacheSignal>,
}

impl CatalogResponse {
    pub fn new(product: ProductRecord) -> Self {
        Self {
            product,
            cache_signal: None,
        }
    }
}

// == Catalog Trait ==
/// Read/write access to the catalog service.
///
/// Implementations make exactly one attempt per call. Any transport failure
/// or non-2xx status is reported as `HarnessError::Network`.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// GET a product by id.
    async fn read_product(&self, id: &str) -> Result<CatalogResponse>;

    /// Update price and stock of a product; the response carries the bumped version.
    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<CatalogResponse>;

    /// First product of the listing, used when no target is given.
    async fn first_product(&self) -> Result<Option<ProductRecord>>;
}

// == HTTP Catalog ==
/// reqwest-backed catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Creates a client rooted at `base_url` (e.g. `http://gateway/api/catalog`).
    ///
    /// `timeout` bounds every request, so a hung catalog fails the probe
    /// instead of stalling the run.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HarnessError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Self::new(config.catalog_base_url.clone(), config.probe_timeout())
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    async fn decode(response: Response) -> Result<CatalogResponse> {
        let response = ensure_success(response)?;
        let cache_signal = response
            .headers()
            .get(CACHE_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(CacheSignal::from_header);
        let product = response.json::<ProductRecord>().await?;

        Ok(CatalogResponse {
            product,
            cache_signal,
        })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn read_product(&self, id: &str) -> Result<CatalogResponse> {
        debug!("GET {}", self.product_url(id));
        let response = self.client.get(self.product_url(id)).send().await?;
        Self::decode(response).await
    }

    async fn update_product(&self, id: &str, update: &ProductUpdate) -> Result<CatalogResponse> {
        debug!(
            "POST {} price={} stock={}",
            self.product_url(id),
            update.price,
            update.stock
        );
        let response = self
            .client
            .post(self.product_url(id))
            .json(update)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn first_product(&self) -> Result<Option<ProductRecord>> {
        let url = format!("{}/products", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[("size", "1")])
            .send()
            .await?;
        let list = ensure_success(response)?.json::<ProductList>().await?;
        Ok(list.products.into_iter().find(|p| p.id.is_some()))
    }
}

/// Turns a non-2xx status into a network error.
fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HarnessError::Network(status_message(status)))
    }
}

fn status_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url_strips_trailing_slash() {
        let catalog = HttpCatalog::new("http://localhost:8080/api/catalog/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            catalog.product_url("abc"),
            "http://localhost:8080/api/catalog/products/abc"
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message(StatusCode::SERVICE_UNAVAILABLE),
            "HTTP 503: Service Unavailable"
        );
        assert_eq!(status_message(StatusCode::NOT_FOUND), "HTTP 404: Not Found");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_network_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let catalog = HttpCatalog::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = catalog.read_product("p1").await;
        assert!(matches!(result, Err(HarnessError::Network(_))));
    }
}
