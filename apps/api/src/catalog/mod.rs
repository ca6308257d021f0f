//! Catalog Gateway: read-only snapshot of in-stock wines and cheeses.
//!
//! Any failure fetching a category degrades to an empty listing for that
//! category; callers never see a catalog error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::models::catalog::{Cheese, Wine};

/// Source of catalog listings. Implementations must swallow their own errors.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn wines(&self) -> Vec<Wine>;
    async fn cheeses(&self) -> Vec<Cheese>;
}

/// Per-request view of the catalog. Re-fetched for every chat call.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub wines: Vec<Wine>,
    pub cheeses: Vec<Cheese>,
}

impl CatalogSnapshot {
    pub fn has_wine(&self, id: &str) -> bool {
        self.wines.iter().any(|w| w.id == id)
    }

    pub fn has_cheese(&self, id: &str) -> bool {
        self.cheeses.iter().any(|c| c.id == id)
    }
}

/// Fetches both categories concurrently. Both must resolve before the prompt
/// can be assembled.
pub async fn fetch_catalog(source: &dyn CatalogSource) -> CatalogSnapshot {
    let (wines, cheeses) = tokio::join!(source.wines(), source.cheeses());
    info!(
        "Catalog snapshot: {} wines, {} cheeses",
        wines.len(),
        cheeses.len()
    );
    CatalogSnapshot { wines, cheeses }
}

/// HTTP catalog collaborator: `GET {base}/catalog/ai/{wines|cheeses}?inStock=true`.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_in_stock<T: DeserializeOwned>(&self, category: &str) -> Vec<T> {
        match self.try_fetch(category).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Catalog fetch for {category} failed, continuing with none: {e}");
                Vec::new()
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(&self, category: &str) -> Result<Vec<T>, reqwest::Error> {
        self.client
            .get(format!("{}/catalog/ai/{category}", self.base_url))
            .query(&[("inStock", "true")])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn wines(&self) -> Vec<Wine> {
        self.fetch_in_stock("wines").await
    }

    async fn cheeses(&self) -> Vec<Cheese> {
        self.fetch_in_stock("cheeses").await
    }
}
