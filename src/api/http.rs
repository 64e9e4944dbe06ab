//! HTTP implementation of [`ProductApi`] on top of `reqwest`.

use super::{ApiError, ApiResult, ProductApi};
use crate::config::InventoryConfig;
use crate::model::{Product, ProductCreate, ProductId, StockPatch};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

const COLLECTION: &str = "api/products";

/// Client for the product collection of a REST backend.
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    base_url: String,
}

impl HttpProductApi {
    pub fn new(config: &InventoryConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, COLLECTION)
    }

    fn item_url(&self, id: &ProductId) -> String {
        format!("{}/{}/{}", self.base_url, COLLECTION, id)
    }

    /// Returns the body text of a 2xx response, or the status as an error.
    async fn success_body(response: reqwest::Response) -> ApiResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let body = Self::success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update endpoints may answer with the product, with any other JSON acknowledgement,
    /// or with nothing at all. Only a body that is not JSON counts as malformed.
    async fn optional_product(response: reqwest::Response) -> ApiResult<Option<Product>> {
        let body = Self::success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("_id").is_some() {
            Ok(Some(serde_json::from_value(value)?))
        } else {
            Ok(None)
        }
    }

    async fn put<B: Serialize + Sync + ?Sized>(
        &self,
        id: &ProductId,
        body: &B,
    ) -> ApiResult<Option<Product>> {
        let response = self.client.put(self.item_url(id)).json(body).send().await?;
        Self::optional_product(response).await
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    #[instrument(skip(self))]
    async fn list(&self) -> ApiResult<Vec<Product>> {
        debug!("Sending request");
        let response = self.client.get(self.collection_url()).send().await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn create(&self, product: ProductCreate) -> ApiResult<Product> {
        debug!("Sending request");
        let response = self
            .client
            .post(self.collection_url())
            .json(&product)
            .send()
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn update_stock(&self, id: ProductId, patch: StockPatch) -> ApiResult<Option<Product>> {
        debug!("Sending request");
        self.put(&id, &patch).await
    }

    #[instrument(skip(self), fields(id = %product.id))]
    async fn update(&self, product: Product) -> ApiResult<Option<Product>> {
        debug!("Sending request");
        self.put(&product.id, &product).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> ApiResult<Option<String>> {
        debug!("Sending request");
        let response = self.client.delete(self.item_url(&id)).send().await?;
        let body = Self::success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(value
            .get("message")
            .and_then(|message| message.as_str())
            .map(str::to_string))
    }
}
