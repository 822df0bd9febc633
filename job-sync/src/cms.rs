//! Client for the CMS collection-items API.
//!
//! Only the live-item endpoints are used: openings are created already
//! published and deleted straight from the live site.

use crate::traits::OpeningStore;
use crate::types::{CmsConfig, CreationPayload, FetchConfig, OpeningItem, Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ListItemsResponse {
    #[serde(default)]
    items: Vec<OpeningItem>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CreateItemsRequest<'a> {
    items: &'a [CreationPayload],
}

#[derive(Debug, Deserialize)]
struct CreateItemsResponse {
    #[serde(default)]
    items: Vec<OpeningItem>,
}

pub struct CmsClient {
    client: Client,
    config: CmsConfig,
}

impl CmsClient {
    pub fn new(config: CmsConfig, fetch_config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&fetch_config.user_agent)
            .timeout(Duration::from_secs(fetch_config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn items_url(&self) -> String {
        format!(
            "{}/collections/{}/items",
            self.config.api_base.trim_end_matches('/'),
            self.config.collection_id
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.api_token)
            .header("accept", "application/json")
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    let message = if message.trim().is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        message
    };
    Err(SyncError::Store { status: status.as_u16(), message })
}

#[async_trait]
impl OpeningStore for CmsClient {
    fn collection_id(&self) -> &str {
        &self.config.collection_id
    }

    async fn list_live_items(&self) -> Result<Vec<OpeningItem>> {
        let url = format!("{}/live", self.items_url());
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            debug!("Listing live items at offset {}", offset);
            let request = self
                .client
                .get(&url)
                .query(&[("offset", offset), ("limit", self.config.page_size)]);
            let response = check_status(self.authorized(request).send().await?).await?;
            let page: ListItemsResponse = response.json().await?;

            let page_len = page.items.len();
            items.extend(page.items);
            offset += page_len;

            let total = page.pagination.and_then(|p| p.total);
            let exhausted = match total {
                Some(total) => offset >= total,
                None => page_len < self.config.page_size,
            };
            if page_len == 0 || exhausted {
                break;
            }
        }

        info!("Listed {} live items in collection {}", items.len(), self.config.collection_id);
        Ok(items)
    }

    async fn create_live_items(&self, items: &[CreationPayload]) -> Result<Vec<OpeningItem>> {
        let url = format!("{}/live", self.items_url());
        let request = self.client.post(&url).json(&CreateItemsRequest { items });
        let response = check_status(self.authorized(request).send().await?).await?;
        let created: CreateItemsResponse = response.json().await?;

        if created.items.len() != items.len() {
            warn!("Requested {} live items, CMS reported {} created", items.len(), created.items.len());
        }
        info!("Created {} live items in collection {}", created.items.len(), self.config.collection_id);
        Ok(created.items)
    }

    async fn delete_live_item(&self, item_id: &str) -> Result<()> {
        let url = format!("{}/{}/live", self.items_url(), item_id);
        let request = self.client.delete(&url);
        check_status(self.authorized(request).send().await?).await?;
        debug!("Deleted live item {}", item_id);
        Ok(())
    }
}
