use crate::types::{CreationPayload, JobRecord, OpeningItem, Result};
use async_trait::async_trait;

/// Source side of a pass: the job board.
#[async_trait]
pub trait JobFeed: Send + Sync {
    /// Human-readable name for logs
    fn source_name(&self) -> String;

    /// Fetch and normalize every posting currently on the board.
    /// Must fail rather than return an empty list when the board can't be read.
    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>>;
}

/// Target side of a pass: one collection in the CMS.
#[async_trait]
pub trait OpeningStore: Send + Sync {
    fn collection_id(&self) -> &str;

    /// Every live item in the collection
    async fn list_live_items(&self) -> Result<Vec<OpeningItem>>;

    /// Create and publish items in one batched call, returning what the store created
    async fn create_live_items(&self, items: &[CreationPayload]) -> Result<Vec<OpeningItem>>;

    /// Unpublish and delete a single live item
    async fn delete_live_item(&self, item_id: &str) -> Result<()>;
}
