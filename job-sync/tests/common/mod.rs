#![allow(dead_code)]

use async_trait::async_trait;
use job_sync::{
    CreationPayload, JobFeed, JobRecord, JobType, OpeningFields, OpeningItem, OpeningStore, Result,
    SyncConfig, SyncError,
};
use std::collections::HashSet;
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn job(slug: &str) -> JobRecord {
    JobRecord {
        title: format!("Role {}", slug),
        department: "Engineering".to_string(),
        location: "Remote".to_string(),
        link: format!("https://jobs.example.com/acme/{}", slug),
        comp: "$100k".to_string(),
        slug: Some(slug.to_string()),
        job_type: JobType::FullTime,
    }
}

pub fn slugless_job(title: &str) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        link: String::new(),
        slug: None,
        ..Default::default()
    }
}

pub fn opening(id: &str, slug: &str) -> OpeningItem {
    OpeningItem {
        id: id.to_string(),
        field_data: OpeningFields {
            name: format!("Role {}", slug),
            slug: slug.to_string(),
            url: slug.to_string(),
            ..Default::default()
        },
    }
}

pub fn test_config() -> SyncConfig {
    let mut config = SyncConfig {
        board_url: "https://jobs.example.com/acme".to_string(),
        ..Default::default()
    };
    config.cms.api_token = "token".to_string();
    config.cms.collection_id = "openings".to_string();
    config.cms.locale_id = "locale-en".to_string();
    config
}

pub struct FakeFeed {
    jobs: Vec<JobRecord>,
    fail: bool,
}

impl FakeFeed {
    pub fn with_jobs(jobs: Vec<JobRecord>) -> Self {
        Self { jobs, fail: false }
    }

    pub fn failing() -> Self {
        Self { jobs: Vec::new(), fail: true }
    }
}

#[async_trait]
impl JobFeed for FakeFeed {
    fn source_name(&self) -> String {
        "Fake board".to_string()
    }

    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>> {
        if self.fail {
            return Err(SyncError::General("HTTP 503: Service Unavailable".to_string()));
        }
        Ok(self.jobs.clone())
    }
}

/// In-memory collection that records every write it receives.
#[derive(Default)]
pub struct FakeStore {
    pub items: Mutex<Vec<OpeningItem>>,
    pub create_calls: Mutex<Vec<Vec<CreationPayload>>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub fail_list: bool,
    pub fail_create: bool,
    pub fail_deletes: HashSet<String>,
}

impl FakeStore {
    pub fn with_items(items: Vec<OpeningItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.items.lock().unwrap().iter().map(|item| item.field_data.slug.clone()).collect();
        slugs.sort();
        slugs
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl OpeningStore for FakeStore {
    fn collection_id(&self) -> &str {
        "openings"
    }

    async fn list_live_items(&self) -> Result<Vec<OpeningItem>> {
        if self.fail_list {
            return Err(SyncError::Store { status: 401, message: "invalid token".to_string() });
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn create_live_items(&self, payloads: &[CreationPayload]) -> Result<Vec<OpeningItem>> {
        self.create_calls.lock().unwrap().push(payloads.to_vec());
        if self.fail_create {
            return Err(SyncError::Store { status: 400, message: "validation failed".to_string() });
        }
        let created: Vec<OpeningItem> = payloads
            .iter()
            .map(|payload| OpeningItem {
                id: format!("item-{}", payload.id),
                field_data: payload.field_data.clone(),
            })
            .collect();
        self.items.lock().unwrap().extend(created.clone());
        Ok(created)
    }

    async fn delete_live_item(&self, item_id: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(item_id.to_string());
        if self.fail_deletes.contains(item_id) {
            return Err(SyncError::Store { status: 404, message: "item not found".to_string() });
        }
        self.items.lock().unwrap().retain(|item| item.id != item_id);
        Ok(())
    }
}
