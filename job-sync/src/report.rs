use crate::types::{JobRecord, OpeningItem};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Per-pass switches supplied by whoever triggers the pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// Reconcile and plan, but don't write to the store.
    pub dry_run: bool,
    /// Allow deleting every opening when the board has no postings.
    pub confirm_teardown: bool,
}

#[derive(Debug, Clone, Default)]
pub enum AddOutcome {
    /// Nothing to create, no call was made.
    #[default]
    Skipped,
    Created(Vec<OpeningItem>),
    Failed { attempted: usize, error: String },
}

impl AddOutcome {
    pub fn created_items(&self) -> &[OpeningItem] {
        match self {
            AddOutcome::Created(items) => items,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RemovalOutcome {
    #[serde(rename_all = "camelCase")]
    Removed { item_id: String, slug: String },
    #[serde(rename_all = "camelCase")]
    Failed { item_id: String, slug: String, error: String },
}

impl RemovalOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub pass_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub new_jobs: Vec<JobRecord>,
    pub jobs_to_remove: Vec<OpeningItem>,
    pub added: AddOutcome,
    pub removed: Vec<RemovalOutcome>,
    pub rejected: Vec<JobRecord>,
    pub duplicates: Vec<JobRecord>,
}

impl SyncReport {
    /// True when every write the pass attempted went through.
    pub fn is_complete(&self) -> bool {
        !matches!(self.added, AddOutcome::Failed { .. }) && self.removed.iter().all(RemovalOutcome::is_removed)
    }

    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let AddOutcome::Failed { attempted, error } = &self.added {
            errors.push(format!("creating {} openings failed: {}", attempted, error));
        }
        for outcome in &self.removed {
            if let RemovalOutcome::Failed { item_id, slug, error } = outcome {
                errors.push(format!("removing opening {} ({}) failed: {}", item_id, slug, error));
            }
        }
        errors
    }

    pub fn removed_count(&self) -> usize {
        self.removed.iter().filter(|outcome| outcome.is_removed()).count()
    }

    pub fn body(&self) -> SyncResponseBody {
        SyncResponseBody {
            pass_id: self.pass_id,
            started_at: self.started_at,
            finished_at: self.finished_at,
            dry_run: self.dry_run,
            new_jobs: self.new_jobs.clone(),
            jobs_to_remove: self.jobs_to_remove.clone(),
            added_jobs_output: self.added.created_items().to_vec(),
            removed_jobs_output: self.removed.clone(),
            rejected_jobs: self.rejected.clone(),
            duplicate_jobs: self.duplicates.clone(),
        }
    }
}

/// The `body` member of the sync endpoint's JSON response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseBody {
    pub pass_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub new_jobs: Vec<JobRecord>,
    pub jobs_to_remove: Vec<OpeningItem>,
    pub added_jobs_output: Vec<OpeningItem>,
    pub removed_jobs_output: Vec<RemovalOutcome>,
    pub rejected_jobs: Vec<JobRecord>,
    pub duplicate_jobs: Vec<JobRecord>,
}
