use crate::cms::CmsClient;
use crate::lease::CollectionLeases;
use crate::report::{AddOutcome, PassOptions, RemovalOutcome, SyncReport};
use crate::source::JobBoardSource;
use crate::traits::{JobFeed, OpeningStore};
use crate::types::{CreationPayload, FetchSide, OpeningItem, Result, SyncConfig, SyncError};
use chrono::Utc;
use futures::future::join_all;
use interfaces::reconcile::{plan_creations, reconcile};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Drives sync passes from the job board into one openings collection.
pub struct SyncOrchestrator {
    config: SyncConfig,
    feed: Arc<dyn JobFeed>,
    store: Arc<dyn OpeningStore>,
    leases: CollectionLeases,
}

impl SyncOrchestrator {
    pub fn new(config: SyncConfig, feed: Arc<dyn JobFeed>, store: Arc<dyn OpeningStore>) -> Self {
        Self {
            config,
            feed,
            store,
            leases: CollectionLeases::new(),
        }
    }

    /// Wires the scraping source and the CMS client from configuration.
    pub fn from_config(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        let feed = JobBoardSource::new(&config.board_url, config.fetch.clone(), &config.selectors)?;
        let store = CmsClient::new(config.cms.clone(), &config.fetch)?;
        Ok(Self::new(config, Arc::new(feed), Arc::new(store)))
    }

    /// Share lease bookkeeping with other orchestrators in the process.
    pub fn with_leases(mut self, leases: CollectionLeases) -> Self {
        self.leases = leases;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub async fn run_pass(&self, options: PassOptions) -> Result<SyncReport> {
        let _lease = self.leases.try_acquire(self.store.collection_id())?;
        let pass_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Starting sync pass {} from {} into collection {}",
            pass_id,
            self.feed.source_name(),
            self.store.collection_id()
        );

        let (jobs, openings) = tokio::try_join!(
            async {
                self.feed
                    .fetch_jobs()
                    .await
                    .map_err(|e| SyncError::fetch(FetchSide::JobBoard, e))
            },
            async {
                self.store
                    .list_live_items()
                    .await
                    .map_err(|e| SyncError::fetch(FetchSide::Collection, e))
            },
        )?;

        let diff = reconcile(&jobs, &openings);
        info!(
            "Pass {}: {} postings, {} openings, {} matched, {} new, {} stale",
            pass_id,
            jobs.len(),
            openings.len(),
            diff.matched_count,
            diff.new_jobs.len(),
            diff.jobs_to_remove.len()
        );

        let removes_everything = !openings.is_empty() && diff.jobs_to_remove.len() == openings.len();
        if removes_everything && !self.config.allow_full_teardown && !options.confirm_teardown {
            warn!(
                "Pass {}: no posting on the board matches any opening, refusing to remove all {}",
                pass_id,
                openings.len()
            );
            return Err(SyncError::TeardownRefused { openings: openings.len() });
        }

        let plan = plan_creations(&diff.new_jobs, &self.config.cms.locale_id);
        for job in &plan.rejected {
            warn!("Pass {}: skipping posting {:?} without a slug ({})", pass_id, job.title, job.link);
        }
        for job in &plan.duplicates {
            warn!("Pass {}: skipping duplicate slug {:?} for {:?}", pass_id, job.slug, job.title);
        }

        let (added, removed) = if options.dry_run {
            info!("Pass {}: dry run, no changes applied", pass_id);
            (AddOutcome::Skipped, Vec::new())
        } else {
            let added = self.apply_additions(&plan.payloads).await;
            let removed = self.apply_removals(&diff.jobs_to_remove).await;
            (added, removed)
        };

        let report = SyncReport {
            pass_id,
            started_at,
            finished_at: Utc::now(),
            dry_run: options.dry_run,
            new_jobs: diff.new_jobs,
            jobs_to_remove: diff.jobs_to_remove,
            added,
            removed,
            rejected: plan.rejected,
            duplicates: plan.duplicates,
        };

        if report.is_complete() {
            info!(
                "Pass {} complete: {} added, {} removed",
                pass_id,
                report.added.created_items().len(),
                report.removed_count()
            );
        } else {
            error!("Pass {} finished with errors: {:?}", pass_id, report.errors());
        }
        Ok(report)
    }

    async fn apply_additions(&self, payloads: &[CreationPayload]) -> AddOutcome {
        if payloads.is_empty() {
            debug!("No openings to create");
            return AddOutcome::Skipped;
        }
        match self.store.create_live_items(payloads).await {
            Ok(items) => AddOutcome::Created(items),
            Err(e) => {
                error!("Failed to create {} openings: {}", payloads.len(), e);
                AddOutcome::Failed {
                    attempted: payloads.len(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// One delete per opening, all in flight at once. Every attempt is reported,
    /// successes are never discarded because a sibling failed.
    async fn apply_removals(&self, openings: &[OpeningItem]) -> Vec<RemovalOutcome> {
        if openings.is_empty() {
            debug!("No openings to remove");
            return Vec::new();
        }
        let deletes = openings.iter().map(|opening| async move {
            let item_id = opening.id.clone();
            let slug = opening.field_data.slug.clone();
            match self.store.delete_live_item(&opening.id).await {
                Ok(()) => RemovalOutcome::Removed { item_id, slug },
                Err(e) => {
                    error!("Failed to remove opening {} ({}): {}", item_id, slug, e);
                    RemovalOutcome::Failed {
                        item_id,
                        slug,
                        error: e.to_string(),
                    }
                }
            }
        });
        join_all(deletes).await
    }
}
