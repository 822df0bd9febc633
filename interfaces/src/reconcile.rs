use std::collections::HashSet;

use serde::Serialize;

use crate::defs::CreationPayload;
use crate::defs::JobRecord;
use crate::defs::OpeningFields;
use crate::defs::OpeningItem;

/// One-way diff between the job board and the openings collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub new_jobs: Vec<JobRecord>,
    pub jobs_to_remove: Vec<OpeningItem>,
    #[serde(skip)]
    pub matched_count: usize,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.new_jobs.is_empty() && self.jobs_to_remove.is_empty()
    }
}

/// Splits `jobs` and `openings` by slug. Both outputs keep the relative order of
/// their inputs. A job without a slug never matches anything.
pub fn reconcile(jobs: &[JobRecord], openings: &[OpeningItem]) -> Reconciliation {
    let opening_slugs: HashSet<&str> = openings.iter().map(|opening| opening.field_data.slug.as_str()).collect();
    let job_slugs: HashSet<&str> = jobs.iter().filter_map(|job| job.slug.as_deref()).collect();

    let new_jobs: Vec<JobRecord> = jobs
        .iter()
        .filter(|job| !job.slug.as_deref().is_some_and(|slug| opening_slugs.contains(slug)))
        .cloned()
        .collect();
    let jobs_to_remove: Vec<OpeningItem> = openings
        .iter()
        .filter(|opening| !job_slugs.contains(opening.field_data.slug.as_str()))
        .cloned()
        .collect();

    Reconciliation {
        matched_count: jobs.len() - new_jobs.len(),
        new_jobs,
        jobs_to_remove,
    }
}

/// Shapes the create body for one job. `url` deliberately carries the slug: the
/// site's own detail page is addressed by slug, not by the board's link.
pub fn creation_payload(job: &JobRecord, locale_id: &str) -> Option<CreationPayload> {
    let slug = job.slug.clone()?;
    Some(CreationPayload {
        id: slug.clone(),
        locale_id: locale_id.to_owned(),
        field_data: OpeningFields {
            name: job.title.clone(),
            slug: slug.clone(),
            location: job.location.clone(),
            job_type: job.job_type,
            url: slug,
            comp: job.comp.clone(),
        },
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreationPlan {
    pub payloads: Vec<CreationPayload>,
    /// New jobs without a slug; they can't be addressed in the store.
    pub rejected: Vec<JobRecord>,
    /// Later occurrences of a slug already planned for creation.
    pub duplicates: Vec<JobRecord>,
}

impl CreationPlan {
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Turns reconciled new jobs into create payloads, dropping slug-less jobs and
/// keeping only the first job for each slug.
pub fn plan_creations(new_jobs: &[JobRecord], locale_id: &str) -> CreationPlan {
    let mut plan = CreationPlan::default();
    let mut planned: HashSet<String> = HashSet::new();
    for job in new_jobs {
        let Some(payload) = creation_payload(job, locale_id) else {
            plan.rejected.push(job.clone());
            continue;
        };
        if !planned.insert(payload.id.clone()) {
            plan.duplicates.push(job.clone());
            continue;
        }
        plan.payloads.push(payload);
    }
    plan
}
