pub mod defs;
pub mod reconcile;

pub use defs::{CreationPayload, JobRecord, JobType, OpeningFields, OpeningItem};
pub use reconcile::{creation_payload, plan_creations, reconcile, CreationPlan, Reconciliation};
