pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod source;
pub mod cms;
pub mod lease;
pub mod report;
pub mod orchestrator;
pub mod server;
pub mod cli;

pub use types::*;
pub use traits::{JobFeed, OpeningStore};
pub use fetcher::Fetcher;
pub use parser::JobBoardParser;
pub use source::JobBoardSource;
pub use cms::CmsClient;
pub use lease::{CollectionLease, CollectionLeases};
pub use report::{AddOutcome, PassOptions, RemovalOutcome, SyncReport, SyncResponseBody};
pub use orchestrator::SyncOrchestrator;
pub use server::{build_router, AppState, Server};
