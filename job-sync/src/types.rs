use std::fmt;

// Shared records live in the interfaces crate
pub use interfaces::defs::{CreationPayload, JobRecord, JobType, OpeningFields, OpeningItem};
pub use interfaces::reconcile::{CreationPlan, Reconciliation};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_page_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Job-Sync/1.0".to_string(),
            timeout_seconds: 30,
            max_page_size_mb: 5,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

/// CSS selectors used to pull postings out of the job board page.
///
/// The defaults match a Lever-style board: one `.posting` block per opening with
/// the categories rendered as `sort-by-*` spans.
#[derive(Debug, Clone)]
pub struct BoardSelectors {
    pub posting: String,
    pub title: String,
    pub link: String,
    pub department: String,
    pub location: String,
    pub commitment: String,
    pub comp: String,
    /// Present only when the board genuinely has no openings.
    pub empty_board: String,
}

impl Default for BoardSelectors {
    fn default() -> Self {
        Self {
            posting: ".posting".to_string(),
            title: ".posting-title h5, h5".to_string(),
            link: "a.posting-title".to_string(),
            department: ".sort-by-team".to_string(),
            location: ".sort-by-location".to_string(),
            commitment: ".sort-by-commitment".to_string(),
            comp: ".posting-salary".to_string(),
            empty_board: ".postings-empty, [data-qa='no-postings']".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub api_base: String,
    pub api_token: String,
    pub collection_id: String,
    pub locale_id: String,
    pub page_size: usize,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.webflow.com/v2".to_string(),
            api_token: String::new(),
            collection_id: String::new(),
            locale_id: String::new(),
            page_size: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub board_url: String,
    pub selectors: BoardSelectors,
    pub fetch: FetchConfig,
    pub cms: CmsConfig,
    /// Allow a pass to delete every opening when the board comes back empty.
    pub allow_full_teardown: bool,
    pub cache_max_age_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            board_url: String::new(),
            selectors: BoardSelectors::default(),
            fetch: FetchConfig::default(),
            cms: CmsConfig::default(),
            allow_full_teardown: false,
            cache_max_age_secs: 600,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        let board = url::Url::parse(&self.board_url)?;
        if board.scheme() != "http" && board.scheme() != "https" {
            return Err(SyncError::Config(format!("board URL must be http(s): {}", self.board_url)));
        }
        url::Url::parse(&self.cms.api_base)?;
        if self.cms.api_token.trim().is_empty() {
            return Err(SyncError::Config("CMS API token is not set".to_string()));
        }
        if self.cms.collection_id.trim().is_empty() {
            return Err(SyncError::Config("CMS collection id is not set".to_string()));
        }
        if self.cms.locale_id.trim().is_empty() {
            return Err(SyncError::Config("CMS locale id is not set".to_string()));
        }
        if self.cms.page_size == 0 {
            return Err(SyncError::Config("CMS page size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Which half of the fetch phase failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSide {
    JobBoard,
    Collection,
}

impl fmt::Display for FetchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchSide::JobBoard => write!(f, "job board"),
            FetchSide::Collection => write!(f, "openings collection"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch {side}: {source}")]
    Fetch {
        side: FetchSide,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Job board parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("CMS returned {status}: {message}")]
    Store { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Refusing to remove all {openings} openings: no job board posting matches any of them")]
    TeardownRefused { openings: usize },

    #[error("A sync pass is already running for collection {collection_id}")]
    PassInProgress { collection_id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

impl SyncError {
    pub fn fetch(side: FetchSide, source: SyncError) -> Self {
        SyncError::Fetch { side, source: Box::new(source) }
    }

    /// Stable machine-readable name, used in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Http(_) => "http",
            SyncError::Fetch { .. } => "fetch_failed",
            SyncError::Parse(_) => "parse",
            SyncError::InvalidUrl(_) => "invalid_url",
            SyncError::Store { .. } => "store",
            SyncError::Serialization(_) => "serialization",
            SyncError::TeardownRefused { .. } => "teardown_refused",
            SyncError::PassInProgress { .. } => "pass_in_progress",
            SyncError::Config(_) => "config",
            SyncError::General(_) => "general",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
