use crate::fetcher::Fetcher;
use crate::parser::JobBoardParser;
use crate::traits::JobFeed;
use crate::types::{BoardSelectors, FetchConfig, JobRecord, Result};
use async_trait::async_trait;
use tracing::info;
use url::Url;

/// Scrapes a public job board page into `JobRecord`s.
pub struct JobBoardSource {
    url: Url,
    fetcher: Fetcher,
    parser: JobBoardParser,
}

impl JobBoardSource {
    pub fn new(url: &str, fetch_config: FetchConfig, selectors: &BoardSelectors) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            fetcher: Fetcher::new(fetch_config)?,
            parser: JobBoardParser::new(selectors)?,
        })
    }
}

#[async_trait]
impl JobFeed for JobBoardSource {
    fn source_name(&self) -> String {
        match self.url.domain() {
            Some(domain) => format!("Job board ({})", domain),
            None => "Job board".to_string(),
        }
    }

    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>> {
        info!("Pulling job board: {}", self.url);
        let page = self.fetcher.fetch_page(self.url.as_str()).await?;
        let jobs = self.parser.parse_board(&page.body, &self.url)?;
        info!("Pulled {} postings from {}", jobs.len(), self.url);
        Ok(jobs)
    }
}
