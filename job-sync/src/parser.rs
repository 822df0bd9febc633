use crate::types::{BoardSelectors, JobRecord, JobType, Result, SyncError};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

struct CompiledSelectors {
    posting: Selector,
    title: Selector,
    link: Selector,
    department: Selector,
    location: Selector,
    commitment: Selector,
    comp: Selector,
    empty_board: Selector,
}

pub struct JobBoardParser {
    selectors: CompiledSelectors,
}

impl JobBoardParser {
    pub fn new(selectors: &BoardSelectors) -> Result<Self> {
        Ok(Self {
            selectors: CompiledSelectors {
                posting: compile(&selectors.posting)?,
                title: compile(&selectors.title)?,
                link: compile(&selectors.link)?,
                department: compile(&selectors.department)?,
                location: compile(&selectors.location)?,
                commitment: compile(&selectors.commitment)?,
                comp: compile(&selectors.comp)?,
                empty_board: compile(&selectors.empty_board)?,
            },
        })
    }

    /// Extracts every posting on the page. A page with no postings is only
    /// accepted when it carries the board's "no openings" marker; anything else
    /// is treated as a broken page rather than an empty board.
    pub fn parse_board(&self, html: &str, board_url: &Url) -> Result<Vec<JobRecord>> {
        debug!("Parsing job board content ({} bytes)", html.len());
        let document = Html::parse_document(html);

        let jobs: Vec<JobRecord> = document
            .select(&self.selectors.posting)
            .map(|posting| self.parse_posting(posting, board_url))
            .collect();

        if jobs.is_empty() {
            if document.select(&self.selectors.empty_board).next().is_some() {
                info!("Job board reports no open postings");
                return Ok(jobs);
            }
            return Err(SyncError::Parse(format!(
                "no postings found on {} and no empty-board marker present",
                board_url
            )));
        }

        let missing_slugs = jobs.iter().filter(|job| job.slug.is_none()).count();
        if missing_slugs > 0 {
            warn!("{} postings have no usable link slug", missing_slugs);
        }
        info!("Parsed job board with {} postings", jobs.len());
        Ok(jobs)
    }

    fn parse_posting(&self, posting: ElementRef<'_>, board_url: &Url) -> JobRecord {
        let link = posting
            .select(&self.selectors.link)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .or_else(|| posting.value().attr("href"))
            .and_then(|href| resolve_link(href, board_url))
            .unwrap_or_default();

        JobRecord {
            title: self.text_of(posting, &self.selectors.title),
            department: self.text_of(posting, &self.selectors.department),
            location: self.text_of(posting, &self.selectors.location),
            comp: self.text_of(posting, &self.selectors.comp),
            job_type: JobType::parse(&self.text_of(posting, &self.selectors.commitment)),
            slug: slug_from_link(&link),
            link,
        }
    }

    fn text_of(&self, posting: ElementRef<'_>, selector: &Selector) -> String {
        posting
            .select(selector)
            .next()
            .map(|element| collapse_whitespace(element.text()))
            .unwrap_or_default()
    }
}

fn compile(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| SyncError::Config(format!("invalid selector {:?}: {:?}", raw, e)))
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_link(href: &str, board_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    board_url.join(href).ok().map(|url| url.to_string())
}

/// Last non-empty path segment of a posting URL, or `None` when the link
/// isn't a usable absolute URL.
pub fn slug_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_last_path_segment() {
        assert_eq!(
            slug_from_link("https://jobs.lever.co/acme/3f1c2a9e-senior-engineer"),
            Some("3f1c2a9e-senior-engineer".to_string())
        );
        assert_eq!(slug_from_link("https://jobs.example.com/acme/eng-1/"), Some("eng-1".to_string()));
        assert_eq!(slug_from_link("https://jobs.example.com/acme/eng-1?lever-source=site"), Some("eng-1".to_string()));
    }

    #[test]
    fn malformed_links_have_no_slug() {
        assert_eq!(slug_from_link(""), None);
        assert_eq!(slug_from_link("not a url"), None);
        assert_eq!(slug_from_link("https://jobs.example.com/"), None);
        assert_eq!(slug_from_link("mailto:jobs@example.com"), None);
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let selectors = BoardSelectors {
            posting: "div[".to_string(),
            ..Default::default()
        };
        assert!(matches!(JobBoardParser::new(&selectors), Err(SyncError::Config(_))));
    }
}
