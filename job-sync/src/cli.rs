use crate::types::{BoardSelectors, CmsConfig, FetchConfig, SyncConfig};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Debug, Parser)]
#[command(name = "job-sync", version, about = "Sync job board postings into a CMS collection")]
pub struct Cli {
    #[command(flatten)]
    pub sync: SyncArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the sync endpoint over HTTP
    Serve {
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
        listen: SocketAddr,
    },
    /// Run a single pass and print the report as JSON
    Once {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        confirm_teardown: bool,
    },
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Public job board page to scrape
    #[arg(long, env = "JOB_BOARD_URL")]
    pub board_url: String,

    #[arg(long, env = "CMS_API_TOKEN", hide_env_values = true)]
    pub cms_token: String,

    #[arg(long, env = "CMS_COLLECTION_ID")]
    pub collection_id: String,

    #[arg(long, env = "CMS_LOCALE_ID")]
    pub locale_id: String,

    #[arg(long, env = "CMS_API_BASE", default_value = "https://api.webflow.com/v2")]
    pub cms_api_base: String,

    #[arg(long, env = "SYNC_CACHE_MAX_AGE", default_value_t = 600)]
    pub cache_max_age: u64,

    /// Let a pass remove every opening when the board has none
    #[arg(long, env = "SYNC_ALLOW_FULL_TEARDOWN")]
    pub allow_full_teardown: bool,

    #[arg(long, env = "FETCH_TIMEOUT_SECONDS", default_value_t = 30)]
    pub timeout_seconds: u64,

    #[arg(long, env = "FETCH_USER_AGENT", default_value = "Job-Sync/1.0")]
    pub user_agent: String,
}

impl SyncArgs {
    pub fn into_config(self) -> SyncConfig {
        SyncConfig {
            board_url: self.board_url,
            selectors: BoardSelectors::default(),
            fetch: FetchConfig {
                user_agent: self.user_agent,
                timeout_seconds: self.timeout_seconds,
                ..FetchConfig::default()
            },
            cms: CmsConfig {
                api_base: self.cms_api_base,
                api_token: self.cms_token,
                collection_id: self.collection_id,
                locale_id: self.locale_id,
                ..CmsConfig::default()
            },
            allow_full_teardown: self.allow_full_teardown,
            cache_max_age_secs: self.cache_max_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_command_builds_config() {
        let cli = Cli::try_parse_from([
            "job-sync",
            "--board-url",
            "https://jobs.lever.co/acme",
            "--cms-token",
            "secret",
            "--collection-id",
            "col-1",
            "--locale-id",
            "loc-1",
            "once",
            "--dry-run",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Once { dry_run: true, confirm_teardown: false }));
        let config = cli.sync.into_config();
        assert_eq!(config.cache_max_age_secs, 600);
        assert_eq!(config.cms.page_size, 100);
        assert!(!config.allow_full_teardown);
        assert!(config.validate().is_ok());
    }
}
