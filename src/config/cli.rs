use crate::adapters::fixture::DEFAULT_FIXTURE_COUNT;
use crate::adapters::settings::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::config::TomlConfig;
use crate::core::{ConfigProvider, OlympiadFilter, SourceKind};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Parser)]
#[command(name = "olympiad-catalog")]
#[command(about = "Browse, filter and search the olympiad catalog")]
pub struct CliConfig {
    /// Path to a TOML configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data source: http or fixture
    #[arg(long)]
    pub source: Option<SourceKind>,

    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Number of generated olympiads for the fixture source
    #[arg(long)]
    pub fixture_count: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List one page of olympiads
    List(ListArgs),
    /// Show a single olympiad
    Show { id: i64 },
    /// List the subjects present in the catalog
    Subjects,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Falls back to the page size preference when omitted
    #[arg(long)]
    pub page_size: Option<usize>,

    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(long = "grade")]
    pub grades: Vec<u32>,

    #[arg(long = "subject")]
    pub subjects: Vec<i64>,
}

impl ListArgs {
    pub fn filter(&self) -> OlympiadFilter {
        OlympiadFilter {
            query: self.query.clone(),
            grades: self.grades.clone(),
            subject_ids: self.subjects.clone(),
        }
    }
}

impl CliConfig {
    /// 將命令列設定覆蓋到 TOML 配置上
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(source) = self.source {
            tracing::info!("🔧 Source overridden to: {}", source);
            config.source.r#type = source.to_string();
        }
        if let Some(endpoint) = &self.api_endpoint {
            tracing::info!("🔧 Endpoint overridden to: {}", endpoint);
            config.source.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.source.timeout_seconds = Some(timeout);
        }
        if let Some(count) = self.fixture_count {
            config
                .fixture
                .get_or_insert(crate::config::toml_config::FixtureConfig { count: None })
                .count = Some(count);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn source_kind(&self) -> SourceKind {
        self.source.unwrap_or(SourceKind::Fixture)
    }

    fn api_endpoint(&self) -> &str {
        self.api_endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn fixture_count(&self) -> usize {
        self.fixture_count.unwrap_or(DEFAULT_FIXTURE_COUNT)
    }

    fn default_page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.source_kind() == SourceKind::Http {
            validation::validate_url("api_endpoint", self.api_endpoint())?;
        }
        validation::validate_positive_number("fixture_count", self.fixture_count(), 1)?;
        validation::validate_range("timeout_seconds", self.request_timeout_seconds(), 1, 300)?;

        if let Command::List(args) = &self.command {
            validation::validate_positive_number("page", args.page, 1)?;
            if let Some(page_size) = args.page_size {
                validation::validate_range("page_size", page_size, 1, MAX_PAGE_SIZE)?;
            }
        }
        Ok(())
    }
}
