// src/config.rs
use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_OUTPUT_DIR, DEFAULT_REVIEW_DIR, DOCS_BASE_URL_ENV,
    MAX_PAGE_CONCURRENCY, NOTION_DOCS_BASE_URL,
};
use crate::error::AppError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Directory receiving the generated Rust sources
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Directory receiving scaffolds for documentation that outgrew its local copy
    #[arg(short, long, default_value = DEFAULT_REVIEW_DIR)]
    pub review_dir: String,

    /// Number of pages translated concurrently (default: number of CPUs, max 32)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Seconds before a documentation fetch is abandoned
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Translate only these pages (e.g. "user", "property_value"); all pages when omitted
    #[arg(long = "page", value_name = "PAGE")]
    pub pages: Vec<String>,
}

/// Resolved generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub docs_base_url: String,
    pub output_dir: PathBuf,
    pub review_dir: PathBuf,
    pub concurrency: usize,
    pub timeout: Duration,
    pub verbose: bool,
    /// Empty means every page.
    pub pages: Vec<String>,
}

impl GeneratorConfig {
    /// Resolves the configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_base_url(cli, std::env::var(DOCS_BASE_URL_ENV).ok())
    }

    /// [`resolve`](Self::resolve) with the base URL override passed in.
    pub fn resolve_with_base_url(
        cli: CommandLineInput,
        base_url_override: Option<String>,
    ) -> Result<Self, AppError> {
        let docs_base_url = match base_url_override {
            Some(raw) => validate_base_url(&raw)?,
            None => NOTION_DOCS_BASE_URL.to_string(),
        };
        if cli.timeout == 0 {
            return Err(AppError::MissingConfiguration(
                "--timeout must be at least one second".to_string(),
            ));
        }

        Ok(GeneratorConfig {
            docs_base_url,
            output_dir: PathBuf::from(cli.output_dir),
            review_dir: PathBuf::from(cli.review_dir),
            concurrency: clamp_concurrency(cli.concurrency),
            timeout: Duration::from_secs(cli.timeout),
            verbose: cli.verbose,
            pages: cli.pages,
        })
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            docs_base_url: NOTION_DOCS_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            review_dir: PathBuf::from(DEFAULT_REVIEW_DIR),
            concurrency: clamp_concurrency(None),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            verbose: false,
            pages: Vec::new(),
        }
    }
}

fn clamp_concurrency(requested: Option<usize>) -> usize {
    requested
        .unwrap_or_else(num_cpus::get)
        .clamp(1, MAX_PAGE_CONCURRENCY)
}

/// Parses the override and makes sure page paths can be appended to it.
fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| {
        AppError::MissingConfiguration(format!("{} is not a valid URL ({}): {}", DOCS_BASE_URL_ENV, e, raw))
    })?;
    let mut base = parsed.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["notion2code"];
        argv.extend_from_slice(args);
        CommandLineInput::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::resolve_with_base_url(cli(&[]), None).unwrap();
        assert_eq!(config.docs_base_url, NOTION_DOCS_BASE_URL);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.review_dir, PathBuf::from(DEFAULT_REVIEW_DIR));
        assert!(config.concurrency >= 1 && config.concurrency <= MAX_PAGE_CONCURRENCY);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let low = GeneratorConfig::resolve_with_base_url(cli(&["--concurrency", "0"]), None).unwrap();
        assert_eq!(low.concurrency, 1);
        let high = GeneratorConfig::resolve_with_base_url(cli(&["--concurrency", "500"]), None).unwrap();
        assert_eq!(high.concurrency, MAX_PAGE_CONCURRENCY);
    }

    #[test]
    fn test_base_url_override_gains_trailing_slash() {
        let config = GeneratorConfig::resolve_with_base_url(
            cli(&[]),
            Some("http://localhost:8080/reference".to_string()),
        )
        .unwrap();
        assert_eq!(config.docs_base_url, "http://localhost:8080/reference/");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = GeneratorConfig::resolve_with_base_url(cli(&[]), Some("not a url".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[test]
    fn test_page_filter_and_zero_timeout() {
        let config = GeneratorConfig::resolve_with_base_url(
            cli(&["--page", "user", "--page", "emoji"]),
            None,
        )
        .unwrap();
        assert_eq!(config.pages, vec!["user".to_string(), "emoji".to_string()]);

        let err = GeneratorConfig::resolve_with_base_url(cli(&["--timeout", "0"]), None).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }
}
