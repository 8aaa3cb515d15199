// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2code::output::DeliveryTarget;
use notion2code::{pages, pipeline, AppError, CommandLineInput, GeneratorConfig, HttpSource};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2code.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("opening log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config).context("installing the logger")?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Translates every selected page and writes the generated model.
async fn execute(config: &GeneratorConfig) -> Result<(), AppError> {
    let copies = pages::select(&config.pages);
    if copies.is_empty() {
        return Err(AppError::MissingConfiguration(format!(
            "no translated page matches {:?}",
            config.pages
        )));
    }

    let source = Arc::new(HttpSource::new(&config.docs_base_url, config.timeout)?);
    let summary = pipeline::run(config, source, copies).await?;

    println!(
        "✓ Translated {} page(s) into {} symbol(s).",
        summary.pages, summary.symbols
    );
    for completed in &summary.report.completed {
        match &completed.operation {
            DeliveryTarget::WriteFile { path, .. } => println!("  wrote {}", path.display()),
            DeliveryTarget::RemoveFile { path } => println!("  removed stale {}", path.display()),
            DeliveryTarget::CreateDirectory { .. } => {}
        }
    }
    Ok(())
}

fn involves_drift(error: &AppError) -> bool {
    match error {
        AppError::PagesFailed { failures } => failures.iter().any(|f| f.error.is_documentation_drift()),
        other => other.is_documentation_drift(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialise logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    let result = match GeneratorConfig::resolve(cli) {
        Ok(config) => execute(&config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            if involves_drift(&e) {
                eprintln!("  The reference documentation changed; update the local copies (scaffolds are in the review directory).");
            }
            ExitCode::FAILURE
        }
    }
}
