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
use notion_post_sync::{
    server, Command, CommandLineInput, ContentClient, Credentials, EnvSecretStore,
    FileSecretStore, HttpAssetFetcher, LocalObjectStore, NotionHttpClient, PostSync, Publisher,
    RequestError, SecretStore, StagingArea, SyncConfig,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_post_sync.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
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
        .build(&log_file_path)?;

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

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Wires the remote source, media fetcher, staging area and bucket into
/// one `PostSync`.
async fn build_sync(config: &SyncConfig) -> anyhow::Result<PostSync> {
    let secrets: Box<dyn SecretStore> = match &config.secrets_dir {
        Some(dir) => Box::new(FileSecretStore::new(dir)),
        None => Box::new(EnvSecretStore),
    };
    let credentials = Credentials::load(secrets.as_ref(), &config.secret_name)
        .await
        .context("Failed to load credentials")?;
    log::debug!("Using Notion key {}", credentials.api_key);

    let repository = NotionHttpClient::new(&credentials.api_key)?;
    let content = ContentClient::new(Arc::new(repository))
        .with_status_property(config.status_property.clone());

    let store = LocalObjectStore::new(&config.bucket_root);
    log::info!(
        "Publishing into bucket '{}' under {}",
        config.bucket,
        store.root().display()
    );

    Ok(PostSync::new(
        content,
        Arc::new(HttpAssetFetcher::default()),
        Publisher::new(Arc::new(store), config.bucket.clone()),
        StagingArea::new(&config.staging_dir),
        config.database_id.clone(),
        credentials.auth_token,
    ))
}

/// Prints the outcome of a one-shot command.
fn report_outcome(outcome: Result<String, RequestError>) -> anyhow::Result<()> {
    match outcome {
        Ok(message) => {
            println!("{}", message);
            Ok(())
        }
        Err(e) => anyhow::bail!("{} (status {})", e, e.status_code()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = SyncConfig::resolve(cli).context("Invalid configuration")?;
    let sync = build_sync(&config).await?;

    match config.command {
        Command::Serve { bind } => server::serve(Arc::new(sync), &bind)
            .await
            .with_context(|| format!("Server on {} failed", bind)),
        Command::Upload { id } => report_outcome(sync.upload(id).await),
        Command::Delete { id } => report_outcome(sync.delete(id).await),
    }
}
