// src/config.rs
use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_SECRET_NAME, DEFAULT_STATUS_PROPERTY};
use crate::error::AppError;
use crate::types::{BucketName, DatabaseId, PropertyName};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default local staging root for downloaded media.
fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("notion_post_sync")
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory where media is staged before upload (defaults to temp dir)
    #[arg(long, global = true)]
    pub staging_dir: Option<String>,

    /// Directory holding the local buckets
    #[arg(long, global = true, default_value = "bucket")]
    pub bucket_root: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve POST /upload and POST /delete
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,
    },
    /// Publish one post by its ID, or every post in the database
    Upload {
        #[arg(long)]
        id: Option<i64>,
    },
    /// Remove one published post by its ID
    Delete {
        #[arg(long)]
        id: i64,
    },
}

/// Resolved service configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub database_id: DatabaseId,
    pub bucket: BucketName,
    pub secret_name: String,
    /// When set, secrets are read from `{dir}/{name}.json` instead of the
    /// environment.
    pub secrets_dir: Option<PathBuf>,
    pub status_property: PropertyName,
    pub staging_dir: PathBuf,
    pub bucket_root: PathBuf,
    pub command: Command,
}

impl SyncConfig {
    /// Resolves the configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Resolves the configuration reading variables through `lookup`.
    pub fn resolve_with(
        cli: CommandLineInput,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "{} environment variable not set",
                        name
                    ))
                })
        };

        let database_id = DatabaseId::parse(&required("DATABASE_ID")?)?;
        let bucket = BucketName::new(required("POST_BUCKET")?)?;

        let status_property = lookup("STATUS_PROPERTY")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_PROPERTY.to_string());

        Ok(SyncConfig {
            database_id,
            bucket,
            secret_name: lookup("SECRET_NAME").unwrap_or_else(|| DEFAULT_SECRET_NAME.to_string()),
            secrets_dir: lookup("SECRETS_DIR").map(PathBuf::from),
            status_property: PropertyName::new(status_property),
            staging_dir: cli
                .staging_dir
                .map(PathBuf::from)
                .unwrap_or_else(default_staging_dir),
            bucket_root: PathBuf::from(cli.bucket_root),
            command: cli.command,
        })
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_id: DatabaseId::from_normalized("12345678123456781234567812345678".to_string()),
            bucket: BucketName::new("posts").expect("Default bucket name should be valid"),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            secrets_dir: None,
            status_property: PropertyName::new(DEFAULT_STATUS_PROPERTY),
            staging_dir: default_staging_dir(),
            bucket_root: PathBuf::from("bucket"),
            command: Command::Upload { id: None },
        }
    }
}
