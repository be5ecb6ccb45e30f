// src/lib.rs
//! notion-post-sync library: mirrors a Notion database into a content
//! bucket as MDX documents with their media.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `RequestError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `SyncConfig`, secret stores
//! - **Domain model**: `Page`, `Block`, `PostMetadata`, property values
//! - **API client**: `NotionRepository`, `NotionHttpClient`, `ContentClient`
//! - **Formatting**: `DocumentRenderer`, `RenderState`, `render_document`
//! - **Storage**: `ObjectStore`, `Publisher`
//! - **Handling**: `PostSync`, `InboundRequest`, and the HTTP `server`

mod api;
mod assets;
mod config;
mod constants;
mod error;
mod formatting;
mod handler;
mod model;
mod secrets;
mod storage;
mod types;

pub mod server;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, RequestError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Command, CommandLineInput, SyncConfig};
pub use crate::secrets::{Credentials, EnvSecretStore, FileSecretStore, SecretStore};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, CalloutBlock, CodeBlock, DividerBlock, ExternalFile, FileObject,
    ImageBlock, MalformedBlock, NotionFile, Page, PostMetadata, PropertyValue, TextBlock,
    ToDoBlock, UniqueIdData, UnsupportedBlock,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, AuthToken, BlockId, BucketName, DatabaseId, Link, PageId, PropertyName,
    RichTextItem, RichTextType,
};

// --- API Client ---
pub use crate::api::{
    notion_client_adapter::{convert_block_value, convert_page_value},
    parser::{classify_error, parse_blocks_page, parse_pages_page},
    fetch_all_pages, ApiResponse, ContentClient, FailurePolicy, NotionHttpClient, NotionRepository, PaginatedResponse,
    PaginationResult,
};

// --- Assets ---
pub use crate::assets::{asset_file_name, create_unique_file, AssetFetcher, HttpAssetFetcher, StagedFile, StagingArea};

// --- Formatting ---
pub use crate::formatting::{
    render_document, render_front_matter, rich_text_to_markdown, BlockRenderResult,
    DocumentRenderer, DocumentSources, RenderState,
};

// --- Storage ---
pub use crate::storage::{
    document_key, document_prefix, LocalObjectStore, MemoryObjectStore, ObjectStore,
    PublishReport, Publisher,
};

// --- Handling ---
pub use crate::handler::{HandlerResponse, InboundRequest, Operation, PostSync, ResponseBody};
