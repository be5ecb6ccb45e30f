// src/constants.rs
//! Domain constants that define how posts are fetched, rendered and stored.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Protocol version sent with every Notion API request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Indentation applied to every line of a nested block's output.
pub const CHILD_INDENT: &str = "    ";

/// Nesting depth beyond which children are no longer expanded.
///
/// Block trees are acyclic, so this only guards against a misbehaving
/// source that keeps reporting children.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 64;

/// Fence tag for code blocks that declare no language.
pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

pub const DIVIDER_TOKEN: &str = "---";

pub const BULLET_MARKER: &str = "-";

/// Format of the `date` front-matter field.
pub const FRONT_MATTER_DATE_FORMAT: &str = "%Y/%m/%d";

// ---------------------------------------------------------------------------
// Page properties
// ---------------------------------------------------------------------------

/// Unique-id property whose number selects a single post.
pub const SELECTOR_PROPERTY: &str = "ID";
pub const CATEGORY_PROPERTY: &str = "category";
pub const DESCRIPTION_PROPERTY: &str = "description";
pub const TAGS_PROPERTY: &str = "tags";
pub const AUTHOR_PROPERTY: &str = "author";

/// Status property patched after publishing.
pub const DEFAULT_STATUS_PROPERTY: &str = "status";

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "web";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

pub const STATUS_UPLOADED: &str = "Uploaded";
pub const STATUS_NOT_UPLOADED: &str = "Not uploaded";

// ---------------------------------------------------------------------------
// Storage layout
// ---------------------------------------------------------------------------

/// Root segment of every published key: `posts/{category}/{id}/...`.
pub const POSTS_KEY_ROOT: &str = "posts";

/// File name of the rendered document inside its key prefix.
pub const DOCUMENT_FILE_NAME: &str = "page.mdx";

/// Base name given to a staged cover image; the extension is preserved.
pub const THUMBNAIL_STEM: &str = "thumbnail";

/// Used when a URL yields no usable file name.
pub const FALLBACK_ASSET_NAME: &str = "asset";

/// How many `-N` suffixes are tried before staging a file name gives up.
pub const MAX_ASSET_NAME_ATTEMPTS: usize = 1000;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_SECRET_NAME: &str = "notion-api-key";

/// Secret field holding the Notion integration key.
pub const SECRET_FIELD_API_KEY: &str = "notion-api-key";

/// Secret field holding the token callers must present.
pub const SECRET_FIELD_AUTH_TOKEN: &str = "auth-token";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
