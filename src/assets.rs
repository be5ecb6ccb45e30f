// src/assets.rs
//! Downloading referenced media into a per-document staging directory.

use crate::constants::{FALLBACK_ASSET_NAME, MAX_ASSET_NAME_ATTEMPTS, THUMBNAIL_STEM};
use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-.]").expect("static regex"));

/// Replaces every character outside word characters, `-` and `.` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

/// Local file name for a remote asset: the URL's last path segment
/// (query string dropped), sanitized.
pub fn asset_file_name(raw_url: &str) -> String {
    let segment = match url::Url::parse(raw_url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string)),
        Err(_) => raw_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    match segment.filter(|s| !s.is_empty()) {
        Some(name) => sanitize_filename(&name),
        None => FALLBACK_ASSET_NAME.to_string(),
    }
}

/// Creates a new, empty file for `file_name` in `dest_dir`.
///
/// A name already taken in the directory gets a `-N` suffix before its
/// extension (`image.png`, `image-1.png`, ...), so assets of one document
/// never overwrite each other.
pub async fn create_unique_file(
    dest_dir: &Path,
    file_name: &str,
) -> Result<(PathBuf, tokio::fs::File), AppError> {
    tokio::fs::create_dir_all(dest_dir).await?;

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ASSET_NAME.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

    for attempt in 0..MAX_ASSET_NAME_ATTEMPTS {
        let candidate = match (attempt, &extension) {
            (0, _) => file_name.to_string(),
            (n, Some(ext)) => format!("{}-{}.{}", stem, n, ext),
            (n, None) => format!("{}-{}", stem, n),
        };
        let path = dest_dir.join(candidate);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Storage {
        key: dest_dir.join(file_name).display().to_string(),
        message: format!("no free name after {} attempts", MAX_ASSET_NAME_ATTEMPTS),
    })
}

/// Downloads a remote resource into a directory.
#[async_trait::async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Stores the resource at `url` under `dest_dir` and returns the path
    /// of the written file. The file name is unique within `dest_dir`.
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, AppError>;
}

/// Fetches assets over HTTP(S), writing the body chunk by chunk.
#[derive(Clone, Default)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    async fn download(
        mut response: reqwest::Response,
        file: &mut tokio::fs::File,
    ) -> Result<u64, AppError> {
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

#[async_trait::async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, AppError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::AssetDownload {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let (path, mut file) = create_unique_file(dest_dir, &asset_file_name(url)).await?;
        match Self::download(response, &mut file).await {
            Ok(written) => {
                log::debug!("Staged {} ({} bytes) at {}", url, written, path.display());
                Ok(path)
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    log::warn!("Could not remove partial download {}: {}", path.display(), cleanup);
                }
                Err(e)
            }
        }
    }
}

/// Root of the local staging tree; one directory per document.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

/// A staged file and its path relative to the document directory,
/// `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub relative_path: String,
    pub path: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_dir(&self, document_id: &str) -> PathBuf {
        self.root.join(sanitize_filename(document_id))
    }

    /// Removes everything staged for the document.
    pub async fn clear(&self, document_id: &str) -> Result<(), AppError> {
        match tokio::fs::remove_dir_all(self.document_dir(document_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every file staged for the document, sorted by relative path.
    pub async fn staged_files(&self, document_id: &str) -> Result<Vec<StagedFile>, AppError> {
        let base = self.document_dir(document_id);
        let mut files = Vec::new();
        let mut pending = vec![base.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let relative = path
                    .strip_prefix(&base)
                    .map_err(|e| AppError::InternalError {
                        message: format!("staged file outside its directory: {}", e),
                        source: None,
                    })?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push(StagedFile {
                    relative_path: relative,
                    path,
                });
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }
}

/// Stages a cover image as `thumbnail.<ext>`, keeping the original extension.
///
/// Returns `None` (after logging) when the download or the rename fails.
pub async fn stage_thumbnail(
    fetcher: &dyn AssetFetcher,
    cover_url: &str,
    dest_dir: &Path,
) -> Option<PathBuf> {
    let downloaded = match fetcher.fetch(cover_url, dest_dir).await {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Thumbnail download failed for {}: {}", cover_url, e);
            return None;
        }
    };

    let file_name = match downloaded.extension() {
        Some(ext) => format!("{}.{}", THUMBNAIL_STEM, ext.to_string_lossy()),
        None => THUMBNAIL_STEM.to_string(),
    };
    let target = downloaded.with_file_name(file_name);

    match tokio::fs::rename(&downloaded, &target).await {
        Ok(()) => {
            log::debug!("Thumbnail staged at {}", target.display());
            Some(target)
        }
        Err(e) => {
            log::warn!("Could not rename thumbnail {}: {}", downloaded.display(), e);
            None
        }
    }
}
