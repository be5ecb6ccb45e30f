// src/types/ids.rs
use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A 32-digit hex run, optionally hyphenated as a UUID, anywhere in the input.
static NOTION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9a-f]{8})-?([0-9a-f]{4})-?([0-9a-f]{4})-?([0-9a-f]{4})-?([0-9a-f]{12})")
        .expect("static regex")
});

/// Strongly typed Notion object identifier, normalised to 32 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

pub type PageId = Id<PageMarker>;
pub type BlockId = Id<BlockMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T> Id<T> {
    /// Parses a bare, hyphenated or URL-embedded Notion ID.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::InvalidId("ID cannot be empty".to_string()));
        }

        // URLs carry the ID as the trailing segment, often glued to a slug.
        let candidate = if input.starts_with("http://") || input.starts_with("https://") {
            input
                .trim_end_matches('/')
                .split(['/', '?', '#'])
                .filter(|segment| !segment.is_empty())
                .find_map(|segment| last_id_in(segment))
                .ok_or_else(|| {
                    ValidationError::InvalidId(format!("Could not extract ID from URL: {}", input))
                })?
        } else {
            let stripped = input.replace('-', "");
            if stripped.len() != 32 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ValidationError::InvalidId(format!(
                    "expected 32 hex characters, got '{}'",
                    input
                )));
            }
            stripped
        };

        Ok(Self::from_normalized(candidate.to_lowercase()))
    }

    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Creates a random ID. Used for blocks whose payload carried no usable ID.
    pub fn new_v4() -> Self {
        Self::from_normalized(Uuid::new_v4().as_simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The same identifier viewed as another object kind.
    ///
    /// A page is also the root block of its own content.
    pub fn retag<U>(&self) -> Id<U> {
        Id::from_normalized(self.value.clone())
    }

    /// Hyphenated UUID form expected by API paths.
    pub fn to_dashed(&self) -> String {
        if self.value.len() == 32 {
            format!(
                "{}-{}-{}-{}-{}",
                &self.value[0..8],
                &self.value[8..12],
                &self.value[12..16],
                &self.value[16..20],
                &self.value[20..32]
            )
        } else {
            self.value.clone()
        }
    }
}

fn last_id_in(segment: &str) -> Option<String> {
    NOTION_ID_PATTERN
        .captures_iter(segment)
        .last()
        .map(|caps| (1..=5).filter_map(|i| caps.get(i)).map(|m| m.as_str()).collect())
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_dashed_ids() {
        let id = PageId::parse("550E8400E29B41D4A716446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");

        let id = PageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn extracts_id_from_database_url() {
        let id = DatabaseId::parse(
            "https://www.notion.so/acme/Posts-550e8400e29b41d4a716446655440000?v=abc",
        )
        .unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn rejects_garbage() {
        assert!(PageId::parse("").is_err());
        assert!(PageId::parse("too-short").is_err());
        assert!(PageId::parse("zz0e8400e29b41d4a716446655440000").is_err());
        assert!(PageId::parse("https://www.notion.so/nothing-here").is_err());
    }

    #[test]
    fn dashes_for_api_paths() {
        let id = BlockId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.to_dashed(), "550e8400-e29b-41d4-a716-446655440000");
    }
}
