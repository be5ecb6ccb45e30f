// tests/content_client.rs
//! Listing, child fetching and status updates against a fake source.

mod common;

use common::{database_id, post, FakeRepository, DATABASE};
use notion_post_sync::{Block, ContentClient, PropertyName};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn titles(pages: &[notion_post_sync::Page]) -> Vec<String> {
    pages
        .iter()
        .map(|page| page.title_text().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn listing_follows_cursors_until_exhausted() {
    let repository = Arc::new(
        FakeRepository::new()
            .with_listing_page(vec![
                post("00000000000000000000000000000001", 1, "one", None),
                post("00000000000000000000000000000002", 2, "two", None),
            ])
            .with_listing_page(vec![post("00000000000000000000000000000003", 3, "three", None)])
            .with_listing_page(vec![post("00000000000000000000000000000004", 4, "four", None)]),
    );
    let client = ContentClient::new(repository.clone());

    let pages = client.list_child_pages(&database_id()).await.unwrap();

    assert_eq!(titles(&pages), vec!["one", "two", "three", "four"]);
    assert_eq!(
        repository.calls(),
        vec![
            format!("query:{}:0", DATABASE),
            format!("query:{}:1", DATABASE),
            format!("query:{}:2", DATABASE),
        ]
    );
}

#[tokio::test]
async fn failed_listing_page_truncates_silently() {
    let repository = Arc::new(
        FakeRepository::new()
            .with_listing_page(vec![post("00000000000000000000000000000001", 1, "one", None)])
            .with_listing_page(vec![post("00000000000000000000000000000002", 2, "two", None)])
            .with_listing_page(vec![post("00000000000000000000000000000003", 3, "three", None)])
            .failing_listing_page(1, 500),
    );
    let client = ContentClient::new(repository.clone());

    let pages = client.list_child_pages(&database_id()).await.unwrap();
    assert_eq!(titles(&pages), vec!["one"]);
    assert_eq!(repository.calls().len(), 2);
}

#[tokio::test]
async fn rate_limited_listing_is_not_retried() {
    let repository = Arc::new(
        FakeRepository::new()
            .with_listing_page(vec![post("00000000000000000000000000000001", 1, "one", None)])
            .failing_listing_page(0, 429),
    );
    let client = ContentClient::new(repository.clone());

    let pages = client.list_child_pages(&database_id()).await.unwrap();
    assert!(pages.is_empty());
    assert_eq!(repository.calls().len(), 1);
}

#[tokio::test]
async fn unauthorized_listing_is_an_error() {
    let repository = Arc::new(
        FakeRepository::new()
            .with_listing_page(vec![post("00000000000000000000000000000001", 1, "one", None)])
            .failing_listing_page(0, 401),
    );
    let client = ContentClient::new(repository);

    let err = client.list_child_pages(&database_id()).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn block_children_are_gathered_across_pages() {
    let parent = "0000000000000000000000000000beef";
    let children: Vec<Block> = (1..=5).map(|n| Block::paragraph(&n.to_string())).collect();
    let repository = Arc::new(
        FakeRepository::new()
            .with_children(parent, children.clone())
            .with_children_chunk(2),
    );
    let client = ContentClient::new(repository.clone());

    let fetched = client
        .fetch_block_children(&notion_post_sync::BlockId::parse(parent).unwrap())
        .await;

    assert_eq!(fetched, children);
    assert_eq!(repository.calls().len(), 3);
}

#[tokio::test]
async fn status_patch_targets_the_configured_property() {
    let page = "00000000000000000000000000000001";
    let repository = Arc::new(FakeRepository::new());
    let client =
        ContentClient::new(repository.clone()).with_status_property(PropertyName::new("Publish"));

    let accepted = client
        .set_page_status(&notion_post_sync::PageId::parse(page).unwrap(), "Uploaded")
        .await;

    assert!(accepted);
    assert_eq!(
        repository.updates(),
        vec![(
            page.to_string(),
            serde_json::json!({ "Publish": { "status": { "name": "Uploaded" } } })
        )]
    );
}

#[tokio::test]
async fn status_patch_failure_is_swallowed() {
    let repository = Arc::new(FakeRepository::new().failing_updates(500));
    let client = ContentClient::new(repository);

    let accepted = client
        .set_page_status(
            &notion_post_sync::PageId::parse("00000000000000000000000000000001").unwrap(),
            "Uploaded",
        )
        .await;
    assert!(!accepted);
}
