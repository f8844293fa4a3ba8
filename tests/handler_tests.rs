//! Integration tests for the resources/list and resources/read handlers.
//!
//! Tests exercise the handler functions directly against a catalog built
//! over a temporary directory, and verify the full dispatch flow.

use std::fs;
use std::path::Path;

use mcp_resource_server::catalog::Catalog;
use mcp_resource_server::config::{FilterConfig, ServerConfig};
use mcp_resource_server::filter::FilterEngine;
use mcp_resource_server::handlers;
use mcp_resource_server::protocol::{
    JsonRpcRequest, ReadResourceParams, ResourceErrorCode, RpcId,
};

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn test_catalog(root: &Path, filter: FilterConfig) -> Catalog {
    let config = ServerConfig::new(root, filter).unwrap();
    let mut catalog = Catalog::new(config.root, FilterEngine::new(config.filter).unwrap());
    catalog.rebuild();
    catalog
}

fn read_params(id: &str) -> ReadResourceParams {
    ReadResourceParams { id: id.to_string() }
}

// ---------------------------------------------------------------------------
// resources/list tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_empty_root() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let result = handlers::resources_list::handle(&mut catalog).await;
    assert!(result.resources.is_empty());
    assert!(!result.truncated, "empty project is not a capped project");
}

#[tokio::test]
async fn list_reports_sizes_and_hints() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "docs/guide.html", b"<html/>");
    write(root, "src/data.json", b"{}");
    write(root, "image.png", b"\x89PNG");

    let mut catalog = test_catalog(root, FilterConfig::default());
    let result = handlers::resources_list::handle(&mut catalog).await;

    assert_eq!(result.resources.len(), 2);
    assert_eq!(result.resources[0].id, "file:///docs/guide.html");
    assert_eq!(result.resources[0].name, "docs/guide.html");
    assert_eq!(result.resources[0].size, 7);
    assert_eq!(result.resources[0].mime_hint, "text/html");
    assert_eq!(
        result.resources[0].description,
        "Local file: docs/guide.html (7 bytes)"
    );
    assert_eq!(result.resources[1].id, "file:///src/data.json");
    assert_eq!(result.resources[1].mime_hint, "application/json");
}

#[tokio::test]
async fn list_rescans_and_bumps_generation() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "a.txt", b"a");

    let mut catalog = test_catalog(root, FilterConfig::default());
    let first = handlers::resources_list::handle(&mut catalog).await;
    assert_eq!(first.resources.len(), 1);

    write(root, "b.txt", b"b");
    let second = handlers::resources_list::handle(&mut catalog).await;
    assert_eq!(second.resources.len(), 2);
    assert!(second.generation > first.generation);
}

#[tokio::test]
async fn list_never_contains_ignored_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "vendor/lib.rs", b"x");
    write(root, "vendor/nested/deep.md", b"x");
    write(root, "keep.rs", b"x");
    write(root, "drop.generated.rs", b"x");

    let filter = FilterConfig::default().with_ignore_patterns(["vendor", "*.generated.rs"]);
    let mut catalog = test_catalog(root, filter);
    let result = handlers::resources_list::handle(&mut catalog).await;

    let ids: Vec<&str> = result.resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["file:///keep.rs"]);
}

#[tokio::test]
async fn list_truncates_at_cap() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    for i in 0..5 {
        write(root, &format!("file{i}.txt"), b"x");
    }

    let filter = FilterConfig {
        max_files_scanned: 3,
        ..FilterConfig::default()
    };
    let mut catalog = test_catalog(root, filter);
    let result = handlers::resources_list::handle(&mut catalog).await;

    assert_eq!(result.resources.len(), 3);
    assert!(result.truncated);
}

// ---------------------------------------------------------------------------
// resources/read tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn read_returns_content_and_size() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "notes/todo.txt", "ünïcode ✓".as_bytes());

    let mut catalog = test_catalog(root, FilterConfig::default());
    let result = handlers::resources_read::handle(read_params("file:///notes/todo.txt"), &mut catalog)
        .await
        .unwrap();

    assert_eq!(result.content, "ünïcode ✓");
    assert_eq!(result.size, "ünïcode ✓".len() as u64);
    assert_eq!(result.mime_hint, "text/plain");
    assert_eq!(result.contents[0].text, result.content);
    assert_eq!(result.contents[0].uri, "file:///notes/todo.txt");
}

#[tokio::test]
async fn read_fabricated_id_is_not_found_after_one_rebuild() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "real.txt", b"real");

    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());
    let before = catalog.generation();

    let err = handlers::resources_read::handle(read_params("file:///made/up.txt"), &mut catalog)
        .await
        .unwrap_err();

    assert_eq!(err.code, ResourceErrorCode::NotFound);
    assert_eq!(catalog.generation(), before + 1);
}

#[tokio::test]
async fn read_finds_file_created_after_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    write(tmp.path(), "fresh.txt", b"fresh");
    let result = handlers::resources_read::handle(read_params("file:///fresh.txt"), &mut catalog)
        .await
        .unwrap();
    assert_eq!(result.content, "fresh");
}

#[tokio::test]
async fn read_reports_size_at_read_time() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "grow.txt", b"abc");

    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());
    write(tmp.path(), "grow.txt", b"abcdef");

    let result = handlers::resources_read::handle(read_params("file:///grow.txt"), &mut catalog)
        .await
        .unwrap();
    assert_eq!(result.size, 6);
    assert_eq!(result.content.len() as u64, result.size);
}

#[tokio::test]
async fn read_growth_past_limit_is_size_exceeded() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "limit.txt", b"12345678");

    let filter = FilterConfig {
        max_file_size_bytes: 8,
        ..FilterConfig::default()
    };
    let mut catalog = test_catalog(tmp.path(), filter);
    assert!(catalog.get("file:///limit.txt").is_some(), "exactly at the limit is included");

    write(tmp.path(), "limit.txt", b"123456789");
    let err = handlers::resources_read::handle(read_params("file:///limit.txt"), &mut catalog)
        .await
        .unwrap_err();
    assert_eq!(err.code, ResourceErrorCode::SizeExceeded);
}

#[tokio::test]
async fn read_deleted_file_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "gone.txt", b"bye");

    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());
    fs::remove_file(tmp.path().join("gone.txt")).unwrap();

    let err = handlers::resources_read::handle(read_params("file:///gone.txt"), &mut catalog)
        .await
        .unwrap_err();
    assert_eq!(err.code, ResourceErrorCode::NotFound);
}

#[tokio::test]
async fn read_content_turned_binary_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "flip.txt", b"text");

    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());
    write(tmp.path(), "flip.txt", b"\xff\xfe\xfd");

    let err = handlers::resources_read::handle(read_params("file:///flip.txt"), &mut catalog)
        .await
        .unwrap_err();
    assert_eq!(err.code, ResourceErrorCode::IoError);
}

#[tokio::test]
async fn read_content_turned_nul_filled_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "a.txt", b"text");

    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());
    write(tmp.path(), "a.txt", b"\0\0\0\0");

    let err = handlers::resources_read::handle(read_params("file:///a.txt"), &mut catalog)
        .await
        .unwrap_err();
    assert_eq!(err.code, ResourceErrorCode::IoError);

    let listing = handlers::resources_list::handle(&mut catalog).await;
    assert!(listing.resources.is_empty(), "listing and read must agree");
}

#[tokio::test]
async fn read_empty_id_is_invalid_params() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let err = handlers::resources_read::handle(read_params(""), &mut catalog)
        .await
        .unwrap_err();
    assert_eq!(err.code, ResourceErrorCode::InvalidParams);
}

// ---------------------------------------------------------------------------
// Dispatch integration tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dispatch_initialize_advertises_resources() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let req = JsonRpcRequest::new(
        RpcId::from(1),
        "initialize",
        Some(serde_json::json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": { "name": "test-client", "version": "0.0.1" }
        })),
    );

    let response = handlers::dispatch(&req, &mut catalog).await.unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
    assert_eq!(result["serverInfo"]["name"], "mcp-resource-server");
}

#[tokio::test]
async fn dispatch_read_accepts_uri_param() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "hello.txt", b"hello");
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let req = JsonRpcRequest::new(
        RpcId::Str("r-1".into()),
        "resources/read",
        Some(serde_json::json!({ "uri": "file:///hello.txt" })),
    );

    let response = handlers::dispatch(&req, &mut catalog).await.unwrap();
    assert_eq!(response.id, Some(RpcId::Str("r-1".into())));
    let result = response.result.unwrap();
    assert_eq!(result["content"], "hello");
    assert_eq!(result["size"], 5);
    assert_eq!(result["mimeHint"], "text/plain");
}

#[tokio::test]
async fn dispatch_read_missing_params_is_invalid_params() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let req = JsonRpcRequest::new(RpcId::from(7), "resources/read", None);
    let response = handlers::dispatch(&req, &mut catalog).await.unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.data.unwrap()["error"]["code"], "invalid_params");
}

#[tokio::test]
async fn dispatch_read_not_found_maps_to_resource_code() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let req = JsonRpcRequest::new(
        RpcId::from(8),
        "read",
        Some(serde_json::json!({ "id": "file:///nope.txt" })),
    );
    let response = handlers::dispatch(&req, &mut catalog).await.unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, -32002);
    assert_eq!(error.data.unwrap()["error"]["code"], "not_found");
}

#[tokio::test]
async fn dispatch_unknown_method() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let req = JsonRpcRequest::new(RpcId::from(9), "tools/list", None);
    let response = handlers::dispatch(&req, &mut catalog).await.unwrap();
    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn dispatch_notification_gets_no_response() {
    let tmp = tempfile::tempdir().unwrap();
    let mut catalog = test_catalog(tmp.path(), FilterConfig::default());

    let mut req = JsonRpcRequest::new(RpcId::from(0), "notifications/initialized", None);
    req.id = None;
    assert!(handlers::dispatch(&req, &mut catalog).await.is_none());
}
