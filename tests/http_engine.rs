//! Tests for the HTTP engine boundary against a mock processing service.
mod common;
use common::*;
use httpmock::prelude::*;
use rensa::prelude::*;

fn grayscale_request() -> EngineRequest {
    EngineRequest {
        source: sample_blob(),
        operations: vec![OperationDescriptor {
            name: "grayscale".to_string(),
            parameters: ParamMap::new(),
        }],
    }
}

#[tokio::test]
async fn test_posts_multipart_and_returns_the_artifact() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/process")
                .body_contains("\"type\":\"grayscale\"")
                .body_contains("photo.png");
            then.status(200)
                .header("content-type", "image/png")
                .body([7u8, 8, 9]);
        })
        .await;

    let engine = HttpEngine::new(&server.base_url());
    let artifact = engine
        .process(grayscale_request())
        .await
        .expect("Failed to process");

    assert_eq!(artifact.bytes.as_ref(), &[7, 8, 9]);
    assert_eq!(artifact.media_type, "image/png");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/process");
            then.status(200).body("ok");
        })
        .await;

    let engine = HttpEngine::new(&format!("{}/", server.base_url()));
    engine
        .process(grayscale_request())
        .await
        .expect("Failed to process");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_content_type_falls_back_to_octet_stream() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/process");
            then.status(200).body([1u8, 2]);
        })
        .await;

    let engine = HttpEngine::new(&server.base_url());
    let artifact = engine
        .process(grayscale_request())
        .await
        .expect("Failed to process");
    assert_eq!(artifact.media_type, "application/octet-stream");
}

#[tokio::test]
async fn test_error_status_is_a_rejection_with_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/process");
            then.status(422).body("unsupported kernel size");
        })
        .await;

    let engine = HttpEngine::new(&server.base_url());
    match engine.process(grayscale_request()).await {
        Err(EngineError::Rejected(detail)) => {
            assert!(detail.contains("422"), "missing status in: {detail}");
            assert!(
                detail.contains("unsupported kernel size"),
                "missing body in: {detail}"
            );
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_failure() {
    // Nothing listens on port 1.
    let engine = HttpEngine::new("http://127.0.0.1:1");
    match engine.process(grayscale_request()).await {
        Err(EngineError::Transport(_)) => {}
        other => panic!("Expected Transport, got {:?}", other),
    }
}
