//! Document broker routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use docvault_core::document::{DocumentError, UploadFile};
use docvault_shared::AppError;

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents/upload", post(upload_documents))
        .route("/documents/list", get(list_documents))
        .route("/documents/download/{id}", get(download_document))
        .route("/documents/share/{id}", get(share_document))
        .route("/documents/preview-link/{id}", get(preview_link))
        .route("/documents/delete-all", delete(delete_all))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for download: the token is optional (public access).
#[derive(Debug, Deserialize)]
struct DownloadQuery {
    token: Option<String>,
}

/// Query parameters for preview links: the token is required.
#[derive(Debug, Deserialize)]
struct PreviewQuery {
    token: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Recover the display name from a document id of the form `{uuid}_{name}`.
/// Ids without a separator are used as-is.
fn suggested_filename(id: &str) -> &str {
    id.split_once('_').map_or(id, |(_, name)| name)
}

/// Translate a broker error into its HTTP response.
fn error_response(err: DocumentError) -> Response {
    let app = AppError::from(err);
    let status =
        StatusCode::from_u16(app.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": app.error_code(),
            "message": app.to_string()
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/documents/upload`
/// Upload a batch of files (multipart form data).
async fn upload_documents(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut files = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                match field.bytes().await {
                    Ok(bytes) => files.push(UploadFile::new(name, bytes)),
                    Err(e) => {
                        error!(error = %e, "Failed to read multipart field");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": "MALFORMED_UPLOAD",
                                "message": "Could not read uploaded file"
                            })),
                        )
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to parse multipart body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "MALFORMED_UPLOAD",
                        "message": "Could not parse multipart body"
                    })),
                )
                    .into_response();
            }
        }
    }

    match state.documents.upload(files).await {
        Ok(names) => {
            info!(count = names.len(), "Files uploaded");
            (StatusCode::OK, Json(json!({ "file_paths": names }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Upload rejected");
            error_response(e)
        }
    }
}

/// GET `/documents/list`
/// List stored documents with download counts.
async fn list_documents(State(state): State<AppState>) -> Response {
    match state.documents.list().await {
        Ok(views) => (StatusCode::OK, Json(json!({ "files": views }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list documents");
            error_response(e)
        }
    }
}

/// GET `/documents/download/{id}?token=`
/// Download a document. The token is optional; direct access is public.
async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    match state.documents.download(&id, query.token.as_deref()).await {
        Ok(fetched) => {
            info!(id = %id, "Document downloaded");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, fetched.mime_type),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", suggested_filename(&id)),
                    ),
                ],
                fetched.bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(id = %id, error = %e, "Download failed");
            error_response(e)
        }
    }
}

/// GET `/documents/share/{id}`
/// Issue a time-limited share link for a document.
async fn share_document(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let link = state.documents.share(&id);
    info!(id = %id, expires_at = %link.expires_at, "Share link issued");
    (StatusCode::OK, Json(link)).into_response()
}

/// GET `/documents/preview-link/{id}?token=`
/// Redirect to a preview URL. Failed link resolution is a 404, not a 401.
async fn preview_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    match state.documents.preview_link(&id, &query.token).await {
        Ok(Some(url)) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "NOT_FOUND",
                "message": "File not found or access denied."
            })),
        )
            .into_response(),
        Err(e) => {
            error!(id = %id, error = %e, "Preview link resolution failed");
            error_response(e)
        }
    }
}

/// DELETE `/documents/delete-all`
/// Delete every stored document. Best-effort per item; failures are logged.
async fn delete_all(State(state): State<AppState>) -> Response {
    match state.documents.delete_all().await {
        Ok(report) => {
            if report.is_clean() {
                info!(deleted = report.deleted.len(), "All documents deleted");
            } else {
                warn!(
                    deleted = report.deleted.len(),
                    failed = report.failed.len(),
                    "Bulk delete finished with failures"
                );
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Bulk delete failed");
            error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use docvault_core::document::{DocumentService, DownloadStats, TokenStore};
    use docvault_core::storage::{ObjectStoreClient, StorageConfig, StorageProvider};

    const BOUNDARY: &str = "docvault-test-boundary";

    /// Test state backed by a throwaway local-fs store.
    fn create_test_state() -> (AppState, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("docvault-api-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("should create temp dir");

        let config = StorageConfig::new(StorageProvider::local_fs(&root));
        let storage = ObjectStoreClient::from_config(config).expect("should create client");

        let documents = DocumentService::new(
            Arc::new(storage),
            Arc::new(TokenStore::new()),
            Arc::new(DownloadStats::new()),
            "http://localhost:8080",
        );

        (
            AppState {
                documents: Arc::new(documents),
            },
            root,
        )
    }

    fn test_app(state: AppState) -> Router {
        Router::new().merge(routes()).with_state(state)
    }

    /// Build a multipart/form-data body from (filename, content_type, bytes)
    /// parts.
    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (filename, content_type, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(parts: &[(&str, &str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/documents/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_suggested_filename_strips_key_prefix() {
        assert_eq!(
            suggested_filename("550e8400-e29b-41d4-a716-446655440000_report.pdf"),
            "report.pdf"
        );
        assert_eq!(suggested_filename("legacy.pdf"), "legacy.pdf");
    }

    #[tokio::test]
    async fn test_upload_allowed_file_returns_names() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(upload_request(&[(
                "report.pdf",
                "application/pdf",
                b"%PDF-1.4",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["file_paths"], json!(["report.pdf"]));

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_upload_disallowed_extension_returns_400() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(upload_request(&[(
                "malware.exe",
                "application/octet-stream",
                b"MZ",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "INVALID_FILE_TYPE");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains(".exe")
        );

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_mixed_batch_stores_nothing() {
        let (state, root) = create_test_state();
        let app = test_app(state.clone());

        let response = app
            .oneshot(upload_request(&[
                ("report.pdf", "application/pdf", b"%PDF-1.4"),
                ("malware.exe", "application/octet-stream", b"MZ"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // The whole batch was rejected: report.pdf must not be stored either.
        let response = test_app(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["files"].as_array().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["files"].as_array().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_download_flow_counts_downloads() {
        let (state, root) = create_test_state();

        let response = test_app(state.clone())
            .oneshot(upload_request(&[(
                "notes.txt",
                "text/plain",
                b"hello",
            )]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Resolve the assigned document id from the listing.
        let response = test_app(state.clone())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        let id = json["files"][0]["id"].as_str().unwrap().to_string();
        assert_eq!(json["files"][0]["download_count"], 0);

        // Download twice without a token (public access).
        for _ in 0..2 {
            let response = test_app(state.clone())
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(format!("/documents/download/{id}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "text/plain"
            );
            // The suggested filename is the original name, not the object key.
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                "attachment; filename=\"notes.txt\""
            );
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(body.as_ref(), b"hello");
        }

        let response = test_app(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["files"][0]["download_count"], 2);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_download_with_garbage_token_returns_401() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/download/some-id?token=garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "UNAUTHORIZED");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("invalid or expired token")
        );

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_download_missing_document_returns_404() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/download/no-such-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_share_returns_link_with_token() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/share/doc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let token = json["token"].as_str().unwrap();
        assert!(!token.is_empty());
        assert_eq!(
            json["url"].as_str().unwrap(),
            format!("http://localhost:8080/documents/preview-link/doc123?token={token}")
        );
        assert!(json["expires_at"].is_string());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_preview_link_with_garbage_token_returns_404() {
        let (state, root) = create_test_state();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/preview-link/doc123?token=garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_delete_all_returns_204() {
        let (state, root) = create_test_state();

        let response = test_app(state.clone())
            .oneshot(upload_request(&[(
                "notes.txt",
                "text/plain",
                b"hello",
            )]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = test_app(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/documents/delete-all")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = test_app(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/documents/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["files"].as_array().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(root);
    }
}
