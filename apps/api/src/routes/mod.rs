pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/optimize", post(handlers::handle_optimize))
        .route(
            "/api/v1/artifacts/:request_id/:file_name",
            get(handlers::handle_download_artifact),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::tests::test_state;

    const BOUNDARY: &str = "resume-optimizer-test-boundary";

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, file_name, bytes) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_preview() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let request = multipart_request(
            "/api/v1/extract",
            &[("file", "resume.txt", b"  Experienced Go developer\n")],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["kind"], "txt");
        assert_eq!(body["text"], "Experienced Go developer");
    }

    #[tokio::test]
    async fn test_extract_unsupported_is_not_an_http_error() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let request = multipart_request("/api/v1/extract", &[("file", "resume.rtf", b"{\\rtf1}")]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["failure"]["reason"], "unsupported");
        assert_eq!(
            body["text"],
            "Unsupported file format. Please upload a PDF, DOCX, or TXT file."
        );
    }

    #[tokio::test]
    async fn test_optimize_requires_both_uploads() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let request = multipart_request(
            "/api/v1/optimize",
            &[("resume", "resume.txt", b"Experienced Go developer")],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_optimize_then_download() {
        let app = build_router(test_state(Ok("Must-have: Go"), Ok("- Go jobs")));
        let request = multipart_request(
            "/api/v1/optimize",
            &[
                ("resume", "resume.txt", b"Experienced Go developer"),
                (
                    "job_description",
                    "jd.txt",
                    b"Looking for a Go developer with 5 years experience",
                ),
            ],
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert!(report["match_score"].as_u64().unwrap() >= 60);
        assert_eq!(report["keywords"]["combined"], "Must-have: Go\n\n- Go jobs");

        let pdf_url = report["artifacts"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["format"] == "pdf")
            .and_then(|a| a["url"].as_str())
            .unwrap()
            .to_string();

        let response = app
            .oneshot(Request::get(pdf_url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Optimized_Resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_download_unknown_file_name_is_404() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let uri = format!("/api/v1/artifacts/{}/secrets.txt", uuid::Uuid::new_v4());
        let response = app
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_missing_request_is_404() {
        let app = build_router(test_state(Ok("Go"), Err(())));
        let uri = format!(
            "/api/v1/artifacts/{}/optimized_resume.docx",
            uuid::Uuid::new_v4()
        );
        let response = app
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
