use axum::{Json, Router, routing::get};
use core_config::AppInfo;
use serde::Serialize;

/// Body returned by the `/health` endpoint
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Router exposing `GET /health` reporting the app name and version.
///
/// Liveness only; it does not touch downstream dependencies, so it stays
/// green while the store reconnects.
pub fn health_router(info: AppInfo) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok",
                name: info.name,
                version: info.version,
            })
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint_reports_ok() {
        let app = health_router(core_config::AppInfo {
            name: "test-app",
            version: "0.0.1",
        });

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["name"], "test-app");
    }
}
