//! The embedded chat widget.
//!
//! `frontend/` is compiled into the binary with `include_str!`, so the
//! server ships as a single file. The widget fetches the greeting from
//! `/api/persona`, keeps the visible history in the page, and sends it
//! along with each message to `/api/chat`.

use axum::{
    Router,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../frontend/index.html");
const STYLE_CSS: &str = include_str!("../frontend/style.css");
const APP_JS: &str = include_str!("../frontend/app.js");

/// Routes for the widget page and its static assets.
pub fn frontend_router() -> Router {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route("/static/style.css", get(|| async { asset("text/css; charset=utf-8", STYLE_CSS) }))
        .route(
            "/static/app.js",
            get(|| async { asset("application/javascript; charset=utf-8", APP_JS) }),
        )
}

fn asset(content_type: &'static str, body: &'static str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn fetch(uri: &str) -> (StatusCode, String, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = frontend_router().oneshot(req).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn index_links_widget_assets() {
        let (status, content_type, html) = fetch("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("/static/app.js"));
        assert!(html.contains("/static/style.css"));
    }

    #[tokio::test]
    async fn stylesheet_has_css_type() {
        let (status, content_type, _) = fetch("/static/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.contains("text/css"));
    }

    #[tokio::test]
    async fn script_talks_to_chat_api() {
        let (status, content_type, js) = fetch("/static/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.contains("javascript"));
        assert!(js.contains("/api/chat"));
        assert!(js.contains("/api/persona"));
    }

    #[tokio::test]
    async fn script_checks_status_before_parsing_reply() {
        let (_, _, js) = fetch("/static/app.js").await;
        let send = &js[js.find("async function send").unwrap()..];
        let status_check = send.find("if (!res.ok)").unwrap();
        let reply_parse = send.find("const body = await res.json()").unwrap();
        assert!(status_check < reply_parse);
        assert!(js.contains("async function errorMessage"));
    }

    #[tokio::test]
    async fn unknown_asset_is_404() {
        let (status, _, _) = fetch("/static/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
