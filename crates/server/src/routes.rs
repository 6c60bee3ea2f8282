//! Router and request handlers.
//!
//! - `GET /` → `Hello!`
//! - `GET /feeds/hn/{min_points}` → filtered RSS (`text/xml`)

use axum::Router;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::info;

use crate::error::AppError;
use crate::orchestrator::FeedOrchestrator;

/// Response header carrying the number of items that could not be scored
pub const FAILURES_HEADER: &str = "x-feed-diet-failures";

/// Build the application router around `orchestrator`
pub fn router(orchestrator: FeedOrchestrator) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/feeds/hn/{min_points}", get(hn_feed))
        .with_state(orchestrator)
}

async fn home() -> &'static str {
    "Hello!"
}

async fn hn_feed(
    State(orchestrator): State<FeedOrchestrator>,
    Path(raw): Path<String>,
) -> Result<Response, AppError> {
    let min_points = parse_min_points(&raw)?;
    info!("Filtering {} for >= {} points", orchestrator.feed_url(), min_points);

    let rendered = orchestrator.render(min_points).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/xml")],
        [(FAILURES_HEADER, rendered.failed.to_string())],
        rendered.body,
    )
        .into_response())
}

/// Accept only plain decimal digits that fit in a u64
fn parse_min_points(raw: &str) -> Result<u64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidThreshold(raw.to_string()));
    }
    raw.parse::<u64>()
        .map_err(|_| AppError::InvalidThreshold(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use feed_source::fakes::MemorySource;
    use feed_source::parse_feed;
    use std::sync::Arc;
    use tower::ServiceExt;

    const FEED: &str = r#"<rss version="2.0"><channel>
<title>Hacker News</title><link>https://news.ycombinator.com/</link><description>hn</description>
<item><title>A</title><comments>mem://c/a</comments></item>
<item><title>B</title><comments>mem://c/b</comments></item>
<item><title>C</title><comments>mem://c/c</comments></item>
</channel></rss>"#;

    fn build_app(source: MemorySource) -> Router {
        let config = ServerConfig {
            feed_url: "mem://rss".to_string(),
            ..ServerConfig::default()
        };
        router(FeedOrchestrator::new(Arc::new(source), &config))
    }

    fn scored_source() -> MemorySource {
        MemorySource::new()
            .with_body("mem://rss", FEED)
            .with_body("mem://c/a", "120 points")
            .with_body("mem://c/b", "45 points")
            .with_body("mem://c/c", "no score here")
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[test]
    fn test_parse_min_points() {
        assert_eq!(parse_min_points("0").unwrap(), 0);
        assert_eq!(parse_min_points("100").unwrap(), 100);
        assert!(parse_min_points("").is_err());
        assert!(parse_min_points("-5").is_err());
        assert!(parse_min_points("+5").is_err());
        assert!(parse_min_points("12abc").is_err());
        assert!(parse_min_points("99999999999999999999999").is_err());
    }

    #[tokio::test]
    async fn test_home() {
        let (status, _, body) = get(build_app(MemorySource::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Hello!");
    }

    #[tokio::test]
    async fn test_hn_feed_filters() {
        let (status, headers, body) = get(build_app(scored_source()), "/feeds/hn/100").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/xml");
        assert_eq!(headers[FAILURES_HEADER], "1");

        let doc = parse_feed(&body).unwrap();
        let titles: Vec<_> = doc.items().iter().map(|i| i.label().to_string()).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[tokio::test]
    async fn test_hn_feed_bad_threshold() {
        let (status, _, body) = get(build_app(scored_source()), "/feeds/hn/lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"Provided min_points must be an integer");
    }

    #[tokio::test]
    async fn test_hn_feed_upstream_unreachable() {
        let (status, _, _) = get(build_app(MemorySource::new()), "/feeds/hn/10").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_hn_feed_upstream_garbage() {
        let source = MemorySource::new().with_body("mem://rss", "<html>oops</html>");
        let (status, _, _) = get(build_app(source), "/feeds/hn/10").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_hn_feed_upstream_error_status() {
        let source = MemorySource::new().with_status("mem://rss", 503);
        let (status, _, _) = get(build_app(source), "/feeds/hn/10").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
