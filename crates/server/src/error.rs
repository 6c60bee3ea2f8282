//! HTTP-facing errors.
//!
//! | variant                         | status |
//! |---------------------------------|--------|
//! | `InvalidThreshold`              | 400    |
//! | `Upstream`, feed unreachable    | 502    |
//! | `Upstream`, anything else       | 500    |
//! | `Serialize`                     | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use feed_source::FeedError;
use pipeline::EngineError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    /// The path parameter is not a non-negative integer
    #[error("Provided min_points must be an integer")]
    InvalidThreshold(String),

    /// Fetching/parsing the outer feed failed, or the run lost outcomes
    #[error(transparent)]
    Upstream(#[from] EngineError),

    #[error("Error expanding to XML: {0}")]
    Serialize(FeedError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidThreshold(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(err) if err.is_upstream_unreachable() => StatusCode::BAD_GATEWAY,
            AppError::Upstream(_) | AppError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::BAD_REQUEST => warn!("Rejected request: {:?}", self),
            _ => error!("Request failed with {}: {}", status, self),
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidThreshold("abc".to_string()).status(),
            StatusCode::BAD_REQUEST
        );

        let unreachable = EngineError::Feed(FeedError::Unreachable {
            uri: "https://news.ycombinator.com/rss".to_string(),
            reason: "connection refused".to_string(),
        });
        assert_eq!(AppError::from(unreachable).status(), StatusCode::BAD_GATEWAY);

        let bad_status = EngineError::Feed(FeedError::Status {
            uri: "https://news.ycombinator.com/rss".to_string(),
            status: 500,
        });
        assert_eq!(
            AppError::from(bad_status).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let client = EngineError::Feed(FeedError::Client("no TLS backend".to_string()));
        assert_eq!(AppError::from(client).status(), StatusCode::INTERNAL_SERVER_ERROR);

        let parse = EngineError::Feed(FeedError::Parse("eof".to_string()));
        assert_eq!(AppError::from(parse).status(), StatusCode::INTERNAL_SERVER_ERROR);

        let lost = EngineError::Coordination {
            expected: 2,
            received: 1,
        };
        assert_eq!(AppError::from(lost).status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            AppError::Serialize(FeedError::Serialize("io".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
