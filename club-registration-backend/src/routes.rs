pub mod clubs;
pub mod overview;
pub mod registration;
pub mod students;

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::roster::Roster;

/// Request bodies are tiny JSON objects.
pub const MAX_BODY_SIZE: usize = 16 * 1024;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Panicked.into_response()
}

fn catch_panic() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

/// The whole JSON API. Unknown paths get a JSON 404, a known path with the wrong
/// method a 405.
pub fn router(roster: Arc<Roster>) -> Router {
    Router::new()
        .route("/clubs", get(clubs::list))
        .route("/clubs/:club_id/roster", get(clubs::members))
        .route("/clubs/:club_id/roster.csv", get(clubs::members_csv))
        .route("/clubs/:club_id/capacity", post(clubs::capacity))
        .route("/students/:student_id/clubs", get(students::clubs))
        .route("/overview", get(overview::overview))
        .route("/overview.csv", get(overview::clubs_csv))
        .route("/unregistered.csv", get(overview::unregistered))
        .route("/register", post(registration::register))
        .route("/cancel", post(registration::cancel))
        .route("/auto-assign", post(registration::auto_assign))
        .fallback(not_found)
        .with_state(roster)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(catch_panic())
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound {
        method: method.to_string(),
        path: uri.path().to_owned(),
    }
}

/// A CSV download, `file_name` is what the browser saves it as.
pub fn csv_response(file_name: &str, csv: String) -> Response {
    let file_name: String = file_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    (
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt as _;

    use super::*;

    #[tokio::test]
    async fn panicking_handler_becomes_a_json_500() {
        let app: Router = Router::new()
            .route("/boom", get(|| async { panic!("handler blew up") as () }))
            .layer(catch_panic());

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            mime::APPLICATION_JSON.as_ref()
        );
    }

    #[test]
    fn csv_file_name_is_sanitized() {
        let response = csv_response("roster-C001\"; evil.csv", String::new());
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"roster-C001evil.csv\""
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            mime::TEXT_CSV_UTF_8.as_ref()
        );
    }
}
