// Dashboard page.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use tracing::warn;

use crate::http::Controller;

pub const INDEX_FILE: &str = "index.html";

/// IndexController serves `index.html` from the configured static directory.
/// The file is read per request so it can be edited without a restart.
#[derive(Clone)]
pub struct IndexController {
    static_dir: PathBuf,
}

impl IndexController {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    async fn index(&self) -> Response {
        let path = self.static_dir.join(INDEX_FILE);
        match tokio::fs::read(&path).await {
            Ok(html) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                html,
            )
                .into_response(),
            Err(e) => {
                warn!(component = "index", path = ?path, error = %e, "dashboard page unavailable");
                (StatusCode::NOT_FOUND, "index.html not found").into_response()
            }
        }
    }
}

impl Controller for IndexController {
    fn add_route(&self, router: Router) -> Router {
        let controller = self.clone();
        router.route(
            "/",
            get(move || {
                let controller = controller.clone();
                async move { controller.index().await }
            }),
        )
    }
}
