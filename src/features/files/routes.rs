use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};
use std::sync::Arc;

use crate::features::files::handlers::{get_file, list_files, upload_file};
use crate::features::files::services::FileService;

/// Create routes for the files feature
///
/// Metadata lookups are only mounted when persistence is enabled.
pub fn routes(file_service: Arc<FileService>, max_body_size: usize) -> Router {
    let mut router = Router::new().route(
        "/api/files/upload",
        post(upload_file).layer(DefaultBodyLimit::max(max_body_size)),
    );

    if file_service.persistence_enabled() {
        router = router
            .route("/api/files", get(list_files))
            .route("/api/files/{id}", get(get_file));
    }

    router.with_state(file_service)
}
