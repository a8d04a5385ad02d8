use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
        )
    ),
    tags(
        (name = "files", description = "File upload and stored file metadata"),
    )
)]
pub struct ApiDoc;

/// Overrides the document info with configured values
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_file_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/files/upload"));
        assert!(doc.paths.paths.contains_key("/api/files"));
        assert!(doc.paths.paths.contains_key("/api/files/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Storage".to_string(),
            version: "2.0.0".to_string(),
            description: "Uploads".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Storage");
        assert_eq!(doc.info.version, "2.0.0");
        assert_eq!(doc.info.description.as_deref(), Some("Uploads"));
    }
}
