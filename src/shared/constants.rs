/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// UPLOAD DEFAULTS
// =============================================================================

/// Multipart field carrying file content
pub const FILE_FIELD_NAME: &str = "file";

/// Transfer encoding reported when a part does not declare one
pub const DEFAULT_ENCODING: &str = "7bit";

/// MIME type reported when a part does not declare one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
