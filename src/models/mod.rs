use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "file uploaded successfully";

/// One row of the directory listing, rebuilt from the stored name and a stat.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListingEntry {
    pub original_name: String,
    pub size: u64,
    #[serde(serialize_with = "serialize_iso_millis")]
    #[schema(value_type = String, example = "2024-05-01T10:20:30.123Z")]
    pub date_uploaded: DateTime<Utc>,
    /// Name on disk; used as the sort tie-break.
    #[serde(skip)]
    pub stored_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListPage {
    pub files_list: Vec<FileListingEntry>,
    pub total_files_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListFilesResponse {
    pub status: String,
    pub data: FileListPage,
}

impl ListFilesResponse {
    pub fn success(data: FileListPage) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
}

impl Default for UploadResponse {
    fn default() -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// OpenAPI description of the `/upload` form.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Raw `/files` query string. Every value stays a string so that garbage
/// degrades to a default instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    /// Entries per page (default 10)
    pub page_size: Option<String>,
    /// Zero-based page index (default 0)
    pub page: Option<String>,
    /// `originalName`, `size` or `dateUploaded` (default)
    pub sort_field: Option<String>,
    /// `asc` (default) or `desc`
    pub sort_order: Option<String>,
}

/// Formats like JavaScript's `Date#toISOString`: UTC, millisecond precision.
pub fn format_iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_iso_millis(ts))
}
