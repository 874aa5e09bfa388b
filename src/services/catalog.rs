use crate::models::{FileListPage, FileListingEntry, ListFilesQuery};
use crate::services::storage::{StorageResult, StorageService, StoredObject};
use crate::utils::naming;
use std::cmp::Ordering;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    OriginalName,
    Size,
    #[default]
    DateUploaded,
}

impl SortField {
    /// Unknown or missing values fall back to `dateUploaded`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("originalName") => SortField::OriginalName,
            Some("size") => SortField::Size,
            Some("dateUploaded") => SortField::DateUploaded,
            _ => SortField::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Normalized listing request. Construction never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page_size: usize,
    pub page: usize,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl From<&ListFilesQuery> for ListQuery {
    fn from(raw: &ListFilesQuery) -> Self {
        let default = Self::default();

        Self {
            page_size: parse_count(raw.page_size.as_deref())
                .filter(|&n| n > 0)
                .unwrap_or(default.page_size),
            page: parse_count(raw.page.as_deref()).unwrap_or(default.page),
            sort_field: SortField::parse(raw.sort_field.as_deref()),
            sort_order: SortOrder::parse(raw.sort_order.as_deref()),
        }
    }
}

/// Reads the leading decimal digits after optional whitespace and `+`, so
/// `5abc` is 5 and `1.0` is 1. Negative or digit-less values yield `None`.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    let value = raw?.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..end].parse().ok()
}

/// Builds a listing entry from a raw directory object.
pub fn to_entry(object: StoredObject) -> FileListingEntry {
    let decoded = naming::decode(&object.stored_name);

    FileListingEntry {
        original_name: decoded.original_name().to_string(),
        size: object.size,
        date_uploaded: object.created_at,
        stored_name: object.stored_name,
    }
}

/// Sorts in place. Ties on the chosen field are broken by stored name so the
/// result does not depend on directory enumeration order.
pub fn sort_entries(entries: &mut [FileListingEntry], field: SortField, order: SortOrder) {
    entries.sort_by(|a, b| {
        let ordering = compare_field(a, b, field).then_with(|| a.stored_name.cmp(&b.stored_name));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_field(a: &FileListingEntry, b: &FileListingEntry, field: SortField) -> Ordering {
    match field {
        SortField::OriginalName => a.original_name.cmp(&b.original_name),
        SortField::Size => a.size.cmp(&b.size),
        SortField::DateUploaded => a.date_uploaded.cmp(&b.date_uploaded),
    }
}

/// Offset-based page; an out-of-range page is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    items
        .into_iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .collect()
}

pub struct CatalogService {
    storage: Arc<dyn StorageService>,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Scans storage from scratch and returns the requested page.
    pub async fn list(&self, query: &ListQuery) -> StorageResult<FileListPage> {
        let objects = self.storage.list_objects().await?;

        let mut entries: Vec<FileListingEntry> = objects.into_iter().map(to_entry).collect();
        sort_entries(&mut entries, query.sort_field, query.sort_order);

        let total_files_count = entries.len();
        let files_list = paginate(entries, query.page, query.page_size);

        tracing::debug!(
            total = total_files_count,
            returned = files_list.len(),
            page = query.page,
            page_size = query.page_size,
            "Catalog listing built"
        );

        Ok(FileListPage {
            files_list,
            total_files_count,
        })
    }
}
