//! Stored-name encoding for the flat storage directory.
//!
//! Every ingested file is written as `{uuid}-{base}{extension}`. The
//! directory listing is the only metadata store, so the original name is
//! recovered by stripping exactly one hyphenated UUID prefix.

use uuid::Uuid;

/// Length of a canonical hyphenated UUID (`8-4-4-4-12`).
const UUID_LEN: usize = 36;

/// Result of decoding a directory entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedName {
    /// The entry carries an ingest prefix.
    Tagged { id: Uuid, original_name: String },
    /// The entry was placed by something other than ingest; its raw name is
    /// used as-is.
    Untagged { original_name: String },
}

impl DecodedName {
    pub fn original_name(&self) -> &str {
        match self {
            DecodedName::Tagged { original_name, .. } => original_name,
            DecodedName::Untagged { original_name } => original_name,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            DecodedName::Tagged { id, .. } => Some(*id),
            DecodedName::Untagged { .. } => None,
        }
    }
}

/// Builds the stored name for an upload.
///
/// `original_name` is expected to be sanitized already (no path separators).
pub fn encode(id: Uuid, original_name: &str) -> String {
    let (base, extension) = split_extension(original_name);
    format!("{}-{}{}", id.hyphenated(), base, extension)
}

/// Recovers the original name from a stored name.
///
/// Only a prefix at position 0 is recognised, and only one prefix is
/// stripped, so an uploaded name that itself starts with a UUID survives the
/// round trip. A name with no prefix, or with nothing after the prefix, falls
/// back to [`DecodedName::Untagged`].
pub fn decode(stored_name: &str) -> DecodedName {
    if let Some((id, rest)) = split_prefix(stored_name) {
        return DecodedName::Tagged {
            id,
            original_name: rest.trim().to_string(),
        };
    }

    DecodedName::Untagged {
        original_name: stored_name.to_string(),
    }
}

fn split_prefix(stored_name: &str) -> Option<(Uuid, &str)> {
    let prefix = stored_name.get(..UUID_LEN)?;
    let rest = stored_name[UUID_LEN..].strip_prefix('-')?;
    if rest.is_empty() {
        return None;
    }

    // A 36-char input only parses in the hyphenated form.
    let id = Uuid::try_parse(prefix).ok()?;
    Some((id, rest))
}

/// Splits a file name into base name and extension.
///
/// The extension starts at the last `.` and keeps the dot. Names without a
/// dot, and names whose only dots are leading (`.env`, `..cfg`), have no
/// extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}
