/// Name used when the client supplies no usable filename.
pub const FALLBACK_FILENAME: &str = "unnamed";

/// Sanitizes a client-supplied filename so it can be embedded in a stored name.
///
/// Only the last path component is kept, split on the host's path
/// separators, and control characters are replaced with `_`. Content, type
/// and size are not checked.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(std::path::is_separator)
        .next()
        .unwrap_or_default();

    let cleaned: String = name
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    if cleaned.trim().is_empty() || cleaned == "." || cleaned == ".." {
        return FALLBACK_FILENAME.to_string();
    }

    cleaned
}
