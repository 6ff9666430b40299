//! Tag input parsing.

/// Normalize a single tag: trims whitespace and collapses inner runs of
/// whitespace to one dash.
///
/// # Examples
/// ```
/// use papermemory_tags::normalize_tag;
/// assert_eq!(normalize_tag("  graph  neural "), Some("graph-neural".to_string()));
/// assert_eq!(normalize_tag("   "), None);
/// ```
pub fn normalize_tag(input: &str) -> Option<String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("-"))
}

/// Parse a comma-separated tag input into a tag list.
///
/// Empty entries are dropped and duplicates removed, keeping the first
/// occurrence so the user's display order survives.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    dedup_tags(input.split(',').filter_map(normalize_tag))
}

/// Remove duplicate tags while preserving order.
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
