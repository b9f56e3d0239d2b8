use std::sync::LazyLock;

use regex::Regex;

// double-quoted, single-quoted or bare attribute value
static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// Anchor targets of a directory listing that look like files.
///
/// Parent references (`../`) and sub-directories (trailing `/`) are dropped.
/// Everything else is returned as written, in document order.
pub fn extract_file_names(document: &str) -> Vec<String> {
    HREF.captures_iter(document)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|href| href.as_str().trim().to_string())
        .filter(|href| !href.is_empty())
        .filter(|href| !href.starts_with("../") && href != "..")
        .filter(|href| !href.ends_with('/'))
        .collect()
}

/// False for hrefs pointing elsewhere: absolute URLs, queries, fragments.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['?', '#', ':'])
}

/// Extension after the last `.`, if any.
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}
