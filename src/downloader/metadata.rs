use std::sync::LazyLock;

use regex::Regex;

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<version>\s*([^<\s][^<]*?)\s*</version>").unwrap());

/// Every `<version>` value of a `maven-metadata.xml`, in document order.
/// Duplicates are kept.
pub fn extract_versions(document: &str) -> Vec<String> {
    VERSION
        .captures_iter(document)
        .map(|caps| caps[1].to_string())
        .collect()
}
