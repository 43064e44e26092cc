//! Tag and skill list normalization.

/// Trims, lower-cases and de-duplicates a list of tags, keeping first-seen
/// order and dropping empty entries.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Rust ".to_string(),
            "rust".to_string(),
            "".to_string(),
            "WebAssembly".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["rust", "webassembly"]);
    }
}
