//! # Cache Paths
//!
//! Naming of the files the bridge keeps under its cache directory.

use crate::domain::types::TimelineKey;

pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const TIMELINE_FILE_PREFIX: &str = "timeline_";
pub const TIMELINE_FILE_EXT: &str = "json";

/// File name of the persisted snapshot for a timeline (e.g. "timeline_home.json")
pub fn timeline_file_name(key: &TimelineKey) -> String {
    format!("{}{}.{}", TIMELINE_FILE_PREFIX, file_stem(key), TIMELINE_FILE_EXT)
}

fn file_stem(key: &TimelineKey) -> String {
    match key {
        TimelineKey::Custom(name) => {
            let sanitized: String = name
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("custom_{}", sanitized)
        }
        other => other.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_file_names() {
        assert_eq!(timeline_file_name(&TimelineKey::Home), "timeline_home.json");
        assert_eq!(timeline_file_name(&TimelineKey::Local), "timeline_local.json");
        assert_eq!(timeline_file_name(&TimelineKey::Public), "timeline_public.json");
    }

    #[test]
    fn test_custom_names_are_sanitized() {
        let key = TimelineKey::Custom("tag/rust lang".to_string());
        assert_eq!(timeline_file_name(&key), "timeline_custom_tag_rust_lang.json");
    }
}
