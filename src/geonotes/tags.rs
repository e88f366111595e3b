//! Hashtag extraction for note text.
//!
//! A hashtag is a `#` followed by one or more word characters. Word characters
//! follow Unicode rules, so `#تهران` is as valid as `#rust`. The `#` itself is
//! not part of the tag.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));

/// Extracts hashtags from `text` in order of appearance.
///
/// Duplicates are kept; a note that mentions `#a` twice carries it twice.
///
/// ```
/// use geonotes::tags::extract_hashtags;
///
/// assert_eq!(extract_hashtags("hello #world and #rust"), vec!["world", "rust"]);
/// assert!(extract_hashtags("no tags here").is_empty());
/// ```
pub fn extract_hashtags(text: &str) -> Vec<String> {
    if !text.contains('#') {
        return Vec::new();
    }
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
