//! Language tag extraction from audio file names

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Compile a regex literal once and reuse it.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// A 3-letter language code, compared case-sensitively
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the language tag from a file name like `voice-over-deu.wav`.
///
/// The tag must be exactly three word characters, preceded by a hyphen and
/// followed by the final extension. Returns `None` when the name has no such
/// suffix.
pub fn extract_language_tag(filename: &str) -> Option<LanguageTag> {
    regex!(r"-(\w{3})\.\w+$")
        .captures(filename)
        .map(|caps| LanguageTag::new(&caps[1]))
}

/// Same as [`extract_language_tag`], for a path.
pub fn language_tag_for_path(path: &Path) -> Option<LanguageTag> {
    extract_language_tag(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_suffix() {
        assert_eq!(
            extract_language_tag("clip-fra.wav"),
            Some(LanguageTag::new("fra"))
        );
    }

    #[test]
    fn test_rightmost_suffix_wins() {
        assert_eq!(
            extract_language_tag("movie-eng-deu.flac"),
            Some(LanguageTag::new("deu"))
        );
    }

    #[test]
    fn test_mid_name_tag_rejected() {
        assert_eq!(extract_language_tag("clip-fra.wav.bak-x"), None);
        assert_eq!(extract_language_tag("clip-fra.tar.gz"), None);
    }

    #[test]
    fn test_no_tag() {
        assert_eq!(extract_language_tag("voice.wav"), None);
        assert_eq!(extract_language_tag("voice-en.wav"), None);
        assert_eq!(extract_language_tag("voice-fra"), None);
        assert_eq!(extract_language_tag(""), None);
    }

    #[test]
    fn test_case_is_preserved() {
        let tag = extract_language_tag("clip-ENG.m4a").unwrap();
        assert_eq!(tag.as_str(), "ENG");
        assert_ne!(tag, LanguageTag::new("eng"));
    }

    #[test]
    fn test_path_with_directories() {
        let path = Path::new("/media/dubs-2024/take-ita.aac");
        assert_eq!(language_tag_for_path(path), Some(LanguageTag::new("ita")));
    }
}
