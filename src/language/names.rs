//! Display names for the language tags we commonly see

use super::LanguageTag;

/// Native display name per ISO 639-2 code.
static DISPLAY_NAMES: &[(&str, &str)] = &[
    ("eng", "English"),
    ("deu", "Deutsch"),
    ("fra", "Français"),
    ("spa", "Español"),
    ("ita", "Italiano"),
    ("por", "Português"),
    ("nld", "Nederlands"),
    ("swe", "Svenska"),
    ("fin", "Suomi"),
    ("dan", "Dansk"),
    ("nor", "Norsk"),
    ("pol", "Polski"),
    ("ces", "Čeština"),
    ("hun", "Magyar"),
    ("ron", "Română"),
];

/// Look up the display name for a tag, if it is in the table
pub fn lookup_display_name(tag: &LanguageTag) -> Option<&'static str> {
    DISPLAY_NAMES
        .iter()
        .find(|(code, _)| *code == tag.as_str())
        .map(|(_, name)| *name)
}

/// Display name for a tag, falling back to the raw tag
pub fn display_name(tag: &LanguageTag) -> String {
    lookup_display_name(tag)
        .map(str::to_string)
        .unwrap_or_else(|| tag.to_string())
}
