//! Language handling
//!
//! - Extracting the language tag from an audio file name
//! - Mapping tags to display names for track titles

pub mod names;
pub mod tag;

pub use names::display_name;
pub use tag::{extract_language_tag, language_tag_for_path, LanguageTag};
