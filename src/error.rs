use thiserror::Error;

/// Main error type for a merge run
#[derive(Error, Debug)]
pub enum MergeError {
    /// An audio file name does not carry a `-xxx.ext` language suffix
    #[error(
        "Audio language could not be determined for file '{filename}'. \
         Name the file foobar-CC3.ext where CC3 is an ISO 3-letter language code."
    )]
    UnresolvableLanguageTag { filename: String },

    /// A new track's language already exists in the container and override was not requested
    #[error("The language {0} already exists in the master video. Use --force to override.")]
    LanguageConflict(String),

    /// More than one existing stream carries the language of a replacing track
    #[error("Language {language} is carried by several existing audio streams ({indices:?}); refusing to pick a replacement target")]
    AmbiguousReplacementTarget { language: String, indices: Vec<u32> },

    /// The probe tool output could not be used
    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    /// The remux tool exited abnormally
    #[error("Remux failed: {0}")]
    RemuxFailure(String),

    /// An external tool could not be started
    #[error("Failed to start {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_language() {
        let err = MergeError::LanguageConflict("deu".to_string());
        assert!(err.to_string().contains("deu"));
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn test_unresolvable_tag_message_names_file() {
        let err = MergeError::UnresolvableLanguageTag {
            filename: "voice.wav".to_string(),
        };
        assert!(err.to_string().contains("'voice.wav'"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MergeError = io.into();
        assert!(matches!(err, MergeError::Io(_)));
    }
}
