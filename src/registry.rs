//! Stream registry
//!
//! Holds the two tables the planner works from:
//! - Existing audio streams, as reported by the probe
//! - Candidate audio inputs, as supplied on the command line

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{MergeError, Result};
use crate::language::{language_tag_for_path, LanguageTag};

/// Audio stream already present in the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingStream {
    /// Stream index in the source container
    pub container_index: u32,
    /// Language tag, `None` when absent or undetermined
    pub language: Option<LanguageTag>,
}

impl ExistingStream {
    pub fn new(container_index: u32, language: Option<&str>) -> Self {
        Self {
            container_index,
            language: language.map(LanguageTag::new),
        }
    }
}

/// New audio file supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateInput {
    /// 0-based position among the supplied audio files
    pub ordinal: usize,
    /// Path of the audio file
    pub source: PathBuf,
    /// Language derived from the file name
    pub language: LanguageTag,
}

impl CandidateInput {
    /// Input number of this file in the remux command. Input 0 is the video.
    pub fn input_number(&self) -> usize {
        self.ordinal + 1
    }

    /// Build candidates from audio paths, in the order given.
    ///
    /// Fails on the first path whose name carries no language tag.
    pub fn from_paths<I, P>(paths: I) -> Result<Vec<CandidateInput>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .enumerate()
            .map(|(ordinal, path)| {
                let source: PathBuf = path.into();
                let language = language_tag_for_path(&source).ok_or_else(|| {
                    MergeError::UnresolvableLanguageTag {
                        filename: source.display().to_string(),
                    }
                })?;
                Ok(CandidateInput {
                    ordinal,
                    source,
                    language,
                })
            })
            .collect()
    }
}

/// Existing streams and candidate inputs for one run
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    pub existing: Vec<ExistingStream>,
    pub candidates: Vec<CandidateInput>,
}

impl StreamRegistry {
    pub fn new(existing: Vec<ExistingStream>, candidates: Vec<CandidateInput>) -> Self {
        Self {
            existing,
            candidates,
        }
    }

    /// Languages present among the existing streams, undetermined ones excluded
    pub fn existing_languages(&self) -> BTreeSet<&LanguageTag> {
        self.existing
            .iter()
            .filter_map(|s| s.language.as_ref())
            .collect()
    }

    /// Existing streams carrying the given language, in probe order
    pub fn existing_with_language<'a>(
        &'a self,
        language: &'a LanguageTag,
    ) -> impl Iterator<Item = &'a ExistingStream> + 'a {
        self.existing
            .iter()
            .filter(move |s| s.language.as_ref() == Some(language))
    }

    /// One past the highest existing container index, or 0 without streams
    pub fn next_free_slot(&self) -> Result<u32> {
        match self.existing.iter().map(|s| s.container_index).max() {
            None => Ok(0),
            Some(highest) => highest.checked_add(1).ok_or_else(|| {
                MergeError::ProbeFailure(format!(
                    "stream index {} leaves no free output slot",
                    highest
                ))
            }),
        }
    }

    pub fn has_existing_audio(&self) -> bool {
        !self.existing.is_empty()
    }
}
