//! Reconciliation planner - decides keep / replace / add per stream

use serde::Serialize;

use crate::config::{DuckingConfig, DuplicateLanguagePolicy};
use crate::error::{MergeError, Result};
use crate::registry::{CandidateInput, ExistingStream, StreamRegistry};

use super::mix::{build_mix_graph, MixGraph};

/// Decision for one output audio stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Disposition {
    /// Copy the existing stream unchanged
    Keep(ExistingStream),
    /// Substitute the existing stream with a new track of the same language
    Replace {
        existing: ExistingStream,
        candidate: CandidateInput,
    },
    /// Append a new track, ducking the original audio underneath it
    Add {
        candidate: CandidateInput,
        /// Output slot assigned to the new stream
        slot: u32,
        /// `None` only when the container has no audio to duck
        mix: Option<MixGraph>,
    },
}

impl Disposition {
    /// Output stream slot this disposition produces
    pub fn output_slot(&self) -> u32 {
        match self {
            Disposition::Keep(existing) => existing.container_index,
            Disposition::Replace { existing, .. } => existing.container_index,
            Disposition::Add { slot, .. } => *slot,
        }
    }

    /// New track feeding this slot, if any
    pub fn candidate(&self) -> Option<&CandidateInput> {
        match self {
            Disposition::Keep(_) => None,
            Disposition::Replace { candidate, .. } | Disposition::Add { candidate, .. } => {
                Some(candidate)
            }
        }
    }
}

/// Ordered result of reconciliation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputPlan {
    /// Keep/Replace entries in probe order, then Add entries in caller order
    pub dispositions: Vec<Disposition>,
    /// First slot handed to added streams
    pub next_free_slot: u32,
}

impl OutputPlan {
    /// Added streams, in slot order
    pub fn additions(&self) -> impl Iterator<Item = &Disposition> {
        self.dispositions
            .iter()
            .filter(|d| matches!(d, Disposition::Add { .. }))
    }

    /// Replaced streams, in probe order
    pub fn replacements(&self) -> impl Iterator<Item = &Disposition> {
        self.dispositions
            .iter()
            .filter(|d| matches!(d, Disposition::Replace { .. }))
    }

    /// Every new track referenced by the plan, each once, in ordinal order
    pub fn candidates(&self) -> Vec<&CandidateInput> {
        let mut candidates: Vec<&CandidateInput> =
            self.dispositions.iter().filter_map(|d| d.candidate()).collect();
        candidates.sort_by_key(|c| c.ordinal);
        candidates.dedup_by_key(|c| c.ordinal);
        candidates
    }
}

/// Planner inputs besides the registry
#[derive(Debug, Clone, Default)]
pub struct PlannerOptions {
    /// Allow new tracks to replace existing streams of the same language
    pub force_override: bool,
    pub duplicate_policy: DuplicateLanguagePolicy,
    pub ducking: DuckingConfig,
}

/// Reconcile the candidates against the existing streams.
///
/// Fails without producing anything when a candidate's language already
/// exists and `force_override` is off, or when the duplicate policy rejects
/// an ambiguous replacement.
pub fn plan_streams(registry: &StreamRegistry, options: &PlannerOptions) -> Result<OutputPlan> {
    let existing_languages = registry.existing_languages();

    if !options.force_override {
        if let Some(conflict) = registry
            .candidates
            .iter()
            .find(|c| existing_languages.contains(&c.language))
        {
            return Err(MergeError::LanguageConflict(conflict.language.to_string()));
        }
    }

    // Replacing candidate per language: the first one in caller order.
    let replacing_position = |existing: &ExistingStream| -> Option<usize> {
        let language = existing.language.as_ref()?;
        registry
            .candidates
            .iter()
            .position(|c| &c.language == language)
    };

    if options.duplicate_policy == DuplicateLanguagePolicy::Reject {
        for candidate in &registry.candidates {
            let indices: Vec<u32> = registry
                .existing_with_language(&candidate.language)
                .map(|s| s.container_index)
                .collect();
            if indices.len() > 1 {
                return Err(MergeError::AmbiguousReplacementTarget {
                    language: candidate.language.to_string(),
                    indices,
                });
            }
        }
    }

    let mut consumed = vec![false; registry.candidates.len()];
    let mut dispositions = Vec::with_capacity(registry.existing.len() + registry.candidates.len());

    for existing in &registry.existing {
        match replacing_position(existing) {
            Some(pos) => {
                let candidate = &registry.candidates[pos];
                tracing::debug!(
                    "Replacing stream {} ({}) with {}",
                    existing.container_index,
                    candidate.language,
                    candidate.source.display()
                );
                consumed[pos] = true;
                dispositions.push(Disposition::Replace {
                    existing: existing.clone(),
                    candidate: candidate.clone(),
                });
            }
            None => {
                tracing::debug!("Keeping stream {}", existing.container_index);
                dispositions.push(Disposition::Keep(existing.clone()));
            }
        }
    }

    let next_free_slot = registry.next_free_slot()?;
    let mut next_slot = Some(next_free_slot);
    for (pos, candidate) in registry.candidates.iter().enumerate() {
        if consumed[pos] {
            continue;
        }
        let slot = next_slot.ok_or_else(|| {
            MergeError::ProbeFailure(format!(
                "no output slot left for {}",
                candidate.source.display()
            ))
        })?;
        let mix = if registry.has_existing_audio() {
            Some(build_mix_graph(candidate.input_number(), &options.ducking))
        } else {
            tracing::warn!(
                "No existing audio to duck under {}; mapping it directly",
                candidate.source.display()
            );
            None
        };
        tracing::debug!(
            "Adding {} ({}) as stream {}",
            candidate.source.display(),
            candidate.language,
            slot
        );
        dispositions.push(Disposition::Add {
            candidate: candidate.clone(),
            slot,
            mix,
        });
        next_slot = slot.checked_add(1);
    }

    Ok(OutputPlan {
        dispositions,
        next_free_slot,
    })
}
