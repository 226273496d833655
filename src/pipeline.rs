//! One merge run: resolve tags, probe, plan, emit, remux
//!
//! Every fallible step before the remux happens up front, so a failure
//! never leaves a partial output behind.

use std::path::PathBuf;

use crate::command::{build_remux_command, output_path_for, RemuxCommand, Remuxer};
use crate::config::MergeConfig;
use crate::error::Result;
use crate::plan::{plan_streams, OutputPlan, PlannerOptions};
use crate::probe::MediaProber;
use crate::registry::{CandidateInput, StreamRegistry};

/// What the caller asked for
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub video: PathBuf,
    pub audio_files: Vec<PathBuf>,
    /// Allow replacing existing languages
    pub force: bool,
    /// Explicit output path instead of the suffixed video name
    pub output: Option<PathBuf>,
}

/// A validated plan and the command that realizes it
#[derive(Debug, Clone)]
pub struct PreparedMerge {
    pub plan: OutputPlan,
    pub command: RemuxCommand,
}

impl PreparedMerge {
    /// Hand the command to the remuxer
    pub fn execute(&self, remuxer: &dyn Remuxer) -> Result<()> {
        remuxer.remux(&self.command)?;
        tracing::info!("Remux finished: {}", self.command.output_path.display());
        Ok(())
    }
}

/// Build the plan and command without touching any output
pub fn prepare_merge(
    request: &MergeRequest,
    config: &MergeConfig,
    prober: &dyn MediaProber,
) -> Result<PreparedMerge> {
    config.validate()?;

    let candidates = CandidateInput::from_paths(request.audio_files.iter().cloned())?;
    let existing = prober.probe_audio_streams(&request.video)?;

    tracing::info!(
        "Video file {} has existing audio streams: {}",
        request.video.display(),
        describe_existing(&existing)
    );
    tracing::info!(
        "New audio streams to add or replace: {}",
        candidates
            .iter()
            .map(|c| c.language.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let registry = StreamRegistry::new(existing, candidates);
    let options = PlannerOptions {
        force_override: request.force,
        duplicate_policy: config.planner.duplicate_language_policy,
        ducking: config.ducking.clone(),
    };
    let plan = plan_streams(&registry, &options)?;

    let output_path = request
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&request.video, &config.output.suffix));
    let command = build_remux_command(&request.video, &plan, output_path, config);
    tracing::info!("Remux command: {}", command.command_line());

    Ok(PreparedMerge { plan, command })
}

fn describe_existing(existing: &[crate::registry::ExistingStream]) -> String {
    if existing.is_empty() {
        return "none".to_string();
    }
    existing
        .iter()
        .map(|s| match &s.language {
            Some(lang) => format!("{}={}", s.container_index, lang),
            None => format!("{}=und", s.container_index),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
