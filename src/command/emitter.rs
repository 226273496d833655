//! Renders an output plan into an ffmpeg remux command

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::MergeConfig;
use crate::language::display_name;
use crate::plan::{Disposition, OutputPlan};

/// Where an output stream comes from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StreamSource {
    /// Stream of a command input, e.g. `0:2` or `1:a:0`
    Input { input: usize, selector: String },
    /// Output pad of a filter graph
    FilterGraph { graph: String, output: String },
}

impl StreamSource {
    fn map_arg(&self) -> String {
        match self {
            StreamSource::Input { input, selector } => format!("{}:{}", input, selector),
            StreamSource::FilterGraph { output, .. } => output.clone(),
        }
    }
}

/// Codec handling for a mapped stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CodecChoice {
    Copy,
    Encode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamMapping {
    pub source: StreamSource,
    pub output_slot: u32,
    pub codec: CodecChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataAssignment {
    pub output_slot: u32,
    pub key: String,
    pub value: String,
}

/// Structured remux command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemuxCommand {
    /// ffmpeg executable
    pub program: String,
    /// Input 0 is the video, then one input per new track in caller order
    pub inputs: Vec<PathBuf>,
    pub stream_mappings: Vec<StreamMapping>,
    pub metadata: Vec<MetadataAssignment>,
    pub output_path: PathBuf,
    pub overwrite: bool,
}

impl RemuxCommand {
    /// Argument vector, program name excluded. Paths are passed through as-is.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.as_os_str().to_os_string());
        }

        // Video is copied, global metadata comes from the original only.
        args.extend(
            ["-map", "0:v", "-c:v", "copy", "-map_metadata", "0"]
                .iter()
                .map(|s| OsString::from(*s)),
        );

        for mapping in &self.stream_mappings {
            if let StreamSource::FilterGraph { graph, .. } = &mapping.source {
                args.push("-filter_complex".into());
                args.push(graph.into());
            }
            args.push("-map".into());
            args.push(mapping.source.map_arg().into());
            if mapping.codec == CodecChoice::Copy {
                args.push(format!("-c:{}", mapping.output_slot).into());
                args.push("copy".into());
            }
        }

        for meta in &self.metadata {
            args.push(format!("-metadata:s:{}", meta.output_slot).into());
            args.push(format!("{}={}", meta.key, meta.value).into());
        }

        if self.overwrite {
            args.push("-y".into());
        }
        args.push(self.output_path.as_os_str().to_os_string());
        args
    }

    /// Printable command line, lossy for paths that are not UTF-8
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(
            self.to_args()
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

/// Output file name: the video's stem plus `suffix`, same extension and directory
pub fn output_path_for(video: &Path, suffix: &str) -> PathBuf {
    let mut name = video.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    name.push(suffix);
    if let Some(ext) = video.extension() {
        name.push(".");
        name.push(ext);
    }
    video.with_file_name(name)
}

/// Build the remux command for a finished plan
pub fn build_remux_command(
    video: &Path,
    plan: &OutputPlan,
    output_path: PathBuf,
    config: &MergeConfig,
) -> RemuxCommand {
    let mut inputs = vec![video.to_path_buf()];
    inputs.extend(plan.candidates().into_iter().map(|c| c.source.clone()));

    let mut stream_mappings = Vec::with_capacity(plan.dispositions.len());
    let mut metadata = Vec::new();

    for disposition in &plan.dispositions {
        let output_slot = disposition.output_slot();
        let (source, codec) = match disposition {
            Disposition::Keep(existing) => (
                StreamSource::Input {
                    input: 0,
                    selector: existing.container_index.to_string(),
                },
                CodecChoice::Copy,
            ),
            Disposition::Replace { candidate, .. }
            | Disposition::Add {
                candidate,
                mix: None,
                ..
            } => (
                StreamSource::Input {
                    input: candidate.input_number(),
                    selector: "a:0".to_string(),
                },
                CodecChoice::Encode,
            ),
            Disposition::Add {
                mix: Some(graph), ..
            } => (
                StreamSource::FilterGraph {
                    graph: graph.to_string(),
                    output: graph.output().map(|p| p.to_string()).unwrap_or_default(),
                },
                CodecChoice::Encode,
            ),
        };
        stream_mappings.push(StreamMapping {
            source,
            output_slot,
            codec,
        });

        if let Some(candidate) = disposition.candidate() {
            metadata.push(MetadataAssignment {
                output_slot,
                key: "language".to_string(),
                value: candidate.language.to_string(),
            });
            metadata.push(MetadataAssignment {
                output_slot,
                key: "title".to_string(),
                value: display_name(&candidate.language),
            });
        }
    }

    RemuxCommand {
        program: config.tools.ffmpeg.clone(),
        inputs,
        stream_mappings,
        metadata,
        output_path,
        overwrite: config.output.overwrite,
    }
}
