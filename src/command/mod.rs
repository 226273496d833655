//! Remux command generation and execution
//!
//! - Mapping the output plan to ffmpeg inputs, stream maps and metadata
//! - Output file naming
//! - Running ffmpeg, or only printing it for a dry run

pub mod emitter;
pub mod runner;

pub use emitter::{
    build_remux_command, output_path_for, CodecChoice, MetadataAssignment, RemuxCommand,
    StreamMapping, StreamSource,
};
pub use runner::{DryRunRemuxer, FfmpegRemuxer, Remuxer};
