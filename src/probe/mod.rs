//! Probing existing audio streams
//!
//! - Parsing ffprobe key/value output into existing streams
//! - Running ffprobe against the video file

pub mod ffprobe;
pub mod parser;

use std::path::Path;

use crate::error::Result;
use crate::registry::ExistingStream;

pub use ffprobe::FfprobeProber;
pub use parser::parse_probe_output;

/// Source of the existing audio stream table for a container
pub trait MediaProber {
    /// Audio streams of `video`, in the container's native order
    fn probe_audio_streams(&self, video: &Path) -> Result<Vec<ExistingStream>>;
}
