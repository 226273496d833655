//! ffprobe invocation

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{MergeError, Result};
use crate::registry::ExistingStream;

use super::{parse_probe_output, MediaProber};

/// Runs ffprobe as a subprocess
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: String,
}

impl FfprobeProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments listing index and language of every audio stream
    pub fn probe_args(video: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-show_entries",
            "stream=index:stream_tags=language",
            "-select_streams",
            "a",
            "-of",
            "default=noprint_wrappers=1",
        ]
        .iter()
        .map(|s| OsString::from(*s))
        .collect();
        args.push(video.as_os_str().to_os_string());
        args
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MediaProber for FfprobeProber {
    fn probe_audio_streams(&self, video: &Path) -> Result<Vec<ExistingStream>> {
        let args = Self::probe_args(video);
        tracing::debug!(
            "Running {} {}",
            self.program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| MergeError::ToolSpawn {
                tool: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MergeError::ProbeFailure(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| MergeError::ProbeFailure(format!("output is not UTF-8: {}", e)))?;
        parse_probe_output(&stdout)
    }
}
