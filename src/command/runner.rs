//! Remux execution

use std::process::Command;

use crate::error::{MergeError, Result};

use super::RemuxCommand;

/// Consumer of a finished remux command
pub trait Remuxer {
    fn remux(&self, command: &RemuxCommand) -> Result<()>;
}

/// Runs ffmpeg as a subprocess, inheriting stdio so progress stays visible
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegRemuxer;

impl Remuxer for FfmpegRemuxer {
    fn remux(&self, command: &RemuxCommand) -> Result<()> {
        let status = Command::new(&command.program)
            .args(command.to_args())
            .status()
            .map_err(|e| MergeError::ToolSpawn {
                tool: command.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(MergeError::RemuxFailure(format!(
                "{} exited with {}",
                command.program, status
            )));
        }
        Ok(())
    }
}

/// Prints the command instead of running it
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRemuxer;

impl Remuxer for DryRunRemuxer {
    fn remux(&self, command: &RemuxCommand) -> Result<()> {
        tracing::info!("Dry run, not executing {}", command.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn command(program: &str) -> RemuxCommand {
        RemuxCommand {
            program: program.to_string(),
            inputs: vec![PathBuf::from("movie.mkv")],
            stream_mappings: vec![],
            metadata: vec![],
            output_path: PathBuf::from("movie-out.mkv"),
            overwrite: true,
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = FfmpegRemuxer
            .remux(&command("/nonexistent/dubmerge-test-ffmpeg"))
            .unwrap_err();
        assert!(matches!(err, MergeError::ToolSpawn { .. }));
    }

    #[test]
    fn test_dry_run_does_nothing() {
        assert!(DryRunRemuxer
            .remux(&command("/nonexistent/dubmerge-test-ffmpeg"))
            .is_ok());
    }
}
