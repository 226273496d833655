//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::MergeRequest;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "dubmerge.toml";

/// Merge language-tagged dub tracks into a video, ducking the original audio
/// under every added track.
#[derive(Parser, Debug, Clone)]
#[command(name = "dubmerge")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video file whose audio streams are reconciled.
    pub video: PathBuf,

    /// Audio files named like `name-xxx.ext`, where xxx is the language code.
    #[arg(required = true)]
    pub audio_files: Vec<PathBuf>,

    /// Replace existing streams that have the same language.
    #[arg(short, long)]
    pub force: bool,

    /// Print the ffmpeg command without running it.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the structured remux command as JSON.
    #[arg(long)]
    pub json: bool,

    /// Output file (default: video name with the configured suffix).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file [default: dubmerge.toml, if present].
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Config path to load, and whether it was named explicitly
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        }
    }

    pub fn merge_request(&self) -> MergeRequest {
        MergeRequest {
            video: self.video.clone(),
            audio_files: self.audio_files.clone(),
            force: self.force,
            output: self.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags_anywhere() {
        let args = Args::try_parse_from([
            "dubmerge", "movie.mkv", "a-fra.wav", "--force", "b-ita.wav", "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.video, PathBuf::from("movie.mkv"));
        assert_eq!(
            args.audio_files,
            vec![PathBuf::from("a-fra.wav"), PathBuf::from("b-ita.wav")]
        );
        assert!(args.force);
        assert!(args.dry_run);
        assert!(!args.json);

        let request = args.merge_request();
        assert!(request.force);
        assert_eq!(request.output, None);
    }

    #[test]
    fn test_audio_file_required() {
        assert!(Args::try_parse_from(["dubmerge", "movie.mkv"]).is_err());
    }

    #[test]
    fn test_output_and_config() {
        let args = Args::try_parse_from([
            "dubmerge", "-o", "out.mkv", "-c", "my.toml", "movie.mkv", "a-fra.wav",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.mkv")));
        assert_eq!(args.config, Some(PathBuf::from("my.toml")));
        assert_eq!(args.config_path(), (PathBuf::from("my.toml"), true));
    }

    #[test]
    fn test_default_config_path_is_optional() {
        let args = Args::try_parse_from(["dubmerge", "movie.mkv", "a-fra.wav"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(
            args.config_path(),
            (PathBuf::from(DEFAULT_CONFIG_FILE), false)
        );
    }
}
