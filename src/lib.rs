//! dubmerge
//!
//! Reconciles language-tagged audio files against the audio streams of a
//! video container and builds an ffmpeg remux that replaces, keeps, or adds
//! streams. Added streams get a sidechain-ducking graph so the original
//! audio drops underneath the new voice track.

pub mod cli;
pub mod command;
pub mod config;
pub mod config_file;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod plan;
pub mod probe;
pub mod registry;

pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use pipeline::{prepare_merge, MergeRequest, PreparedMerge};
