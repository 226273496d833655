//! Parser for ffprobe `default=noprint_wrappers=1` output
//!
//! The output is a flat list of `key=value` lines. An `index` line opens a
//! new stream record, and a `TAG:language` line attaches a language to the
//! record opened last.

use std::collections::BTreeSet;

use crate::error::{MergeError, Result};
use crate::language::LanguageTag;
use crate::registry::ExistingStream;

/// Language value ffprobe reports for undetermined streams
const UNDETERMINED: &str = "und";

/// Parse probe output into existing audio streams, in reported order
pub fn parse_probe_output(output: &str) -> Result<Vec<ExistingStream>> {
    if output.trim().is_empty() {
        return Err(MergeError::ProbeFailure("probe returned no output".to_string()));
    }

    let mut streams: Vec<ExistingStream> = Vec::new();
    let mut seen = BTreeSet::new();

    for (lineno, line) in output.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            MergeError::ProbeFailure(format!("line {}: expected key=value, got {:?}", lineno + 1, line))
        })?;

        match key {
            "index" => {
                // u32::MAX is reserved so the next slot always fits.
                let index: u32 = value
                    .trim()
                    .parse()
                    .ok()
                    .filter(|&i| i < u32::MAX)
                    .ok_or_else(|| {
                        MergeError::ProbeFailure(format!(
                            "line {}: invalid stream index {:?}",
                            lineno + 1,
                            value
                        ))
                    })?;
                if !seen.insert(index) {
                    return Err(MergeError::ProbeFailure(format!(
                        "duplicate stream index {}",
                        index
                    )));
                }
                streams.push(ExistingStream::new(index, None));
            }
            "TAG:language" => {
                let stream = streams.last_mut().ok_or_else(|| {
                    MergeError::ProbeFailure(format!(
                        "line {}: language tag before any stream index",
                        lineno + 1
                    ))
                })?;
                let lang = value.trim();
                if !lang.is_empty() && lang != UNDETERMINED {
                    stream.language = Some(LanguageTag::new(lang));
                }
            }
            _ => {}
        }
    }

    Ok(streams)
}
