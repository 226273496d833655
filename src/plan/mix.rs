//! Sidechain ducking graph for added tracks
//!
//! Each added track gets its own chain:
//!
//! ```text
//! [i:a] -> compand -> asplit -+-> [sc i] --------------+
//!                             |                        v
//!                             |   [0:a:0] -> sidechaincompress -> [compr i] -+
//!                             |                                               v
//!                             +-> [mix i] ------------------------------> amix -> [final i]
//! ```
//!
//! All labels carry the track's input number, so several graphs can sit in
//! one command without colliding.

use std::fmt;

use serde::Serialize;

use crate::config::{CompandPoint, DuckingConfig};

/// Input number of the video file in the remux command
pub const PROGRAM_INPUT: usize = 0;

/// Filter pad reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pad {
    /// Stream of a command input, e.g. `[1:a]`
    Stream { input: usize, selector: String },
    /// Named intermediate or output link
    Label(String),
}

impl Pad {
    pub fn stream(input: usize, selector: &str) -> Self {
        Pad::Stream {
            input,
            selector: selector.to_string(),
        }
    }

    pub fn label(name: &str, input: usize) -> Self {
        Pad::Label(format!("{}{}", name, input))
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pad::Stream { input, selector } => write!(f, "[{}:{}]", input, selector),
            Pad::Label(name) => write!(f, "[{}]", name),
        }
    }
}

/// Signal processing stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MixStage {
    /// Level transfer curve
    Compand { points: Vec<CompandPoint> },
    /// Copy one signal to several outputs
    Split { outputs: usize },
    /// Compress the first input, keyed by the second
    SidechainCompress {
        level_in: f64,
        threshold: f64,
        attack_ms: f64,
        release_ms: f64,
    },
    /// Sum all inputs
    Mix { inputs: usize },
}

impl fmt::Display for MixStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MixStage::Compand { points } => {
                let points: Vec<String> = points
                    .iter()
                    .map(|p| format!("{}/{}", p.input_db, p.output_db))
                    .collect();
                write!(f, "compand=points={}", points.join("|"))
            }
            MixStage::Split { outputs } => write!(f, "asplit={}", outputs),
            MixStage::SidechainCompress {
                level_in,
                threshold,
                attack_ms,
                release_ms,
            } => write!(
                f,
                "sidechaincompress=level_in={}:threshold={}:attack={}:release={}",
                level_in, threshold, attack_ms, release_ms
            ),
            // amix defaults to two inputs
            MixStage::Mix { inputs: 2 } => write!(f, "amix"),
            MixStage::Mix { inputs } => write!(f, "amix=inputs={}", inputs),
        }
    }
}

/// One stage with its connections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixNode {
    pub stage: MixStage,
    pub inputs: Vec<Pad>,
    pub outputs: Vec<Pad>,
}

impl fmt::Display for MixNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for pad in &self.inputs {
            pad.fmt(f)?;
        }
        self.stage.fmt(f)?;
        for pad in &self.outputs {
            pad.fmt(f)?;
        }
        Ok(())
    }
}

/// Ducking graph for one added track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixGraph {
    /// Command input number of the added track
    pub input: usize,
    pub nodes: Vec<MixNode>,
}

impl MixGraph {
    /// Final mixed output pad
    pub fn output(&self) -> Option<&Pad> {
        self.nodes.last().and_then(|n| n.outputs.first())
    }

    /// Labels this graph defines as node outputs
    pub fn labels(&self) -> Vec<&Pad> {
        self.nodes.iter().flat_map(|n| n.outputs.iter()).collect()
    }
}

impl fmt::Display for MixGraph {
    /// Render in ffmpeg `-filter_complex` syntax
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            node.fmt(f)?;
        }
        Ok(())
    }
}

/// Build the ducking graph for the track at command input `input`
pub fn build_mix_graph(input: usize, ducking: &DuckingConfig) -> MixGraph {
    let shaped = Pad::label("ta", input);
    let sidechain = Pad::label("sc", input);
    let dry = Pad::label("mix", input);
    let compressed = Pad::label("compr", input);

    let nodes = vec![
        MixNode {
            stage: MixStage::Compand {
                points: ducking.compand_points.clone(),
            },
            inputs: vec![Pad::stream(input, "a")],
            outputs: vec![shaped.clone()],
        },
        MixNode {
            stage: MixStage::Split { outputs: 2 },
            inputs: vec![shaped],
            outputs: vec![sidechain.clone(), dry.clone()],
        },
        MixNode {
            stage: MixStage::SidechainCompress {
                level_in: ducking.level_in,
                threshold: ducking.threshold,
                attack_ms: ducking.attack_ms,
                release_ms: ducking.release_ms,
            },
            inputs: vec![Pad::stream(PROGRAM_INPUT, "a:0"), sidechain],
            outputs: vec![compressed.clone()],
        },
        MixNode {
            stage: MixStage::Mix { inputs: 2 },
            inputs: vec![compressed, dry],
            outputs: vec![Pad::label("final", input)],
        },
    ];

    MixGraph { input, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_graph_rendering() {
        let graph = build_mix_graph(1, &DuckingConfig::default());
        assert_eq!(
            graph.to_string(),
            "[1:a]compand=points=-20/-600|-18/-18[ta1];\
             [ta1]asplit=2[sc1][mix1];\
             [0:a:0][sc1]sidechaincompress=level_in=0.3:threshold=0.1:attack=50:release=2500[compr1];\
             [compr1][mix1]amix[final1]"
        );
    }

    #[test]
    fn test_output_pad() {
        let graph = build_mix_graph(3, &DuckingConfig::default());
        assert_eq!(graph.output(), Some(&Pad::Label("final3".to_string())));
    }

    #[test]
    fn test_stage_order() {
        let graph = build_mix_graph(1, &DuckingConfig::default());
        let stages: Vec<&MixStage> = graph.nodes.iter().map(|n| &n.stage).collect();
        assert!(matches!(stages[0], MixStage::Compand { .. }));
        assert!(matches!(stages[1], MixStage::Split { outputs: 2 }));
        assert!(matches!(stages[2], MixStage::SidechainCompress { .. }));
        assert!(matches!(stages[3], MixStage::Mix { inputs: 2 }));

        // The compressor is keyed by the shaped new track, not the other way round.
        assert_eq!(graph.nodes[2].inputs[0], Pad::stream(PROGRAM_INPUT, "a:0"));
        assert_eq!(graph.nodes[2].inputs[1], graph.nodes[1].outputs[0]);
    }

    #[test]
    fn test_graphs_do_not_share_labels() {
        let ducking = DuckingConfig::default();
        let a = build_mix_graph(1, &ducking);
        let b = build_mix_graph(2, &ducking);
        for label in a.labels() {
            assert!(!b.labels().contains(&label), "shared label {label}");
        }
    }

    #[test]
    fn test_custom_parameters() {
        let ducking = DuckingConfig {
            compand_points: vec![
                CompandPoint::new(-30.0, -90.0),
                CompandPoint::new(-25.5, -25.5),
                CompandPoint::new(0.0, -3.0),
            ],
            level_in: 1.0,
            threshold: 0.05,
            attack_ms: 20.0,
            release_ms: 800.0,
        };
        let rendered = build_mix_graph(2, &ducking).to_string();
        assert!(rendered.contains("compand=points=-30/-90|-25.5/-25.5|0/-3[ta2]"));
        assert!(rendered.contains("level_in=1:threshold=0.05:attack=20:release=800"));
    }
}
