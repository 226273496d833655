//! Stream reconciliation
//!
//! - Conflict detection between new and existing languages
//! - Keep / replace / add decision per stream
//! - Output slot assignment
//! - Ducking graph synthesis for added tracks

pub mod mix;
pub mod planner;

pub use mix::{build_mix_graph, MixGraph, MixNode, MixStage, Pad};
pub use planner::{plan_streams, Disposition, OutputPlan, PlannerOptions};
