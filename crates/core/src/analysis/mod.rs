//! PGN analysis: annotate every ply of a game, then replay it
//!
//! The pipeline resolves each SAN token against the live position, compares
//! the material swing with the greedy reference move and records the result.
//! A token that cannot be resolved or played ends the run, but everything
//! analysed before it stays available for replay.

mod pipeline;
mod replay;
mod types;

pub use pipeline::{AnalysisPipeline, PipelineState};
pub use replay::{ReplayFrame, ReplayNavigator, ReplaySession};
pub use types::{explain, AbortReason, AnalysisOutcome, AnalysisReport, ReplayEntry, Verdict};
