use tracing::{debug, info, warn};

use super::types::{explain, AbortReason, AnalysisOutcome, AnalysisReport, ReplayEntry, Verdict};
use crate::eval::{best_move, material_balance};
use crate::oracle::{play_resolved, Oracle, OracleError};
use crate::parser::{parse_headers, resolve, tokenize, PgnHeaders};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Replays PGN move text one ply at a time, annotating every move.
///
/// The pipeline owns the live position, the log and the position trace of
/// one session; submitting new text discards all of them.
pub struct AnalysisPipeline<O: Oracle> {
    oracle: O,
    start: Position,
    state: PipelineState,
    headers: PgnHeaders,
    tokens: Vec<String>,
    next: usize,
    live: Position,
    log: Vec<ReplayEntry>,
    trace: Vec<Position>,
    diagnostics: Vec<String>,
    outcome: AnalysisOutcome,
}

impl<O: Oracle> AnalysisPipeline<O> {
    pub fn new(oracle: O) -> Result<Self, OracleError> {
        let start = oracle.new_position(None)?;
        Ok(Self {
            oracle,
            live: start.clone(),
            trace: vec![start.clone()],
            start,
            state: PipelineState::Idle,
            headers: PgnHeaders::default(),
            tokens: Vec::new(),
            next: 0,
            log: Vec::new(),
            diagnostics: Vec::new(),
            outcome: AnalysisOutcome::NoMoves,
        })
    }

    /// Starts a new session over `pgn`, abandoning any previous one
    pub fn submit(&mut self, pgn: &str) {
        self.headers = parse_headers(pgn);
        self.tokens = tokenize(pgn);
        self.next = 0;
        self.live = self.start.clone();
        self.log.clear();
        self.trace = vec![self.start.clone()];
        self.diagnostics.clear();
        self.outcome = AnalysisOutcome::NoMoves;
        self.state = PipelineState::Running;

        info!(plies = self.tokens.len(), "analysis submitted");
    }

    /// Processes one token; returns the state afterwards
    pub fn step(&mut self) -> PipelineState {
        if self.state != PipelineState::Running {
            return self.state;
        }

        let token = match self.tokens.get(self.next) {
            Some(token) => token.clone(),
            None => {
                self.finish();
                return self.state;
            }
        };
        let ply = self.next;
        let side = self.live.turn();
        let before = material_balance(&self.live, side);
        let reference = best_move(&self.oracle, &self.live);

        let mv = match resolve(&token, &self.live, &self.oracle) {
            Ok(mv) => mv,
            Err(e) => {
                debug!(error = %e, "token not resolved");
                self.abort(ply, token, AbortReason::Unresolvable);
                return self.state;
            }
        };

        let after = match play_resolved(&self.oracle, &self.live, &mv) {
            Ok(after) => after,
            Err(e) => {
                debug!(error = %e, "resolved move rejected");
                self.abort(ply, token, AbortReason::IllegalMove);
                return self.state;
            }
        };

        let delta = material_balance(&after, side) - before;
        let verdict = Verdict::from_delta(delta);
        let explanation = explain(side, delta, &mv, reference.as_ref());
        debug!(ply, san = %token, mv = %mv, delta, verdict = verdict.as_str(), "ply analysed");

        self.log.push(ReplayEntry {
            ply,
            san: token,
            mv,
            side,
            reference,
            delta,
            verdict,
            explanation,
        });
        self.trace.push(after.clone());
        self.live = after;
        self.next += 1;

        if self.next == self.tokens.len() {
            self.finish();
        }
        self.state
    }

    /// Steps to a terminal state, yielding to the scheduler between plies
    pub async fn run(&mut self) -> AnalysisReport {
        while self.step() == PipelineState::Running {
            tokio::task::yield_now().await;
        }
        self.report()
    }

    fn finish(&mut self) {
        self.outcome = if self.tokens.is_empty() {
            AnalysisOutcome::NoMoves
        } else {
            AnalysisOutcome::Completed
        };
        self.state = PipelineState::Completed;
        info!(plies = self.log.len(), "analysis completed");
    }

    fn abort(&mut self, ply: usize, token: String, reason: AbortReason) {
        let number = ply + 1;
        let line = match reason {
            AbortReason::Unresolvable => {
                format!("Move {}: \"{}\" could not be interpreted.", number, token)
            }
            AbortReason::IllegalMove => {
                format!("Move {}: \"{}\" is not legal in this position.", number, token)
            }
        };
        warn!(ply = number, token = %token, ?reason, "analysis aborted");

        self.diagnostics.push(line);
        self.outcome = AnalysisOutcome::Aborted {
            ply: number,
            token,
            reason,
        };
        self.state = PipelineState::Aborted;
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn live(&self) -> &Position {
        &self.live
    }

    pub fn log(&self) -> &[ReplayEntry] {
        &self.log
    }

    pub fn trace(&self) -> &[Position] {
        &self.trace
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Snapshot of everything produced so far
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            headers: self.headers.clone(),
            outcome: self.outcome.clone(),
            log: self.log.clone(),
            trace: self.trace.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
