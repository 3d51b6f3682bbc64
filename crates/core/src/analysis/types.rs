//! Types recorded by the analysis pipeline

use serde::Serialize;
use shakmaty::Color;

use crate::moves::ResolvedMove;
use crate::parser::PgnHeaders;
use crate::position::{serialize_color, side_name, Position};

/// Move-quality label derived from the material delta of one ply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "blunder")]
    Blunder,
    #[serde(rename = "mistake")]
    Mistake,
    #[serde(rename = "inaccuracy")]
    Inaccuracy,
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "good move")]
    Good,
    #[serde(rename = "excellent move")]
    Excellent,
}

impl Verdict {
    /// Bands are checked in order, the first match wins
    pub fn classify(delta: f64) -> Self {
        match delta {
            d if d <= -3.0 => Verdict::Blunder,
            d if d <= -1.0 => Verdict::Mistake,
            d if d < 0.0 => Verdict::Inaccuracy,
            d if d >= 2.0 => Verdict::Excellent,
            d if d > 0.0 => Verdict::Good,
            _ => Verdict::Ok,
        }
    }

    pub fn from_delta(delta: i32) -> Self {
        Self::classify(f64::from(delta))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Blunder => "blunder",
            Verdict::Mistake => "mistake",
            Verdict::Inaccuracy => "inaccuracy",
            Verdict::Ok => "ok",
            Verdict::Good => "good move",
            Verdict::Excellent => "excellent move",
        }
    }
}

/// One analysed half-move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayEntry {
    /// Zero-based ply index, also the replay handle
    pub ply: usize,
    pub san: String,
    #[serde(rename = "move")]
    pub mv: ResolvedMove,
    #[serde(serialize_with = "serialize_color")]
    pub side: Color,
    /// Greedy selector's choice in the position before the move
    pub reference: Option<ResolvedMove>,
    pub delta: i32,
    pub verdict: Verdict,
    pub explanation: String,
}

impl ReplayEntry {
    pub fn move_number(&self) -> usize {
        self.ply / 2 + 1
    }

    /// Reference move, only when it differs from the move played
    pub fn better_move(&self) -> Option<ResolvedMove> {
        self.reference.filter(|r| !r.same_squares(&self.mv))
    }

    /// Move-list line, e.g. `3... Nf6 - Black: ok`
    pub fn summary_line(&self) -> String {
        let prefix = match self.side {
            Color::White => format!("{}. ", self.move_number()),
            Color::Black => format!("{}... ", self.move_number()),
        };
        let mut line = format!(
            "{}{} - {}: {}",
            prefix,
            self.san,
            side_name(self.side),
            self.verdict.as_str()
        );
        if self.delta < 0 {
            line.push_str(" (material lost)");
        } else if self.delta > 0 {
            line.push_str(" (material won)");
        }
        if let Some(better) = self.better_move() {
            line.push_str(&format!(" | Better move per engine: {}", better.hyphenated()));
        }
        line
    }
}

/// Natural-language explanation of a ply's material swing
pub fn explain(
    side: Color,
    delta: i32,
    played: &ResolvedMove,
    reference: Option<&ResolvedMove>,
) -> String {
    let mut text = if delta > 0 {
        format!(
            "Advantage: {} wins about {} pawn(s) of material.",
            side_name(side),
            delta
        )
    } else if delta < 0 {
        format!(
            "Advantage: {} - this move loses about {} pawn(s).",
            side_name(!side),
            delta.abs()
        )
    } else {
        "Advantage: no clear material change.".to_string()
    };

    if let Some(reference) = reference.filter(|r| !r.same_squares(played)) {
        text.push_str(&format!(" Engine prefers {}.", reference.hyphenated()));
    }
    text
}

/// Why a run stopped before the last token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    Unresolvable,
    IllegalMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The input contained no moves
    NoMoves,
    Completed,
    /// Stopped at 1-based `ply`; everything before it is kept
    Aborted { ply: usize, token: String, reason: AbortReason },
}

/// Everything one analysis session produced.
///
/// `trace[0]` is the start position and `trace[i + 1]` the position after
/// `log[i]`, so `trace.len() == log.len() + 1` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub headers: PgnHeaders,
    pub outcome: AnalysisOutcome,
    pub log: Vec<ReplayEntry>,
    pub trace: Vec<Position>,
    pub diagnostics: Vec<String>,
}

impl AnalysisReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == AnalysisOutcome::Completed
    }

    pub fn final_position(&self) -> Option<&Position> {
        self.trace.last()
    }

    /// Move-list lines followed by any diagnostics
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.log.iter().map(ReplayEntry::summary_line).collect();
        lines.extend(self.diagnostics.iter().cloned());
        if self.outcome == AnalysisOutcome::NoMoves {
            lines.push("No moves found.".to_string());
        }
        lines
    }
}
