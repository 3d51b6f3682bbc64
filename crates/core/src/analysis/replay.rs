use serde::Serialize;

use super::types::{AnalysisReport, ReplayEntry};
use crate::position::Position;

/// Cursor over an analysed game; -1 is the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayNavigator {
    cursor: isize,
    len: usize,
}

impl ReplayNavigator {
    pub fn new(len: usize) -> Self {
        Self { cursor: -1, len }
    }

    /// Moves one ply in the direction of `direction`'s sign, clamping at both
    /// ends. Returns the cursor afterwards.
    pub fn step(&mut self, direction: i32) -> isize {
        let last = self.len as isize - 1;
        self.cursor = (self.cursor + direction.signum() as isize).clamp(-1, last.max(-1));
        self.cursor
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    /// Log index under the cursor, `None` at the start position
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.cursor).ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// What rendering needs for the current replay step
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame<'a> {
    pub index: isize,
    pub position: &'a Position,
    pub entry: Option<&'a ReplayEntry>,
}

/// A finished analysis together with its navigation cursor
#[derive(Debug, Clone)]
pub struct ReplaySession {
    report: AnalysisReport,
    start: Position,
    navigator: ReplayNavigator,
}

impl ReplaySession {
    /// `None` when the report carries no positions at all
    pub fn new(report: AnalysisReport) -> Option<Self> {
        let start = report.trace.first()?.clone();
        let navigator = ReplayNavigator::new(report.log.len());
        Some(Self {
            report,
            start,
            navigator,
        })
    }

    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }

    pub fn step(&mut self, direction: i32) -> ReplayFrame<'_> {
        self.navigator.step(direction);
        self.frame()
    }

    pub fn frame(&self) -> ReplayFrame<'_> {
        let index = self.navigator.index();
        let position = index
            .and_then(|i| self.report.trace.get(i + 1))
            .unwrap_or(&self.start);
        let entry = index.and_then(|i| self.report.log.get(i));

        ReplayFrame {
            index: self.navigator.cursor(),
            position,
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisPipeline;
    use crate::oracle::StandardOracle;
    use shakmaty::Square;

    #[test]
    fn test_cursor_clamps() {
        let mut nav = ReplayNavigator::new(3);
        assert_eq!(nav.cursor(), -1);
        assert_eq!(nav.step(-1), -1);
        assert_eq!(nav.step(1), 0);
        assert_eq!(nav.step(5), 1);
        assert_eq!(nav.step(1), 2);
        assert_eq!(nav.step(1), 2);
        assert_eq!(nav.index(), Some(2));
        assert_eq!(nav.step(-1), 1);
    }

    #[test]
    fn test_empty_log_stays_at_start() {
        let mut nav = ReplayNavigator::new(0);
        assert_eq!(nav.step(1), -1);
        assert_eq!(nav.index(), None);
        assert!(nav.is_empty());
    }

    #[tokio::test]
    async fn test_frames_follow_trace() {
        let mut pipeline = AnalysisPipeline::new(StandardOracle).unwrap();
        pipeline.submit("1. e4 e5");
        let mut session = ReplaySession::new(pipeline.run().await).unwrap();

        let frame = session.frame();
        assert_eq!(frame.index, -1);
        assert!(frame.entry.is_none());
        assert!(frame.position.piece_at(Square::E2).is_some());

        let frame = session.step(1);
        assert_eq!(frame.entry.unwrap().san, "e4");
        assert!(frame.position.piece_at(Square::E4).is_some());

        session.step(1);
        session.step(1);
        let frame = session.frame();
        assert_eq!(frame.index, 1);
        assert_eq!(frame.entry.unwrap().san, "e5");
        assert_eq!(frame.position.fen(), session.report().trace[2].fen());
    }

    #[tokio::test]
    async fn test_report_without_positions_has_no_session() {
        let mut pipeline = AnalysisPipeline::new(StandardOracle).unwrap();
        pipeline.submit("1. e4");
        let mut report = pipeline.run().await;
        report.trace.clear();
        assert!(ReplaySession::new(report).is_none());
    }

    #[tokio::test]
    async fn test_short_trace_falls_back_to_start() {
        let mut pipeline = AnalysisPipeline::new(StandardOracle).unwrap();
        pipeline.submit("1. e4 e5");
        let mut report = pipeline.run().await;
        report.trace.truncate(1);

        let mut session = ReplaySession::new(report).unwrap();
        let frame = session.step(1);
        assert_eq!(frame.entry.unwrap().san, "e4");
        assert!(frame.position.piece_at(Square::E2).is_some());
    }
}
