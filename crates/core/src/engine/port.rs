use serde::Serialize;
use tracing::{info, warn};

use super::{EngineError, SearchEngine, SearchRequest};
use crate::moves::ResolvedMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortState {
    Unavailable,
    Ready,
    Thinking,
}

/// Request/response port in front of an optional engine.
///
/// At most one request is outstanding. A request that is dropped before the
/// engine answers leaves the port in `Thinking` until [`EnginePort::recover`].
pub struct EnginePort<E> {
    engine: Option<E>,
    state: PortState,
}

impl<E: SearchEngine> EnginePort<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Some(engine),
            state: PortState::Ready,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            engine: None,
            state: PortState::Unavailable,
        }
    }

    pub fn state(&self) -> PortState {
        self.state
    }

    /// Asks the engine for a move.
    ///
    /// Fails fast with `Unavailable`, `Busy` or `NotReady` without touching
    /// the engine. An engine that fails mid-request is dropped.
    pub async fn request(&mut self, request: SearchRequest) -> Result<ResolvedMove, EngineError> {
        match self.state {
            PortState::Unavailable => return Err(EngineError::Unavailable),
            PortState::Thinking => return Err(EngineError::Busy),
            PortState::Ready => {}
        }
        let engine = self.engine.as_mut().ok_or(EngineError::NotReady)?;

        self.state = PortState::Thinking;
        let reply = engine.best_move(request).await;

        match reply {
            Ok(text) => {
                self.state = PortState::Ready;
                ResolvedMove::from_coordinate(&text)
                    .ok_or_else(|| EngineError::Protocol(format!("unreadable move \"{text}\"")))
            }
            Err(e) => {
                warn!(error = %e, "engine failed, disabling it");
                self.engine = None;
                self.state = PortState::Unavailable;
                Err(e)
            }
        }
    }

    /// Returns a port left in `Thinking` to `Ready`
    pub async fn recover(&mut self) {
        if self.state != PortState::Thinking {
            return;
        }
        let engine = match self.engine.as_mut() {
            Some(engine) => engine,
            None => {
                self.state = PortState::Unavailable;
                return;
            }
        };
        let outcome = engine.reset().await;
        match outcome {
            Ok(()) => {
                info!("engine recovered");
                self.state = PortState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "engine did not recover, disabling it");
                self.engine = None;
                self.state = PortState::Unavailable;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;

    fn request() -> SearchRequest {
        SearchRequest {
            moves: Vec::new(),
            depth: 6,
            skill: 0,
        }
    }

    #[tokio::test]
    async fn test_unavailable_port() {
        let mut port: EnginePort<ScriptedEngine> = EnginePort::unavailable();
        assert_eq!(port.state(), PortState::Unavailable);
        assert!(matches!(port.request(request()).await, Err(EngineError::Unavailable)));
    }

    #[tokio::test]
    async fn test_reply_is_parsed() {
        let mut port = EnginePort::new(ScriptedEngine::with_replies(&["e7e8q"]));
        let mv = port.request(request()).await.unwrap();
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!(port.state(), PortState::Ready);
    }

    #[tokio::test]
    async fn test_unreadable_reply_keeps_engine() {
        let mut port = EnginePort::new(ScriptedEngine::with_replies(&["castle", "d2d4"]));
        assert!(matches!(port.request(request()).await, Err(EngineError::Protocol(_))));
        assert_eq!(port.state(), PortState::Ready);
        assert!(port.request(request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_engine_is_dropped() {
        let mut port = EnginePort::new(ScriptedEngine::default());
        assert!(matches!(port.request(request()).await, Err(EngineError::Io(_))));
        assert_eq!(port.state(), PortState::Unavailable);
    }

    #[tokio::test]
    async fn test_busy_until_recovered() {
        let mut port = EnginePort::new(ScriptedEngine::with_replies(&["e2e4"]));
        port.state = PortState::Thinking;
        assert!(matches!(port.request(request()).await, Err(EngineError::Busy)));

        port.recover().await;
        assert_eq!(port.state(), PortState::Ready);
        assert!(port.request(request()).await.is_ok());
    }
}
