//! UCI engine subprocess
//!
//! Spawns the engine binary and talks to it over stdin/stdout.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use super::{EngineError, SearchEngine, SearchRequest};

/// Wrapper around a UCI engine such as Stockfish
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Starts the engine and completes the UCI handshake.
    ///
    /// # Arguments
    /// * `path` - Path to the engine binary (or "stockfish" if in PATH)
    /// * `skill` - Initial "Skill Level" option
    pub async fn spawn(path: &str, skill: u8) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let mut engine = UciEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        engine.send("uci").await?;
        engine.read_until("uciok").await?;
        engine.set_skill(skill).await?;
        engine.send("isready").await?;
        engine.read_until("readyok").await?;

        Ok(engine)
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "engine <");
        self.stdin.write_all(format!("{cmd}\n").as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(EngineError::Protocol("engine closed its output".into()));
        }
        let line = line.trim().to_string();
        debug!(line = %line, "engine >");
        Ok(line)
    }

    /// Reads lines until one starts with `expected`, returning that line
    async fn read_until(&mut self, expected: &str) -> Result<String, EngineError> {
        loop {
            let line = self.read_line().await?;
            if line.starts_with(expected) {
                return Ok(line);
            }
        }
    }

    pub async fn set_skill(&mut self, skill: u8) -> Result<(), EngineError> {
        self.send(&format!("setoption name Skill Level value {}", skill.min(20)))
            .await
    }

    /// Quits the engine and waits for the process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl SearchEngine for UciEngine {
    async fn best_move(&mut self, request: SearchRequest) -> Result<String, EngineError> {
        self.send("ucinewgame").await?;
        self.send(&position_command(&request.moves)).await?;
        self.set_skill(request.skill).await?;
        self.send(&format!("go depth {}", request.depth)).await?;

        let line = self.read_until("bestmove").await?;
        parse_bestmove(&line).ok_or_else(|| EngineError::Protocol(format!("no move in \"{line}\"")))
    }

    async fn reset(&mut self) -> Result<(), EngineError> {
        // a stopped search still prints its bestmove before readyok
        self.send("stop").await?;
        self.send("isready").await?;
        self.read_until("readyok").await?;
        Ok(())
    }
}

fn position_command(moves: &[String]) -> String {
    if moves.is_empty() {
        "position startpos".to_string()
    } else {
        format!("position startpos moves {}", moves.join(" "))
    }
}

/// "bestmove e2e4 ponder e7e5" -> "e2e4"; `(none)` means no legal move
fn parse_bestmove(line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("bestmove") {
        return None;
    }
    match parts.next() {
        Some("(none)") | None => None,
        Some(mv) => Some(mv.to_string()),
    }
}
