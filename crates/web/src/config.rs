use std::env;

use chess_trainer_core::EngineLevel;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct TrainerConfig {
    pub bind_addr: String,
    /// Engine binary; without one the greedy selector plays every computer move
    pub stockfish_path: Option<String>,
    pub engine_level: EngineLevel,
    pub engine_depth: Option<u8>,
}

impl TrainerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            stockfish_path: lookup("STOCKFISH_PATH").filter(|path| !path.trim().is_empty()),
            engine_level: lookup("ENGINE_LEVEL")
                .map(|v| EngineLevel::from_str_lossy(&v))
                .unwrap_or_default(),
            engine_depth: lookup("ENGINE_DEPTH")
                .and_then(|v| v.trim().parse().ok())
                .filter(|depth| *depth > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> TrainerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrainerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.stockfish_path, None);
        assert_eq!(config.engine_level, EngineLevel::default());
        assert_eq!(config.engine_depth, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("STOCKFISH_PATH", "/usr/games/stockfish"),
            ("ENGINE_LEVEL", "12"),
            ("ENGINE_DEPTH", "9"),
        ]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.stockfish_path.as_deref(), Some("/usr/games/stockfish"));
        assert_eq!(config.engine_level.value(), 8);
        assert_eq!(config.engine_depth, Some(9));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config(&[
            ("STOCKFISH_PATH", " "),
            ("ENGINE_LEVEL", "max"),
            ("ENGINE_DEPTH", "deep"),
        ]);
        assert_eq!(config.stockfish_path, None);
        assert_eq!(config.engine_level.value(), 8);
        assert_eq!(config.engine_depth, None);
    }
}
