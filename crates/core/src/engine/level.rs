use serde::Serialize;

/// Engine strength from 1 (weakest) to 8 (full strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EngineLevel(u8);

impl EngineLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    /// Parses a level, falling back to full strength on bad input
    pub fn from_str_lossy(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(n) => Self::new(n.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8),
            Err(_) => Self::default(),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// UCI "Skill Level" option, 0..=20
    pub fn skill(&self) -> u8 {
        match self.0 {
            1 => 0,
            2 => 2,
            3 => 5,
            4 => 8,
            5 => 11,
            6 => 14,
            7 => 17,
            _ => 20,
        }
    }

    pub fn depth(&self) -> u8 {
        match self.0 {
            0..=2 => 6,
            3..=4 => 10,
            5..=6 => 14,
            7 => 18,
            _ => 22,
        }
    }
}

impl Default for EngineLevel {
    fn default() -> Self {
        Self(Self::MAX)
    }
}
