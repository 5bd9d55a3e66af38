//! GameConfig - board shape and win rule

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Placement};
use crate::error::GameError;

/// Largest supported row or column count
pub const MAX_DIMENSION: usize = 16;

/// Structural parameters of a K-in-a-row game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    /// Markers in a line needed to win (K)
    pub win_length: usize,
    pub placement: Placement,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::connect_four()
    }
}

impl GameConfig {
    /// 6 rows x 7 columns, four in a row, gravity drop
    pub fn connect_four() -> Self {
        Self {
            name: "connect-four".to_string(),
            rows: 6,
            cols: 7,
            win_length: 4,
            placement: Placement::Gravity,
        }
    }

    /// 3 x 3, three in a row, free placement
    pub fn tic_tac_toe() -> Self {
        Self {
            name: "tic-tac-toe".to_string(),
            rows: 3,
            cols: 3,
            win_length: 3,
            placement: Placement::FreeCell,
        }
    }

    /// Look up a built-in game by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "connect-four" | "connect4" | "c4" => Some(Self::connect_four()),
            "tic-tac-toe" | "tictactoe" | "ttt" => Some(Self::tic_tac_toe()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        for (label, n) in [("rows", self.rows), ("cols", self.cols)] {
            if n == 0 || n > MAX_DIMENSION {
                return Err(GameError::InvalidConfig(format!(
                    "{} must be between 1 and {}, got {}",
                    label, MAX_DIMENSION, n
                )));
            }
        }
        let longest = self.rows.max(self.cols);
        if self.win_length < 2 || self.win_length > longest {
            return Err(GameError::InvalidConfig(format!(
                "win length must be between 2 and {}, got {}",
                longest, self.win_length
            )));
        }
        Ok(())
    }

    /// Empty board with this shape
    pub fn new_board(&self) -> Board {
        Board::new(self.rows, self.cols, self.win_length, self.placement)
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_valid() {
        assert!(GameConfig::connect_four().validate().is_ok());
        assert!(GameConfig::tic_tac_toe().validate().is_ok());
        assert_eq!(GameConfig::preset("Connect_Four"), Some(GameConfig::connect_four()));
        assert_eq!(GameConfig::preset("ttt"), Some(GameConfig::tic_tac_toe()));
        assert_eq!(GameConfig::preset("sudoku"), None);
    }

    #[test]
    fn test_validate_rejects() {
        let mut cfg = GameConfig::tic_tac_toe();
        cfg.win_length = 4;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::connect_four();
        cfg.cols = MAX_DIMENSION + 1;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::connect_four();
        cfg.win_length = 1;
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_round_trip_file() {
        let dir = std::env::temp_dir().join(format!("kinrow-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gomoku.json");

        let cfg = GameConfig {
            name: "gomoku-lite".to_string(),
            rows: 9,
            cols: 9,
            win_length: 5,
            placement: Placement::FreeCell,
        };
        cfg.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);

        std::fs::write(&path, r#"{"name":"bad","rows":3,"cols":3,"win_length":9,"placement":"gravity"}"#).unwrap();
        assert!(GameConfig::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
