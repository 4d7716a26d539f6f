//! World configuration.
//!
//! The engine hardcodes no table limits: board size, hand size, hero
//! health and the other numbers a ruleset tunes are read from
//! [`WorldConfig`], which can be built in code or loaded from JSON.

use serde::{Deserialize, Serialize};

use super::log::VerbosityLevel;
use crate::error::{EngineError, Result};

/// When session-scoped ("this turn only") modifiers expire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionExpiry {
    /// Only when the orchestrator calls `World::expire_session_modifiers`.
    #[default]
    Manual,
    /// Also whenever the outermost atomic scope exits.
    OnOutermostAtomicExit,
}

/// Static parameters of one world instance.
///
/// ```
/// use brazier_core::core::{SessionExpiry, WorldConfig};
///
/// let config = WorldConfig::default()
///     .with_max_board_size(5)
///     .with_session_expiry(SessionExpiry::OnOutermostAtomicExit);
///
/// assert_eq!(config.player_count, 2);
/// assert_eq!(config.max_board_size, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub player_count: usize,
    /// Minions per side of the board.
    pub max_board_size: usize,
    pub max_hand_size: usize,
    pub hero_health: i32,
    pub starting_mana: i32,
    pub session_expiry: SessionExpiry,
    pub verbosity: VerbosityLevel,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            max_board_size: 7,
            max_hand_size: 10,
            hero_health: 30,
            starting_mana: 10,
            session_expiry: SessionExpiry::Manual,
            verbosity: VerbosityLevel::Silent,
        }
    }
}

impl WorldConfig {
    /// Parse a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a world can be built from this configuration.
    pub fn validate(&self) -> Result<()> {
        let max_players = usize::from(u8::MAX);
        if !(1..=max_players).contains(&self.player_count) {
            return Err(EngineError::InvalidConfig(format!(
                "player_count {} outside 1..={max_players}",
                self.player_count
            )));
        }
        if self.max_board_size == 0 {
            return Err(EngineError::InvalidConfig("max_board_size must be positive".to_string()));
        }
        if self.hero_health <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "hero_health {} must be positive",
                self.hero_health
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    #[must_use]
    pub fn with_max_board_size(mut self, max: usize) -> Self {
        self.max_board_size = max;
        self
    }

    #[must_use]
    pub fn with_max_hand_size(mut self, max: usize) -> Self {
        self.max_hand_size = max;
        self
    }

    #[must_use]
    pub fn with_hero_health(mut self, health: i32) -> Self {
        self.hero_health = health;
        self
    }

    #[must_use]
    pub fn with_starting_mana(mut self, mana: i32) -> Self {
        self.starting_mana = mana;
        self
    }

    #[must_use]
    pub fn with_session_expiry(mut self, expiry: SessionExpiry) -> Self {
        self.session_expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.max_board_size, 7);
        assert_eq!(config.max_hand_size, 10);
        assert_eq!(config.hero_health, 30);
        assert_eq!(config.session_expiry, SessionExpiry::Manual);
    }

    #[test]
    fn test_from_json_partial() {
        let config = WorldConfig::from_json(r#"{ "max_board_size": 3, "verbosity": "Verbose" }"#)
            .unwrap();
        assert_eq!(config.max_board_size, 3);
        assert_eq!(config.verbosity, VerbosityLevel::Verbose);
        assert_eq!(config.player_count, 2);
    }

    #[test]
    fn test_from_json_rejects_unbuildable_config() {
        for json in [
            r#"{ "player_count": 0 }"#,
            r#"{ "player_count": 300 }"#,
            r#"{ "max_board_size": 0 }"#,
            r#"{ "hero_health": -1 }"#,
        ] {
            let result = WorldConfig::from_json(json);
            assert!(matches!(result, Err(EngineError::InvalidConfig(_))), "{json}");
        }
        assert!(WorldConfig::from_json(r#"{ "player_count": 4 }"#).is_ok());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(WorldConfig::from_json("{ max_board_size: }").is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = WorldConfig::default().with_hero_health(15);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WorldConfig::from_json(&json).unwrap(), config);
    }
}
