//! Engine configuration.
//!
//! Rule constants live here instead of being hardcoded in the phases.
//! Defaults match the standard board game; scenarios may override any
//! field through the builder methods or by deserializing a partial
//! JSON object (missing fields take their defaults).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Rule and presentation settings for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Health a robot starts with and is restored to on respawn.
    pub max_health: i32,

    /// Lives a robot starts with.
    pub max_lives: i32,

    /// Program registers per round (priority tiers).
    pub max_program_cards: usize,

    /// Damage dealt by a single laser beam.
    pub laser_damage_per_beam: i32,

    /// Smallest allowed number of robots.
    pub min_players: usize,

    /// Largest allowed number of robots.
    pub max_players: usize,

    /// Presentation delay between two unit steps of one instruction.
    ///
    /// Never affects simulation order.
    pub step_delay_ms: u64,

    /// Presentation delay between two phases.
    pub phase_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_health: 10,
            max_lives: 3,
            max_program_cards: 5,
            laser_damage_per_beam: 2,
            min_players: 1,
            max_players: 8,
            step_delay_ms: 250,
            phase_delay_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_health(mut self, max_health: i32) -> Self {
        self.max_health = max_health;
        self
    }

    #[must_use]
    pub fn with_max_lives(mut self, max_lives: i32) -> Self {
        self.max_lives = max_lives;
        self
    }

    #[must_use]
    pub fn with_laser_damage(mut self, per_beam: i32) -> Self {
        self.laser_damage_per_beam = per_beam;
        self
    }

    #[must_use]
    pub fn with_player_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.min_players = *range.start();
        self.max_players = *range.end();
        self
    }

    #[must_use]
    pub fn with_delays(mut self, step_delay_ms: u64, phase_delay_ms: u64) -> Self {
        self.step_delay_ms = step_delay_ms;
        self.phase_delay_ms = phase_delay_ms;
        self
    }

    /// Cards dealt to a robot with `health` remaining.
    ///
    /// A healthy robot draws `max_health - 1`; every damage token costs one card.
    #[must_use]
    pub fn hand_size(&self, health: i32) -> usize {
        (health - 1).max(0) as usize
    }

    /// Reject configurations no game can be played with.
    pub fn validate(&self) -> Result<()> {
        if self.max_health <= 0 || self.max_lives <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "health ({}) and lives ({}) must be positive",
                self.max_health, self.max_lives
            )));
        }
        if self.max_program_cards == 0 {
            return Err(EngineError::InvalidConfig("at least one program register is required".into()));
        }
        if self.laser_damage_per_beam <= 0 {
            return Err(EngineError::InvalidConfig("laser damage must be positive".into()));
        }
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(EngineError::InvalidConfig(format!(
                "invalid player range {}..={}",
                self.min_players, self.max_players
            )));
        }
        Ok(())
    }

    /// Check a robot count against the configured range.
    pub fn check_player_count(&self, count: usize) -> Result<()> {
        if (self.min_players..=self.max_players).contains(&count) {
            Ok(())
        } else {
            Err(EngineError::InvalidPlayerCount {
                count,
                min: self.min_players,
                max: self.max_players,
            })
        }
    }
}
