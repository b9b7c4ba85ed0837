//! Player-facing salvage options.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rarity::GameVariant;
use crate::schema::SafetyTier;

pub const DEFAULT_SALVAGE_KEY: &str = "C";
pub const DEFAULT_INSPECT_KEY: &str = "F";
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid salvage options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("salvage and inspect keys must differ (both '{0}')")]
    KeyConflict(String),
    #[error("'{0}' is reserved for cancelling the review")]
    ReservedKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalvageOptions {
    /// Only accept donors of the same or higher rarity.
    pub rarity_lock: bool,
    /// Named uniques only take parts from another copy of themselves.
    pub strict_uniques: bool,
    pub safety_tier: SafetyTier,
    pub game_variant: GameVariant,
    pub salvage_key: String,
    pub inspect_key: String,
}

impl Default for SalvageOptions {
    fn default() -> Self {
        Self {
            rarity_lock: true,
            strict_uniques: true,
            safety_tier: SafetyTier::Safe,
            game_variant: GameVariant::Bl2,
            salvage_key: DEFAULT_SALVAGE_KEY.to_string(),
            inspect_key: DEFAULT_INSPECT_KEY.to_string(),
        }
    }
}

impl SalvageOptions {
    /// Parse options from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the key bindings collide.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the review key bindings can be told apart.
    ///
    /// # Errors
    ///
    /// Returns an error if two actions share a key or a key shadows Escape.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for key in [&self.salvage_key, &self.inspect_key] {
            if key.eq_ignore_ascii_case(ESCAPE_KEY) {
                return Err(OptionsError::ReservedKey(key.clone()));
            }
        }
        if self.salvage_key.eq_ignore_ascii_case(&self.inspect_key) {
            return Err(OptionsError::KeyConflict(self.salvage_key.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_safety_tier(mut self, tier: SafetyTier) -> Self {
        self.safety_tier = tier;
        self
    }

    #[must_use]
    pub fn with_game_variant(mut self, variant: GameVariant) -> Self {
        self.game_variant = variant;
        self
    }
}
