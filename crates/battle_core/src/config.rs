//! Battle configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::math::Bounds;
use crate::unit_kind::UnitKind;

/// Settings for one battle session.
///
/// Every field has a default, so a RON document only needs the fields it
/// changes:
///
/// ```
/// use battle_core::config::BattleConfig;
///
/// let config = BattleConfig::from_ron_str("(seed: 7, columns: 12)").unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.rows, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Battlefield width in pixels.
    pub width: f32,
    /// Battlefield height in pixels.
    pub height: f32,
    /// Placement grid columns.
    pub columns: u32,
    /// Placement grid rows.
    pub rows: u32,
    /// Ticks a dead unit lingers before it is removed.
    pub corpse_ticks: u32,
    /// Ticks after which a projectile that hit nothing is discarded.
    pub projectile_lifetime_ticks: Option<u32>,
    /// Seed for spawn randomness.
    pub seed: u64,
    /// Kinds that may be selected for placement.
    pub unlocked: Vec<UnitKind>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            columns: 15,
            rows: 10,
            corpse_ticks: 120,
            projectile_lifetime_ticks: None,
            seed: 0,
            unlocked: UnitKind::PLACEABLE.to_vec(),
        }
    }
}

impl BattleConfig {
    /// Parse a configuration from RON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or fails
    /// [`validate`](Self::validate).
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).map_err(|e| BattleError::parse("battle config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes the battlefield cannot be built with.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] describing the bad value.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 || !self.width.is_finite() || !self.height.is_finite() {
            return Err(BattleError::InvalidConfig(format!(
                "battlefield must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(BattleError::InvalidConfig(format!(
                "grid must have at least one cell, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.projectile_lifetime_ticks == Some(0) {
            return Err(BattleError::InvalidConfig("projectile lifetime must be at least one tick".to_string()));
        }
        Ok(())
    }

    /// Battlefield extent.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Check whether `kind` may be selected.
    #[must_use]
    pub fn is_unlocked(&self, kind: UnitKind) -> bool {
        self.unlocked.contains(&kind)
    }
}
