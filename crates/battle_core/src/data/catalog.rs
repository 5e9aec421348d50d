//! The unit catalog: every unit type's numbers, keyed by kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::UnitData;
use crate::behavior::{Behavior, BufferParams, HealerParams, ProducerParams};
use crate::error::{BattleError, Result};
use crate::projectile::ProjectileData;
use crate::unit_kind::UnitKind;

static BASIC: UnitData = UnitData::basic();

/// Unit descriptors keyed by [`UnitKind`].
///
/// Loaded from RON as a map:
///
/// ```ron
/// {
///     Infantry: (health: 100.0, attack: 10.0, attack_cooldown: 0.5,
///                speed: 1.0, range: 25.0, behavior: Melee),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCatalog {
    units: BTreeMap<UnitKind, UnitData>,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitCatalog {
    /// Catalog with no entries. Every lookup falls back to the basic unit.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    /// The built-in roster.
    #[must_use]
    pub fn standard() -> Self {
        let melee = UnitData::basic();
        let mut catalog = Self::empty();

        catalog.insert(UnitKind::Infantry, melee.clone());
        catalog.insert(
            UnitKind::Archer,
            UnitData {
                health: 80.0,
                range: 125.0,
                behavior: Behavior::Ranged,
                projectile: Some(ProjectileData::single(2.0, 5.0)),
                ..melee.clone()
            },
        );
        catalog.insert(
            UnitKind::Catapult,
            UnitData {
                health: 90.0,
                attack: 15.0,
                attack_cooldown: 2.0,
                speed: 0.6,
                range: 150.0,
                behavior: Behavior::Ranged,
                projectile: Some(ProjectileData::area(1.5, 10.0, 30.0)),
                ..melee.clone()
            },
        );
        catalog.insert(
            UnitKind::HeavyInfantry,
            UnitData {
                health: 120.0,
                speed: 0.85,
                damage_reduction: 15.0,
                ..melee.clone()
            },
        );
        catalog.insert(
            UnitKind::Commander,
            UnitData {
                health: 80.0,
                attack: 5.0,
                speed: 1.5,
                range: 50.0,
                behavior: Behavior::Buffer(BufferParams::default()),
                projectile: Some(ProjectileData::single(2.0, 5.0)),
                ..melee.clone()
            },
        );
        catalog.insert(
            UnitKind::Medic,
            UnitData {
                health: 80.0,
                attack: 12.0,
                speed: 1.2,
                range: 60.0,
                behavior: Behavior::Healer(HealerParams::default()),
                projectile: Some(ProjectileData::single(2.0, 5.0)),
                ..melee.clone()
            },
        );
        catalog.insert(
            UnitKind::Barracks,
            UnitData {
                health: 200.0,
                attack: 0.0,
                attack_cooldown: 5.0,
                speed: 0.0,
                range: 0.0,
                behavior: Behavior::Producer(ProducerParams::default()),
                ..melee.clone()
            },
        );
        catalog.insert(UnitKind::Basic, melee);
        catalog
    }

    /// Parse a catalog from RON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or an entry fails
    /// validation.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let catalog: Self = ron::from_str(source).map_err(|e| BattleError::parse("unit catalog", e))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Standard catalog with the entries of a RON document laid over it.
    ///
    /// # Errors
    ///
    /// Same as [`from_ron_str`](Self::from_ron_str).
    pub fn standard_with_overrides(source: &str) -> Result<Self> {
        let overrides = Self::from_ron_str(source)?;
        let mut catalog = Self::standard();
        catalog.units.extend(overrides.units);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every entry and every producer pool reference.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] for a bad entry and
    /// [`BattleError::MissingUnitData`] for a pool naming an absent kind.
    pub fn validate(&self) -> Result<()> {
        for (kind, data) in &self.units {
            data.validate(kind.as_str())?;
            if let Behavior::Producer(params) = &data.behavior {
                if let Some(missing) = params.pool.iter().find(|k| !self.units.contains_key(k)) {
                    return Err(BattleError::MissingUnitData(missing.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Descriptor for `kind`, falling back to the basic melee unit.
    #[must_use]
    pub fn get(&self, kind: UnitKind) -> &UnitData {
        self.units
            .get(&kind)
            .or_else(|| self.units.get(&UnitKind::Basic))
            .unwrap_or(&BASIC)
    }

    /// Check whether `kind` has its own entry.
    #[must_use]
    pub fn contains(&self, kind: UnitKind) -> bool {
        self.units.contains_key(&kind)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, kind: UnitKind, data: UnitData) -> Option<UnitData> {
        self.units.insert(kind, data)
    }

    /// Iterate over entries in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKind, &UnitData)> {
        self.units.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = UnitCatalog::standard();
        assert!(catalog.validate().is_ok());
        for kind in UnitKind::ALL {
            assert!(catalog.contains(kind), "missing {kind}");
        }
        assert_eq!(catalog.get(UnitKind::HeavyInfantry).damage_reduction, 15.0);
        assert_eq!(catalog.get(UnitKind::Archer).range, 125.0);
        assert!(catalog.get(UnitKind::Barracks).behavior.is_support());
    }

    #[test]
    fn test_missing_kind_falls_back_to_basic() {
        let catalog = UnitCatalog::empty();
        assert_eq!(catalog.get(UnitKind::Catapult), &UnitData::basic());
    }

    #[test]
    fn test_overrides_replace_entries() {
        let catalog = UnitCatalog::standard_with_overrides(
            "{ Infantry: (health: 150.0, attack: 12.0, attack_cooldown: 0.4, speed: 1.0, \
             range: 25.0, behavior: Melee) }",
        )
        .unwrap();
        assert_eq!(catalog.get(UnitKind::Infantry).health, 150.0);
        assert_eq!(catalog.get(UnitKind::Archer).health, 80.0);
    }

    #[test]
    fn test_bad_documents_are_rejected() {
        assert!(matches!(
            UnitCatalog::from_ron_str("{ Infantry: (health: 1.0"),
            Err(BattleError::DataParseError { .. })
        ));
        let err = UnitCatalog::from_ron_str(
            "{ Barracks: (health: 200.0, attack: 0.0, attack_cooldown: 5.0, speed: 0.0, range: 0.0, \
             behavior: Producer((health_threshold: 60.0, health_cost: 20.0, regen_per_frame: 0.05, \
             pool: [Catapult]))) }",
        );
        assert!(matches!(err, Err(BattleError::MissingUnitData(_))));
    }
}
