//! Per-class part slot tables and the safety tiers that widen them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::RangeInclusive;

use crate::balance::{BalanceDefinition, PoolKey, PoolPath};
use crate::item::{ClassKind, SlotKey};

/// How far the resolver is allowed to reach past the native part pools.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SafetyTier {
    #[default]
    Safe,
    Expert,
    Insane,
}

impl SafetyTier {
    pub const ALL: [Self; 3] = [Self::Safe, Self::Expert, Self::Insane];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Expert => "expert",
            Self::Insane => "insane",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

const WEAPON_SLOTS: [SlotKey; 10] = [
    SlotKey::Accessory1,
    SlotKey::Accessory2,
    SlotKey::Barrel,
    SlotKey::Body,
    SlotKey::Elemental,
    SlotKey::Grip,
    SlotKey::Sight,
    SlotKey::Stock,
    SlotKey::Material,
    SlotKey::Prefix,
];

const ITEM_SLOTS: [SlotKey; 9] = [
    SlotKey::Alpha,
    SlotKey::Beta,
    SlotKey::Gamma,
    SlotKey::Delta,
    SlotKey::Epsilon,
    SlotKey::Zeta,
    SlotKey::Eta,
    SlotKey::Theta,
    SlotKey::Material,
];

/// One applicable slot: where the part lives and where its native pool lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotDescriptor {
    pub slot: SlotKey,
    pub pool: PoolKey,
}

pub type SlotList = SmallVec<[SlotDescriptor; 10]>;

const fn slot_table(class_kind: ClassKind) -> &'static [SlotKey] {
    match class_kind {
        ClassKind::Weapon => &WEAPON_SLOTS,
        ClassKind::Shield | ClassKind::Artifact | ClassKind::ClassMod | ClassKind::GrenadeMod => {
            &ITEM_SLOTS
        }
    }
}

/// Indices into the class table that are active at `tier`.
#[must_use]
pub const fn active_range(class_kind: ClassKind, tier: SafetyTier) -> RangeInclusive<usize> {
    match (class_kind, tier) {
        (ClassKind::Weapon, SafetyTier::Safe) => 0..=7,
        (ClassKind::Weapon, SafetyTier::Expert) => 0..=8,
        (ClassKind::Weapon, SafetyTier::Insane) => 0..=9,
        (ClassKind::Shield, _) => 0..=3,
        (ClassKind::Artifact, SafetyTier::Safe) => 0..=6,
        (ClassKind::Artifact, SafetyTier::Expert) => 0..=7,
        (ClassKind::Artifact, SafetyTier::Insane)
        | (ClassKind::ClassMod, SafetyTier::Expert | SafetyTier::Insane)
        | (ClassKind::GrenadeMod, SafetyTier::Insane) => 0..=8,
        (ClassKind::ClassMod, SafetyTier::Safe) => 1..=8,
        (ClassKind::GrenadeMod, SafetyTier::Safe | SafetyTier::Expert) => 0..=7,
    }
}

/// Primary pool collection for a class, before any per-balance rerouting.
#[must_use]
pub const fn primary_pool_path(class_kind: ClassKind) -> PoolPath {
    match class_kind {
        ClassKind::Weapon | ClassKind::ClassMod => PoolPath::RuntimePartListCollection,
        ClassKind::Shield => PoolPath::InventoryDefinition,
        ClassKind::Artifact | ClassKind::GrenadeMod => PoolPath::PartListCollection,
    }
}

/// Pool collection actually consulted for an item built from `balance`.
///
/// Shields whose primary collection exposes a populated Beta pool are read
/// from the part list collection instead.
#[must_use]
pub fn pool_path_for(class_kind: ClassKind, balance: Option<&BalanceDefinition>) -> PoolPath {
    let primary = primary_pool_path(class_kind);
    match class_kind {
        ClassKind::Shield => {
            let rerouted = balance
                .is_some_and(|balance| balance.is_populated(PoolKey::new(primary, SlotKey::Beta)));
            if rerouted {
                PoolPath::PartListCollection
            } else {
                primary
            }
        }
        ClassKind::Weapon | ClassKind::Artifact | ClassKind::ClassMod | ClassKind::GrenadeMod => {
            primary
        }
    }
}

/// Ordered slot descriptors applicable to `class_kind` at `tier`.
///
/// `balance` is the acceptor's balance definition; it only matters for the
/// shield pool rerouting.
#[must_use]
pub fn slots_for(
    class_kind: ClassKind,
    tier: SafetyTier,
    balance: Option<&BalanceDefinition>,
) -> SlotList {
    let path = pool_path_for(class_kind, balance);
    let table = slot_table(class_kind);
    let range = active_range(class_kind, tier);
    table[range]
        .iter()
        .map(|&slot| SlotDescriptor {
            slot,
            pool: PoolKey::new(path, slot),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(class_kind: ClassKind, tier: SafetyTier) -> Vec<SlotKey> {
        slots_for(class_kind, tier, None)
            .iter()
            .map(|descriptor| descriptor.slot)
            .collect()
    }

    #[test]
    fn weapon_material_and_prefix_unlock_by_tier() {
        let safe = keys(ClassKind::Weapon, SafetyTier::Safe);
        assert_eq!(safe.len(), 8);
        assert!(!safe.contains(&SlotKey::Material));

        let expert = keys(ClassKind::Weapon, SafetyTier::Expert);
        assert_eq!(expert.last(), Some(&SlotKey::Material));
        assert!(!expert.contains(&SlotKey::Prefix));

        let insane = keys(ClassKind::Weapon, SafetyTier::Insane);
        assert_eq!(insane.len(), 10);
        assert_eq!(insane.last(), Some(&SlotKey::Prefix));
    }

    #[test]
    fn item_ranges_follow_class_rules() {
        for tier in SafetyTier::ALL {
            assert_eq!(
                keys(ClassKind::Shield, tier),
                vec![SlotKey::Alpha, SlotKey::Beta, SlotKey::Gamma, SlotKey::Delta]
            );
        }

        assert_eq!(keys(ClassKind::Artifact, SafetyTier::Safe).len(), 7);
        assert_eq!(keys(ClassKind::Artifact, SafetyTier::Expert).len(), 8);
        assert_eq!(keys(ClassKind::Artifact, SafetyTier::Insane).len(), 9);

        let class_mod_safe = keys(ClassKind::ClassMod, SafetyTier::Safe);
        assert_eq!(class_mod_safe.first(), Some(&SlotKey::Beta));
        assert_eq!(class_mod_safe.len(), 8);
        assert_eq!(
            keys(ClassKind::ClassMod, SafetyTier::Expert).first(),
            Some(&SlotKey::Alpha)
        );

        assert_eq!(keys(ClassKind::GrenadeMod, SafetyTier::Safe).len(), 8);
        assert_eq!(keys(ClassKind::GrenadeMod, SafetyTier::Expert).len(), 8);
        assert_eq!(
            keys(ClassKind::GrenadeMod, SafetyTier::Insane).last(),
            Some(&SlotKey::Material)
        );
    }

    #[test]
    fn pool_paths_follow_class() {
        let weapon = slots_for(ClassKind::Weapon, SafetyTier::Safe, None);
        assert!(
            weapon
                .iter()
                .all(|d| d.pool.path == PoolPath::RuntimePartListCollection && d.pool.slot == d.slot)
        );
        let artifact = slots_for(ClassKind::Artifact, SafetyTier::Safe, None);
        assert!(
            artifact
                .iter()
                .all(|d| d.pool.path == PoolPath::PartListCollection)
        );
    }

    #[test]
    fn shield_reroutes_when_primary_beta_is_populated() {
        let plain = BalanceDefinition::new("GD_Shields.Plain").with_pool(
            PoolPath::InventoryDefinition,
            SlotKey::Alpha,
            ["Shield.Body.A"],
        );
        assert_eq!(
            pool_path_for(ClassKind::Shield, Some(&plain)),
            PoolPath::InventoryDefinition
        );

        let empty_beta = plain.clone().with_pool(
            PoolPath::InventoryDefinition,
            SlotKey::Beta,
            Vec::<&str>::new(),
        );
        assert_eq!(
            pool_path_for(ClassKind::Shield, Some(&empty_beta)),
            PoolPath::InventoryDefinition
        );

        let populated = plain.with_pool(
            PoolPath::InventoryDefinition,
            SlotKey::Beta,
            ["Shield.Battery.A"],
        );
        let slots = slots_for(ClassKind::Shield, SafetyTier::Safe, Some(&populated));
        assert!(
            slots
                .iter()
                .all(|d| d.pool.path == PoolPath::PartListCollection)
        );
    }
}
