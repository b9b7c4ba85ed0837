//! Native part pools exposed by balance definitions.
//!
//! A balance definition names, for every slot, the weighted parts the game
//! can roll on an item built from it. These pools are the compatibility
//! oracle: a donor part is only native to an item when it appears here.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::{BalanceId, PartRef, SlotKey};

/// Collection a pool is read from inside a balance definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolPath {
    RuntimePartListCollection,
    PartListCollection,
    InventoryDefinition,
}

/// Location of a single native pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolKey {
    pub path: PoolPath,
    pub slot: SlotKey,
}

impl PoolKey {
    #[must_use]
    pub const fn new(path: PoolPath, slot: SlotKey) -> Self {
        Self { path, slot }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPart {
    pub part: PartRef,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

const fn default_weight() -> f32 {
    1.0
}

impl WeightedPart {
    #[must_use]
    pub fn new(part: impl Into<PartRef>) -> Self {
        Self {
            part: part.into(),
            weight: default_weight(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPool {
    pub path: PoolPath,
    pub slot: SlotKey,
    #[serde(default)]
    pub weighted_parts: Vec<WeightedPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceDefinition {
    pub id: BalanceId,
    #[serde(default)]
    pub pools: Vec<PartPool>,
}

impl BalanceDefinition {
    #[must_use]
    pub fn new(id: impl Into<BalanceId>) -> Self {
        Self {
            id: id.into(),
            pools: Vec::new(),
        }
    }

    /// Add parts to a pool, creating the pool if it does not exist yet.
    #[must_use]
    pub fn with_pool<I, P>(mut self, path: PoolPath, slot: SlotKey, parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PartRef>,
    {
        let weighted = parts.into_iter().map(WeightedPart::new);
        if let Some(pool) = self
            .pools
            .iter_mut()
            .find(|pool| pool.path == path && pool.slot == slot)
        {
            pool.weighted_parts.extend(weighted);
        } else {
            self.pools.push(PartPool {
                path,
                slot,
                weighted_parts: weighted.collect(),
            });
        }
        self
    }

    /// Pool at `key`, or `None` when the definition does not expose it at all.
    #[must_use]
    pub fn pool(&self, key: PoolKey) -> Option<&[WeightedPart]> {
        self.pools
            .iter()
            .find(|pool| pool.path == key.path && pool.slot == key.slot)
            .map(|pool| pool.weighted_parts.as_slice())
    }

    /// True when the pool at `key` exists and holds at least one part.
    #[must_use]
    pub fn is_populated(&self, key: PoolKey) -> bool {
        self.pool(key).is_some_and(|parts| !parts.is_empty())
    }

    #[must_use]
    pub fn pool_contains(&self, key: PoolKey, part: &PartRef) -> bool {
        self.pool(key)
            .is_some_and(|parts| parts.iter().any(|weighted| &weighted.part == part))
    }
}

/// Every balance definition known to the host, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BalanceDefinition>", into = "Vec<BalanceDefinition>")]
pub struct BalanceCatalog {
    balances: BTreeMap<BalanceId, BalanceDefinition>,
}

impl BalanceCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON array of balance definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Insert a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, balance: BalanceDefinition) {
        self.balances.insert(balance.id.clone(), balance);
    }

    #[must_use]
    pub fn get(&self, id: &BalanceId) -> Option<&BalanceDefinition> {
        self.balances.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl From<Vec<BalanceDefinition>> for BalanceCatalog {
    fn from(balances: Vec<BalanceDefinition>) -> Self {
        let mut catalog = Self::new();
        for balance in balances {
            catalog.insert(balance);
        }
        catalog
    }
}

impl From<BalanceCatalog> for Vec<BalanceDefinition> {
    fn from(catalog: BalanceCatalog) -> Self {
        catalog.balances.into_values().collect()
    }
}
