use serde::{Deserialize, Serialize};

use crate::balance::BalanceCatalog;
use crate::item::{ItemId, ItemRecord};

/// A saved backpack: the balance definitions it references and its items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackpackData {
    #[serde(default)]
    pub balances: BalanceCatalog,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

impl BackpackData {
    /// Create an empty backpack (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a backpack from JSON and initialize every item's derived data.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a backpack.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut data: Self = serde_json::from_str(json)?;
        for item in &mut data.items {
            item.initialize_internal();
        }
        Ok(data)
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id == id)
    }
}
