#![allow(dead_code)]

use spare_parts_engine::{
    BackpackData, ChoiceDialog, DialogPresenter, Inventory, ItemId, ItemRecord, PartFormatter,
    PartRef, PlainPartFormatter, SalvageHost, SelectionSource,
};
use thiserror::Error;

pub const BACKPACK_JSON: &str = include_str!("../../../spare-parts-tester/assets/backpack.json");

pub const SMG_HYPERION: u64 = 1001;
pub const SMG_MALIWAN: u64 = 1002;
pub const SMG_EQUIPPED: u64 = 1003;
pub const SHOTGUN_LEGENDARY: u64 = 2001;
pub const SHOTGUN_RARE: u64 = 2002;
pub const SHIELD_A: u64 = 3001;
pub const SHIELD_B: u64 = 3002;
pub const CLASS_MOD_SIREN: u64 = 4001;
pub const CLASS_MOD_MECHROMANCER: u64 = 4002;
pub const ARTIFACT_FIRE: u64 = 5001;
pub const ARTIFACT_SHOCK: u64 = 5002;
pub const GRENADE: u64 = 6001;
pub const GRENADE_AMMO_POOLED: u64 = 6002;
pub const SMG_LEGENDARY: u64 = 7001;

pub fn backpack() -> BackpackData {
    BackpackData::from_json(BACKPACK_JSON).unwrap()
}

pub fn item(data: &BackpackData, id: u64) -> ItemRecord {
    data.item(ItemId(id)).cloned().unwrap()
}

pub fn part(path: &str) -> Option<PartRef> {
    Some(PartRef::from(path))
}

#[derive(Debug, Error)]
#[error("inventory rejected {0}")]
pub struct InventoryRejected(pub &'static str);

#[derive(Debug, Default)]
pub struct MemoryInventory {
    pub items: Vec<ItemRecord>,
    pub refreshes: usize,
    pub reject_add: bool,
}

impl MemoryInventory {
    pub fn holds(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}

impl Inventory for MemoryInventory {
    type Error = InventoryRejected;

    fn add(&mut self, item: ItemRecord) -> Result<(), Self::Error> {
        if self.reject_add {
            return Err(InventoryRejected("add"));
        }
        self.items.push(item);
        Ok(())
    }

    fn remove(&mut self, item: &ItemRecord) -> Result<(), Self::Error> {
        let before = self.items.len();
        self.items.retain(|held| held.id != item.id);
        if self.items.len() == before {
            return Err(InventoryRejected("remove"));
        }
        Ok(())
    }

    fn refresh_count(&mut self) -> Result<(), Self::Error> {
        self.refreshes += 1;
        Ok(())
    }
}

/// Host double that records every dialog the engine asks for.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub pair: Option<(ItemRecord, ItemRecord)>,
    pub inventory: MemoryInventory,
    pub messages: Vec<(String, String)>,
    pub choices: Vec<ChoiceDialog>,
    pub inspected: Vec<ItemRecord>,
    pub dismissed: usize,
}

impl RecordingHost {
    pub fn with_backpack(data: &BackpackData) -> Self {
        Self {
            inventory: MemoryInventory {
                items: data.items.clone(),
                ..MemoryInventory::default()
            },
            ..Self::default()
        }
    }

    pub fn select(&mut self, data: &BackpackData, first: u64, second: u64) {
        self.pair = Some((item(data, first), item(data, second)));
    }

    pub fn last_message(&self) -> Option<&(String, String)> {
        self.messages.last()
    }

    pub fn last_choice(&self) -> Option<&ChoiceDialog> {
        self.choices.last()
    }
}

impl SelectionSource for RecordingHost {
    fn selected_pair(&self) -> Option<(ItemRecord, ItemRecord)> {
        self.pair.clone()
    }
}

impl DialogPresenter for RecordingHost {
    fn present_choice(&mut self, dialog: &ChoiceDialog) {
        self.choices.push(dialog.clone());
    }

    fn present_message(&mut self, title: &str, body: &str) {
        self.messages.push((title.to_string(), body.to_string()));
    }

    fn present_inspection(&mut self, item: &ItemRecord) {
        self.inspected.push(item.clone());
    }

    fn dismiss_comparison(&mut self) {
        self.dismissed += 1;
    }
}

impl PartFormatter for RecordingHost {
    fn format_part_label(
        &self,
        part: Option<&PartRef>,
        include_styling: bool,
        include_null_placeholder: bool,
    ) -> String {
        PlainPartFormatter.format_part_label(part, include_styling, include_null_placeholder)
    }
}

impl SalvageHost for RecordingHost {
    type Inventory = MemoryInventory;

    fn inventory(&mut self) -> &mut Self::Inventory {
        &mut self.inventory
    }
}
