use spare_parts_engine::{
    ChoiceDialog, DialogPresenter, Inventory, ItemId, ItemRecord, PartFormatter, PartRef,
    PlainPartFormatter, SalvageHost, SelectionSource,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("item {0} is already in the backpack")]
    Duplicate(ItemId),
    #[error("item {0} is not in the backpack")]
    Missing(ItemId),
}

/// Backpack kept in memory for the length of one scenario.
#[derive(Debug, Clone, Default)]
pub struct TesterInventory {
    pub items: Vec<ItemRecord>,
    pub refreshes: usize,
}

impl TesterInventory {
    pub fn new(items: Vec<ItemRecord>) -> Self {
        Self {
            items,
            refreshes: 0,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Inventory for TesterInventory {
    type Error = InventoryError;

    fn add(&mut self, item: ItemRecord) -> Result<(), Self::Error> {
        if self.get(item.id).is_some() {
            return Err(InventoryError::Duplicate(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    fn remove(&mut self, item: &ItemRecord) -> Result<(), Self::Error> {
        let Some(index) = self.items.iter().position(|held| held.id == item.id) else {
            return Err(InventoryError::Missing(item.id));
        };
        self.items.remove(index);
        Ok(())
    }

    fn refresh_count(&mut self) -> Result<(), Self::Error> {
        self.refreshes += 1;
        Ok(())
    }
}

/// Headless host that records what a player would have seen.
#[derive(Debug, Clone, Default)]
pub struct TesterHost {
    pair: Option<(ItemRecord, ItemRecord)>,
    pub inventory: TesterInventory,
    pub messages: Vec<(String, String)>,
    pub choices: Vec<ChoiceDialog>,
    pub inspected: Vec<ItemRecord>,
    pub dismissed: usize,
}

impl TesterHost {
    pub fn new(inventory: TesterInventory) -> Self {
        Self {
            inventory,
            ..Self::default()
        }
    }

    pub fn compare(&mut self, first: ItemRecord, second: ItemRecord) {
        self.pair = Some((first, second));
    }
}

impl SelectionSource for TesterHost {
    fn selected_pair(&self) -> Option<(ItemRecord, ItemRecord)> {
        self.pair.clone()
    }
}

impl DialogPresenter for TesterHost {
    fn present_choice(&mut self, dialog: &ChoiceDialog) {
        log::debug!("choice dialog '{}' with {} options", dialog.title, dialog.options.len());
        self.choices.push(dialog.clone());
    }

    fn present_message(&mut self, title: &str, body: &str) {
        log::debug!("message dialog '{title}'");
        self.messages.push((title.to_string(), body.to_string()));
    }

    fn present_inspection(&mut self, item: &ItemRecord) {
        self.inspected.push(item.clone());
    }

    fn dismiss_comparison(&mut self) {
        self.pair = None;
        self.dismissed += 1;
    }
}

impl PartFormatter for TesterHost {
    fn format_part_label(
        &self,
        part: Option<&PartRef>,
        include_styling: bool,
        include_null_placeholder: bool,
    ) -> String {
        PlainPartFormatter.format_part_label(part, include_styling, include_null_placeholder)
    }
}

impl SalvageHost for TesterHost {
    type Inventory = TesterInventory;

    fn inventory(&mut self) -> &mut Self::Inventory {
        &mut self.inventory
    }
}
