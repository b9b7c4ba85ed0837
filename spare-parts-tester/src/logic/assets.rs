use spare_parts_engine::{BackpackData, ItemId, ItemRecord};

const DEFAULT_BACKPACK: &str = include_str!("../../assets/backpack.json");

/// Fixture backpack shared by every scenario run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    backpack: BackpackData,
}

impl TesterAssets {
    pub fn load_default() -> Self {
        let backpack = BackpackData::from_json(DEFAULT_BACKPACK).unwrap_or_else(|err| {
            log::error!("bundled backpack is invalid: {err}");
            BackpackData::empty()
        });
        Self { backpack }
    }

    pub const fn backpack(&self) -> &BackpackData {
        &self.backpack
    }

    pub fn item(&self, id: u64) -> Option<&ItemRecord> {
        self.backpack.item(ItemId(id))
    }
}
