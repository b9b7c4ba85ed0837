//! Spare Parts Salvage Engine
//!
//! Host-agnostic core of the Spare Parts salvage feature: decide which part
//! slots two items may exchange, stage a merged draft through a guided
//! review and commit it to the host inventory.
//! This crate renders nothing and owns no input handling; hosts plug in
//! through the traits in [`host`].

pub mod balance;
pub mod commit;
mod constants;
pub mod controller;
pub mod data;
pub mod error;
pub mod host;
pub mod item;
pub mod options;
pub mod rarity;
pub mod resolver;
pub mod review;
pub mod schema;
pub mod staging;

// Re-export commonly used types
pub use balance::{BalanceCatalog, BalanceDefinition, PartPool, PoolKey, PoolPath, WeightedPart};
pub use commit::{IdAllocator, commit, commit_session};
pub use controller::{SalvageController, SalvageEvent};
pub use data::BackpackData;
pub use error::{CommitError, CommitStep, SalvageError};
pub use host::{
    ChoiceDialog, DialogPresenter, InputPhase, Inventory, PartFormatter, PlainPartFormatter,
    SalvageHost, SelectionSource,
};
pub use item::{
    BalanceId, ClassKind, DerivedData, ItemId, ItemRecord, PartRef, PartSlots, PlayerClass,
    SlotKey,
};
pub use options::{OptionsError, SalvageOptions};
pub use rarity::{
    AcceptableBand, GameVariant, RarityRank, RarityTable, RarityTier, is_acceptable, rank_of,
};
pub use resolver::{IncompatiblePart, Resolution, Side, SlotVerdict, SwapCandidate, resolve};
pub use review::{FoundPart, FoundParts, strip_markup};
pub use schema::{SafetyTier, SlotDescriptor, slots_for};
pub use staging::{MergedItemDraft, SessionPhase, StagingSession, run_prechecks};
