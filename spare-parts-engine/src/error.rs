use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{ClassKind, ItemId, PlayerClass, SlotKey, class_label};
use crate::rarity::{AcceptableBand, RarityTier};
use crate::review::FoundParts;
use crate::staging::SessionPhase;

/// Conditions that end or block a salvage interaction.
///
/// Every variant is resolved at the interaction boundary with a message to
/// the player; none of them are fatal to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalvageError {
    #[error("the same item was selected twice")]
    NoOpSelection,
    #[error("a {} cannot take parts from a {}", .acceptor.key(), .donor.key())]
    KindMismatch {
        acceptor: ClassKind,
        donor: ClassKind,
    },
    #[error("item {0} is equipped or part of the ammo pool")]
    EquippedItem(ItemId),
    #[error("donor rarity {donor} is outside the accepted band {band}")]
    RarityViolation {
        donor: RarityTier,
        band: AcceptableBand,
    },
    #[error("unique items only take parts from another copy of the same unique")]
    UniqueItemViolation,
    #[error(
        "class mod for {} cannot take parts from a class mod for {}",
        class_label(.acceptor.as_ref().copied()),
        class_label(.donor.as_ref().copied())
    )]
    ClassMismatch {
        acceptor: Option<PlayerClass>,
        donor: Option<PlayerClass>,
    },
    #[error("no compatible parts found")]
    NoCompatibleSlots { found: FoundParts },
    #[error("slot {0} is not staged for swapping")]
    UnstagedSlot(SlotKey),
    #[error("session is {actual:?}, expected {expected:?}")]
    InvalidPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },
}

impl SalvageError {
    /// Silent rejections produce no dialog.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::NoOpSelection | Self::KindMismatch { .. })
    }

    /// Stable snake-case name used in event logs and reports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoOpSelection => "no_op_selection",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::EquippedItem(_) => "equipped_item",
            Self::RarityViolation { .. } => "rarity_violation",
            Self::UniqueItemViolation => "unique_item_violation",
            Self::ClassMismatch { .. } => "class_mismatch",
            Self::NoCompatibleSlots { .. } => "no_compatible_slots",
            Self::UnstagedSlot(_) => "unstaged_slot",
            Self::InvalidPhase { .. } => "invalid_phase",
        }
    }
}

/// Host inventory step a commit was executing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStep {
    AddDraft,
    RemoveFirst,
    RemoveSecond,
    RefreshCount,
}

impl std::fmt::Display for CommitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AddDraft => "add merged item",
            Self::RemoveFirst => "remove acceptor",
            Self::RemoveSecond => "remove donor",
            Self::RefreshCount => "refresh inventory count",
        })
    }
}

/// Failure while committing a staged draft.
///
/// Host failures are neither retried nor rolled back; steps before `step`
/// have already been applied.
#[derive(Debug, Error)]
pub enum CommitError<E>
where
    E: std::error::Error + 'static,
{
    #[error("commit blocked: {0}")]
    Blocked(#[from] SalvageError),
    #[error("inventory rejected step '{step}'")]
    Host {
        step: CommitStep,
        #[source]
        source: E,
    },
}
