//! Slot-by-slot compatibility between an acceptor and a donor item.
use serde::{Deserialize, Serialize};

use crate::balance::BalanceCatalog;
use crate::item::{ClassKind, ItemRecord, PartRef, SlotKey};
use crate::schema::{SafetyTier, slots_for};

/// Which of the two source items currently supplies a candidate's part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    First,
    Second,
}

impl Side {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// A slot whose part may be exchanged between the two items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCandidate {
    pub slot: SlotKey,
    pub from_first: Option<PartRef>,
    pub from_second: Option<PartRef>,
    pub active_side: Side,
}

impl SwapCandidate {
    #[must_use]
    pub const fn new(slot: SlotKey, from_first: Option<PartRef>, from_second: Option<PartRef>) -> Self {
        Self {
            slot,
            from_first,
            from_second,
            active_side: Side::First,
        }
    }

    #[must_use]
    pub const fn part(&self, side: Side) -> Option<&PartRef> {
        match side {
            Side::First => self.from_first.as_ref(),
            Side::Second => self.from_second.as_ref(),
        }
    }

    /// Part currently chosen for the merged draft.
    #[must_use]
    pub const fn active_part(&self) -> Option<&PartRef> {
        self.part(self.active_side)
    }

    /// Part offered by the option that would flip this candidate.
    #[must_use]
    pub const fn inactive_part(&self) -> Option<&PartRef> {
        self.part(self.active_side.flipped())
    }

    pub const fn toggle(&mut self) {
        self.active_side = self.active_side.flipped();
    }

    /// Both items already carry the same part in this slot.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.from_first == self.from_second
    }
}

/// Donor part that is not native to the acceptor under the active tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompatiblePart {
    pub slot: SlotKey,
    pub part: Option<PartRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotVerdict {
    Swappable,
    Incompatible,
    Skipped,
}

/// Outcome of resolving one item pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Swappable slots in schema order, duplicates included.
    pub candidates: Vec<SwapCandidate>,
    pub incompatible: Vec<IncompatiblePart>,
    pub skipped: Vec<SlotKey>,
}

impl Resolution {
    /// Classification of `slot`, or `None` when the schema never considered it.
    #[must_use]
    pub fn verdict(&self, slot: SlotKey) -> Option<SlotVerdict> {
        if self.candidates.iter().any(|c| c.slot == slot) {
            Some(SlotVerdict::Swappable)
        } else if self.incompatible.iter().any(|p| p.slot == slot) {
            Some(SlotVerdict::Incompatible)
        } else if self.skipped.contains(&slot) {
            Some(SlotVerdict::Skipped)
        } else {
            None
        }
    }

    /// Candidates that would actually change the draft.
    pub fn actionable(&self) -> impl Iterator<Item = &SwapCandidate> + '_ {
        self.candidates.iter().filter(|c| !c.is_duplicate())
    }

    fn swappable(&mut self, slot: SlotKey, first: Option<&PartRef>, second: Option<&PartRef>) {
        self.candidates
            .push(SwapCandidate::new(slot, first.cloned(), second.cloned()));
    }

    fn incompatible(&mut self, slot: SlotKey, part: Option<&PartRef>) {
        self.incompatible.push(IncompatiblePart {
            slot,
            part: part.cloned(),
        });
    }
}

/// Classify every schema slot of `class_kind` for the pair `(first, second)`.
///
/// `first` is the acceptor; native pools are read from its balance.
#[must_use]
pub fn resolve(
    first: &ItemRecord,
    second: &ItemRecord,
    class_kind: ClassKind,
    tier: SafetyTier,
    catalog: &BalanceCatalog,
) -> Resolution {
    let balance = catalog.get(&first.balance);
    let same_sub_kind = !first.sub_kind.is_empty() && first.sub_kind == second.sub_kind;
    let mut resolution = Resolution::default();

    for descriptor in slots_for(class_kind, tier, balance) {
        let slot = descriptor.slot;
        let first_part = first.part(slot);
        let second_part = second.part(slot);
        let in_pool = |part: Option<&PartRef>| {
            part.zip(balance)
                .is_some_and(|(part, balance)| balance.pool_contains(descriptor.pool, part))
        };

        if tier == SafetyTier::Insane {
            if first_part.is_none() && second_part.is_none() {
                resolution.skipped.push(slot);
                continue;
            }
            // Literal grouping: same sub-kind OR native membership.
            if same_sub_kind || in_pool(second_part) {
                resolution.swappable(slot, first_part, second_part);
            } else if second_part.is_none() {
                resolution.skipped.push(slot);
            } else {
                resolution.incompatible(slot, second_part);
            }
            continue;
        }

        if second_part.is_none() {
            resolution.skipped.push(slot);
            continue;
        }
        if first_part.is_none() {
            resolution.incompatible(slot, second_part);
            continue;
        }
        if in_pool(second_part) {
            resolution.swappable(slot, first_part, second_part);
        } else {
            resolution.incompatible(slot, second_part);
        }
    }

    log::debug!(
        "resolved {} vs {} at {tier}: {} swappable, {} incompatible, {} skipped",
        first.id,
        second.id,
        resolution.candidates.len(),
        resolution.incompatible.len(),
        resolution.skipped.len()
    );
    resolution
}
