//! Swap staging: pre-checks, the live merged draft and the review state machine.
use serde::{Deserialize, Serialize};

use crate::balance::BalanceCatalog;
use crate::error::SalvageError;
use crate::host::{ChoiceDialog, PartFormatter};
use crate::item::{ClassKind, ItemRecord, SlotKey};
use crate::options::SalvageOptions;
use crate::rarity::{RarityTable, is_acceptable};
use crate::resolver::{Side, SwapCandidate, resolve};
use crate::review::{FoundParts, candidate_label, guided_review};
use crate::schema::SafetyTier;

/// Where a staging session currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Resolver ran; the found-parts summary is on screen.
    Selecting,
    /// Guided review is open and accepts toggles.
    Previewing,
    Inspecting,
    Committed,
    Cancelled,
}

/// Clone of the acceptor with every candidate's active part written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedItemDraft {
    item: ItemRecord,
}

impl MergedItemDraft {
    #[must_use]
    pub fn new(first: &ItemRecord, candidates: &[SwapCandidate]) -> Self {
        let mut draft = Self {
            item: first.clone(),
        };
        draft.rederive(candidates);
        draft
    }

    /// Rewrite every candidate slot from its active side and re-initialize.
    ///
    /// The result depends only on the acceptor and the candidates' active
    /// sides, so repeated calls with the same input are bit-for-bit stable.
    pub fn rederive(&mut self, candidates: &[SwapCandidate]) {
        for candidate in candidates {
            self.item
                .parts
                .set(candidate.slot, candidate.active_part().cloned());
        }
        self.item.initialize_internal();
    }

    #[must_use]
    pub const fn item(&self) -> &ItemRecord {
        &self.item
    }

    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.item.derived.fingerprint
    }

    #[must_use]
    pub fn into_item(self) -> ItemRecord {
        self.item
    }
}

/// Selection checks that run before resolution, in order.
///
/// # Errors
///
/// Returns the first rule the pair violates.
pub fn run_prechecks(
    first: &ItemRecord,
    second: &ItemRecord,
    options: &SalvageOptions,
) -> Result<(), SalvageError> {
    if first.id == second.id {
        return Err(SalvageError::NoOpSelection);
    }
    if first.class_kind != second.class_kind {
        return Err(SalvageError::KindMismatch {
            acceptor: first.class_kind,
            donor: second.class_kind,
        });
    }
    if second.is_pinned() {
        return Err(SalvageError::EquippedItem(second.id));
    }

    let table = RarityTable::for_variant(options.game_variant);
    let first_rank = table.rank_of(first.rarity_code);
    let second_rank = table.rank_of(second.rarity_code);

    if options.strict_uniques
        && first.class_kind != ClassKind::ClassMod
        && second_rank.display >= table.unique_threshold()
        && first.balance != second.balance
    {
        return Err(SalvageError::UniqueItemViolation);
    }
    if options.rarity_lock && !is_acceptable(first_rank, second_rank) {
        return Err(SalvageError::RarityViolation {
            donor: second_rank.display,
            band: table.acceptable_band(first_rank),
        });
    }
    Ok(())
}

/// Class mods locked to different player classes cannot be merged below Insane.
#[must_use]
pub fn class_mismatch(
    first: &ItemRecord,
    second: &ItemRecord,
    tier: SafetyTier,
) -> Option<SalvageError> {
    (first.class_kind == ClassKind::ClassMod
        && tier != SafetyTier::Insane
        && first.required_class != second.required_class)
        .then_some(SalvageError::ClassMismatch {
            acceptor: first.required_class,
            donor: second.required_class,
        })
}

/// One open salvage interaction for a single item pair.
#[derive(Debug, Clone)]
pub struct StagingSession {
    first: ItemRecord,
    second: ItemRecord,
    found: FoundParts,
    candidates: Vec<SwapCandidate>,
    draft: MergedItemDraft,
    phase: SessionPhase,
    commit_block: Option<SalvageError>,
    focused: usize,
}

impl StagingSession {
    /// Check, resolve and stage `(first, second)`.
    ///
    /// # Errors
    ///
    /// Returns a pre-check violation, or [`SalvageError::NoCompatibleSlots`]
    /// carrying the found parts when nothing actionable remains.
    pub fn open(
        first: ItemRecord,
        second: ItemRecord,
        options: &SalvageOptions,
        catalog: &BalanceCatalog,
    ) -> Result<Self, SalvageError> {
        run_prechecks(&first, &second, options)?;

        let tier = options.safety_tier;
        let resolution = resolve(&first, &second, first.class_kind, tier, catalog);
        let found = FoundParts::from_resolution(&resolution);
        let candidates: Vec<SwapCandidate> = resolution
            .candidates
            .into_iter()
            .filter(|candidate| !candidate.is_duplicate())
            .collect();
        if candidates.is_empty() {
            return Err(SalvageError::NoCompatibleSlots { found });
        }

        let commit_block = class_mismatch(&first, &second, tier);
        let draft = MergedItemDraft::new(&first, &candidates);
        log::debug!(
            "staged {} <- {}: {} candidates, {} duplicates dropped, commit blocked: {}",
            first.id,
            second.id,
            candidates.len(),
            found.duplicate_count(),
            commit_block.is_some()
        );
        Ok(Self {
            first,
            second,
            found,
            candidates,
            draft,
            phase: SessionPhase::Selecting,
            commit_block,
            focused: 0,
        })
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<(), SalvageError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SalvageError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Leave the found-parts summary and open the guided review.
    ///
    /// # Errors
    ///
    /// Returns [`SalvageError::InvalidPhase`] unless the session is selecting.
    pub fn begin_review(&mut self) -> Result<(), SalvageError> {
        self.expect_phase(SessionPhase::Selecting)?;
        self.phase = SessionPhase::Previewing;
        Ok(())
    }

    /// Flip the active side of `slot` and re-derive the draft.
    ///
    /// # Errors
    ///
    /// Returns an error outside the review or when `slot` is not staged.
    pub fn toggle(&mut self, slot: SlotKey) -> Result<Side, SalvageError> {
        self.expect_phase(SessionPhase::Previewing)?;
        let Some(index) = self
            .candidates
            .iter()
            .position(|candidate| candidate.slot == slot)
        else {
            return Err(SalvageError::UnstagedSlot(slot));
        };
        let candidate = &mut self.candidates[index];
        candidate.toggle();
        let side = candidate.active_side;
        self.focused = index;
        self.draft.rederive(&self.candidates);
        log::debug!("toggled {slot} to {side:?}");
        Ok(side)
    }

    /// Clone of the current draft for the read-only inspection view.
    ///
    /// # Errors
    ///
    /// Returns [`SalvageError::InvalidPhase`] outside the review.
    pub fn begin_inspection(&mut self) -> Result<ItemRecord, SalvageError> {
        self.expect_phase(SessionPhase::Previewing)?;
        self.phase = SessionPhase::Inspecting;
        Ok(self.draft.item().clone())
    }

    /// # Errors
    ///
    /// Returns [`SalvageError::InvalidPhase`] unless an inspection is open.
    pub fn end_inspection(&mut self) -> Result<(), SalvageError> {
        self.expect_phase(SessionPhase::Inspecting)?;
        self.phase = SessionPhase::Previewing;
        Ok(())
    }

    /// Mark the draft as discarded. Nothing outside the session changes.
    pub fn cancel(&mut self) {
        log::debug!("cancelled staging for {} <- {}", self.first.id, self.second.id);
        self.phase = SessionPhase::Cancelled;
    }

    /// Hand out the draft for commit and close the review.
    ///
    /// # Errors
    ///
    /// Returns the commit block (e.g. [`SalvageError::ClassMismatch`]) or an
    /// invalid phase; the session is left untouched in both cases.
    pub fn confirm(&mut self) -> Result<MergedItemDraft, SalvageError> {
        self.expect_phase(SessionPhase::Previewing)?;
        if let Some(block) = &self.commit_block {
            return Err(block.clone());
        }
        self.phase = SessionPhase::Committed;
        Ok(self.draft.clone())
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub const fn first(&self) -> &ItemRecord {
        &self.first
    }

    #[must_use]
    pub const fn second(&self) -> &ItemRecord {
        &self.second
    }

    /// Presented candidates, duplicates already removed.
    #[must_use]
    pub fn candidates(&self) -> &[SwapCandidate] {
        &self.candidates
    }

    #[must_use]
    pub const fn found(&self) -> &FoundParts {
        &self.found
    }

    #[must_use]
    pub const fn draft(&self) -> &MergedItemDraft {
        &self.draft
    }

    #[must_use]
    pub const fn commit_block(&self) -> Option<&SalvageError> {
        self.commit_block.as_ref()
    }

    #[must_use]
    pub const fn focused(&self) -> usize {
        self.focused
    }

    #[must_use]
    pub fn labels<F: PartFormatter + ?Sized>(&self, formatter: &F) -> Vec<String> {
        self.candidates
            .iter()
            .map(|candidate| candidate_label(candidate, formatter))
            .collect()
    }

    #[must_use]
    pub fn review_dialog<F: PartFormatter + ?Sized>(
        &self,
        formatter: &F,
        options: &SalvageOptions,
    ) -> ChoiceDialog {
        guided_review(&self.candidates, formatter, options, self.focused)
    }
}
