//! Materializing a staged draft into the host inventory.
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{CommitError, CommitStep};
use crate::host::Inventory;
use crate::item::{ItemId, ItemRecord};
use crate::staging::{MergedItemDraft, StagingSession};

/// Deterministic source of fresh item identifiers.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    rng: ChaCha20Rng,
}

impl IdAllocator {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Next non-zero id that is not in `taken`.
    pub fn fresh(&mut self, taken: &[ItemId]) -> ItemId {
        loop {
            let id = ItemId(self.rng.next_u64());
            if id.0 != 0 && !taken.contains(&id) {
                return id;
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

fn failed_at<E>(step: CommitStep) -> impl FnOnce(E) -> CommitError<E>
where
    E: std::error::Error + 'static,
{
    move |source| CommitError::Host { step, source }
}

/// Add the draft under a fresh id, then remove both sources and refresh.
///
/// Steps run in that fixed order. A failing step stops the sequence; earlier
/// steps stay applied.
///
/// # Errors
///
/// Returns [`CommitError::Host`] naming the step the inventory rejected.
pub fn commit<I>(
    draft: MergedItemDraft,
    first: &ItemRecord,
    second: &ItemRecord,
    inventory: &mut I,
    ids: &mut IdAllocator,
) -> Result<ItemId, CommitError<I::Error>>
where
    I: Inventory + ?Sized,
{
    let mut item = draft.into_item();
    let id = ids.fresh(&[first.id, second.id]);
    item.id = id;

    inventory
        .add(item)
        .map_err(failed_at(CommitStep::AddDraft))?;
    inventory
        .remove(first)
        .map_err(failed_at(CommitStep::RemoveFirst))?;
    inventory
        .remove(second)
        .map_err(failed_at(CommitStep::RemoveSecond))?;
    inventory
        .refresh_count()
        .map_err(failed_at(CommitStep::RefreshCount))?;

    log::info!(
        "salvaged {} into {}, producing {id}",
        second.id,
        first.id
    );
    Ok(id)
}

/// Confirm `session` and commit its draft.
///
/// # Errors
///
/// Returns [`CommitError::Blocked`] when the session cannot be confirmed
/// (the session is unchanged), or [`CommitError::Host`] from [`commit`].
pub fn commit_session<I>(
    session: &mut StagingSession,
    inventory: &mut I,
    ids: &mut IdAllocator,
) -> Result<ItemId, CommitError<I::Error>>
where
    I: Inventory + ?Sized,
{
    let draft = session.confirm()?;
    commit(draft, session.first(), session.second(), inventory, ids)
}
