mod common;

use std::hash::Hasher;

use common::{SHIELD_A, SHIELD_B, SMG_HYPERION, SMG_MALIWAN, backpack, item};
use spare_parts_engine::{
    BackpackData, GameVariant, ItemRecord, RarityTable, SafetyTier, SalvageOptions, SlotKey,
    StagingSession, is_acceptable, rank_of, resolve, slots_for,
};
use twox_hash::XxHash64;

fn same_kind_pairs(data: &BackpackData) -> Vec<(ItemRecord, ItemRecord)> {
    let mut pairs = Vec::new();
    for first in &data.items {
        for second in &data.items {
            if first.id != second.id && first.class_kind == second.class_kind {
                pairs.push((first.clone(), second.clone()));
            }
        }
    }
    pairs
}

fn item_digest(item: &ItemRecord) -> u64 {
    let mut hasher = XxHash64::with_seed(0x5A1_FA6E);
    let bytes = serde_json::to_vec(item).unwrap();
    hasher.write(&bytes);
    hasher.finish()
}

#[test]
fn every_slot_gets_exactly_one_verdict() {
    let data = backpack();
    for (first, second) in same_kind_pairs(&data) {
        for tier in SafetyTier::ALL {
            let resolution = resolve(&first, &second, first.class_kind, tier, &data.balances);
            let balance = data.balances.get(&first.balance);
            for descriptor in slots_for(first.class_kind, tier, balance) {
                let swappable = resolution
                    .candidates
                    .iter()
                    .filter(|c| c.slot == descriptor.slot)
                    .count();
                let incompatible = resolution
                    .incompatible
                    .iter()
                    .filter(|p| p.slot == descriptor.slot)
                    .count();
                let skipped = usize::from(resolution.skipped.contains(&descriptor.slot));
                assert_eq!(
                    swappable + incompatible + skipped,
                    1,
                    "{} <- {} at {tier}: {}",
                    first.id,
                    second.id,
                    descriptor.slot
                );
            }
        }
    }
}

#[test]
fn safe_candidates_are_native_to_the_acceptor() {
    let data = backpack();
    for (first, second) in same_kind_pairs(&data) {
        let balance = data.balances.get(&first.balance);
        let resolution = resolve(
            &first,
            &second,
            first.class_kind,
            SafetyTier::Safe,
            &data.balances,
        );
        for candidate in &resolution.candidates {
            let descriptor = slots_for(first.class_kind, SafetyTier::Safe, balance)
                .into_iter()
                .find(|descriptor| descriptor.slot == candidate.slot)
                .unwrap();
            let donor_part = candidate.from_second.as_ref().unwrap();
            assert!(
                balance.is_some_and(|b| b.pool_contains(descriptor.pool, donor_part)),
                "{donor_part} is not native to {}",
                first.balance.as_str()
            );
        }
    }
}

#[test]
fn toggle_is_an_involution_on_the_draft() {
    let data = backpack();
    for (first, second) in [(SMG_HYPERION, SMG_MALIWAN), (SHIELD_A, SHIELD_B)] {
        let mut session = StagingSession::open(
            item(&data, first),
            item(&data, second),
            &SalvageOptions::default().with_safety_tier(SafetyTier::Insane),
            &data.balances,
        )
        .unwrap();
        session.begin_review().unwrap();

        let slots: Vec<SlotKey> = session.candidates().iter().map(|c| c.slot).collect();
        for slot in slots {
            let before = session.draft().clone();
            let digest = item_digest(before.item());
            session.toggle(slot).unwrap();
            session.toggle(slot).unwrap();
            assert_eq!(item_digest(session.draft().item()), digest);
            assert_eq!(session.draft().fingerprint(), before.fingerprint());
            assert_eq!(session.draft(), &before);
        }
    }
}

#[test]
fn duplicates_never_reach_the_review() {
    let data = backpack();
    for tier in SafetyTier::ALL {
        let options = SalvageOptions {
            rarity_lock: false,
            strict_uniques: false,
            ..SalvageOptions::default()
        }
        .with_safety_tier(tier);
        for (first, second) in same_kind_pairs(&data) {
            let Ok(session) = StagingSession::open(first, second, &options, &data.balances)
            else {
                continue;
            };
            assert!(
                session
                    .candidates()
                    .iter()
                    .all(|candidate| candidate.from_first != candidate.from_second)
            );
        }
    }
}

#[test]
fn equal_rank_is_acceptable_and_one_below_is_not() {
    for variant in [GameVariant::Bl2, GameVariant::Tps] {
        let table = RarityTable::for_variant(variant);
        let codes = [0, 1, 2, 3, 4, 5, 6, 7, 500, 501, 502, 503, 504, 505, 506, 9999];
        for code in codes {
            let rank = table.rank_of(code);
            assert!(is_acceptable(rank, rank), "{variant:?} code {code}");
        }
        for (lower, higher) in [(2, 3), (3, 4)] {
            assert!(!is_acceptable(
                rank_of(higher, variant),
                rank_of(lower, variant)
            ));
        }
        assert_eq!(table.rank_of(500), table.rank_of(501));
        assert_eq!(table.rank_of(9999), table.max_rank());
    }
}
