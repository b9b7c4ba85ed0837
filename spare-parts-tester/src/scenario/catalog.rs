use anyhow::{Result, anyhow};
use spare_parts_engine::{SafetyTier, SalvageEvent, SessionPhase, SlotKey};

use super::{SalvageScenario, Step};
use crate::logic::ScenarioRun;

const SMG_HYPERION: u64 = 1001;
const SMG_MALIWAN: u64 = 1002;
const SMG_EQUIPPED: u64 = 1003;
const SHOTGUN_LEGENDARY: u64 = 2001;
const SHOTGUN_RARE: u64 = 2002;
const SHIELD_A: u64 = 3001;
const SHIELD_B: u64 = 3002;
const CLASS_MOD_SIREN: u64 = 4001;
const CLASS_MOD_MECHROMANCER: u64 = 4002;
const ARTIFACT_FIRE: u64 = 5001;
const ARTIFACT_SHOCK: u64 = 5002;
const GRENADE: u64 = 6001;
const GRENADE_AMMO_POOLED: u64 = 6002;
const SMG_LEGENDARY: u64 = 7001;

const OPEN_REVIEW: [Step; 2] = [Step::PressSalvage, Step::CloseMessage];

pub fn catalog_scenarios() -> Vec<(&'static str, SalvageScenario)> {
    vec![
        (
            "rarity-lock",
            SalvageScenario::new("Rarity Lock Rejects Lower Donor", SHOTGUN_LEGENDARY, SHOTGUN_RARE)
                .with_steps([Step::PressSalvage])
                .with_expectation(rarity_lock_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "class-mismatch",
            SalvageScenario::new(
                "Cross-Class Mod Stages But Never Commits",
                CLASS_MOD_SIREN,
                CLASS_MOD_MECHROMANCER,
            )
            .with_steps(OPEN_REVIEW)
            .with_steps([
                Step::Choose(SlotKey::Beta),
                Step::PressSalvage,
                Step::PressEscape,
            ])
            .with_expectation(class_mismatch_expectation)
            .with_expectation(untouched_backpack),
        ),
        (
            "duplicate-filter",
            SalvageScenario::new("Duplicate Parts Are Annotated", SHIELD_A, SHIELD_B)
                .with_steps(OPEN_REVIEW)
                .with_steps([Step::PressEscape])
                .with_expectation(duplicate_filter_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "toggle-commit",
            SalvageScenario::new("Single Toggle Commit", SMG_HYPERION, SMG_MALIWAN)
                .with_steps(OPEN_REVIEW)
                .with_steps([Step::Choose(SlotKey::Grip), Step::PressSalvage])
                .with_expectation(toggle_commit_expectation),
        ),
        (
            "equipped-donor",
            SalvageScenario::new("Equipped Donor Is Refused", SMG_HYPERION, SMG_EQUIPPED)
                .with_steps([Step::PressSalvage])
                .with_expectation(equipped_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "ammo-pool-donor",
            SalvageScenario::new("Ammo Pool Donor Is Refused", GRENADE, GRENADE_AMMO_POOLED)
                .with_steps([Step::PressSalvage])
                .with_expectation(equipped_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "strict-uniques",
            SalvageScenario::new("Strict Uniques Guard Named Items", SMG_HYPERION, SMG_LEGENDARY)
                .with_steps([Step::PressSalvage])
                .with_expectation(strict_uniques_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "no-op",
            SalvageScenario::new("Same Item Twice Is Ignored", SMG_HYPERION, SMG_HYPERION)
                .with_steps([Step::PressSalvage])
                .with_expectation(no_op_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "inspect-and-cancel",
            SalvageScenario::new("Inspect Then Cancel", ARTIFACT_FIRE, ARTIFACT_SHOCK)
                .with_steps(OPEN_REVIEW)
                .with_steps([
                    Step::Choose(SlotKey::Alpha),
                    Step::PressInspect,
                    Step::PressSalvage,
                    Step::CloseInspection,
                    Step::PressEscape,
                ])
                .with_expectation(inspect_and_cancel_expectation)
                .with_expectation(untouched_backpack),
        ),
        (
            "toggle-idempotence",
            SalvageScenario::new("Double Toggle Restores The Acceptor", SMG_HYPERION, SMG_MALIWAN)
                .with_steps(OPEN_REVIEW)
                .with_steps([
                    Step::Choose(SlotKey::Barrel),
                    Step::Choose(SlotKey::Barrel),
                    Step::PressSalvage,
                ])
                .with_expectation(toggle_idempotence_expectation),
        ),
        (
            "insane-class-mod",
            SalvageScenario::new(
                "Insane Tier Merges Cross-Class Mods",
                CLASS_MOD_SIREN,
                CLASS_MOD_MECHROMANCER,
            )
            .with_setup(|options| options.safety_tier = SafetyTier::Insane)
            .with_steps(OPEN_REVIEW)
            .with_steps([Step::Choose(SlotKey::Gamma), Step::PressSalvage])
            .with_expectation(insane_class_mod_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(key: &str) -> Option<SalvageScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, scenario)| scenario)
}

fn untouched_backpack(run: &ScenarioRun) -> Result<()> {
    anyhow::ensure!(
        run.inventory.len() == run.items_before,
        "backpack size changed from {} to {}",
        run.items_before,
        run.inventory.len()
    );
    anyhow::ensure!(
        run.holds(run.first.id) && run.holds(run.second.id),
        "source items must stay in the backpack"
    );
    anyhow::ensure!(run.refreshes == 0, "backpack was refreshed without a commit");
    Ok(())
}

fn expect_rejection(run: &ScenarioRun, code: &str) -> Result<()> {
    let actual = run
        .rejection_code()
        .ok_or_else(|| anyhow!("expected a {code} rejection, saw {:?}", run.events))?;
    anyhow::ensure!(actual == code, "expected {code}, rejected with {actual}");
    anyhow::ensure!(
        run.final_phase == SessionPhase::Idle,
        "no session should stay open after a rejection"
    );
    anyhow::ensure!(run.choices.is_empty(), "review must not open after a rejection");
    Ok(())
}

fn rarity_lock_expectation(run: &ScenarioRun) -> Result<()> {
    expect_rejection(run, "rarity_violation")?;
    let (title, body) = run
        .messages
        .last()
        .ok_or_else(|| anyhow!("rarity rejection shows no message"))?;
    anyhow::ensure!(title.contains("Rarity Lock"), "unexpected title '{title}'");
    anyhow::ensure!(
        body.contains("Accepted rarity:"),
        "rarity message should name the accepted band"
    );
    Ok(())
}

fn class_mismatch_expectation(run: &ScenarioRun) -> Result<()> {
    anyhow::ensure!(
        run.events.iter().any(|event| matches!(
            event,
            SalvageEvent::SessionOpened {
                commit_blocked: true,
                ..
            }
        )),
        "cross-class session should open with commit blocked"
    );
    anyhow::ensure!(
        run.events.contains(&SalvageEvent::CommitBlocked {
            code: "class_mismatch"
        }),
        "confirm should be blocked"
    );
    anyhow::ensure!(
        run.events.last() == Some(&SalvageEvent::Cancelled),
        "Escape should close the blocked session"
    );
    anyhow::ensure!(run.committed_id().is_none(), "cross-class mods were merged");
    Ok(())
}

fn duplicate_filter_expectation(run: &ScenarioRun) -> Result<()> {
    let (_, summary) = run
        .messages
        .first()
        .ok_or_else(|| anyhow!("found-parts summary was not shown"))?;
    let annotated = summary
        .lines()
        .filter(|line| line.contains("DUPLICATE PART"))
        .count();
    anyhow::ensure!(annotated == 2, "expected 2 duplicate annotations, saw {annotated}");

    let review = run
        .choices
        .first()
        .ok_or_else(|| anyhow!("guided review was not shown"))?;
    anyhow::ensure!(
        review.options.len() == 2,
        "duplicates must not be offered: {:?}",
        review.options
    );
    anyhow::ensure!(
        review.options.iter().all(|label| !label.contains("Body")),
        "identical body part was offered"
    );
    Ok(())
}

fn toggle_commit_expectation(run: &ScenarioRun) -> Result<()> {
    let merged = run
        .committed_item()
        .ok_or_else(|| anyhow!("no merged item in the backpack"))?;
    anyhow::ensure!(
        !run.holds(run.first.id) && !run.holds(run.second.id),
        "source items should be removed"
    );
    anyhow::ensure!(
        run.inventory.len() + 1 == run.items_before,
        "two items should become one"
    );
    anyhow::ensure!(run.dismissed == 1, "comparison view should be dismissed");
    anyhow::ensure!(run.refreshes == 1, "backpack should refresh once");

    for slot in SlotKey::ALL {
        let expected = if slot == SlotKey::Grip {
            run.second.part(slot)
        } else {
            run.first.part(slot)
        };
        anyhow::ensure!(
            merged.part(slot) == expected,
            "{slot} holds {:?}, expected {:?}",
            merged.part(slot),
            expected
        );
    }
    anyhow::ensure!(
        merged.balance == run.first.balance && merged.rarity_code == run.first.rarity_code,
        "merged item should keep the acceptor's identity"
    );
    Ok(())
}

fn equipped_expectation(run: &ScenarioRun) -> Result<()> {
    expect_rejection(run, "equipped_item")
}

fn strict_uniques_expectation(run: &ScenarioRun) -> Result<()> {
    expect_rejection(run, "unique_item_violation")
}

fn no_op_expectation(run: &ScenarioRun) -> Result<()> {
    anyhow::ensure!(run.events.is_empty(), "no-op emitted {:?}", run.events);
    anyhow::ensure!(run.messages.is_empty(), "no-op should stay silent");
    anyhow::ensure!(run.ignored_keys == 1, "salvage key should not be consumed");
    Ok(())
}

fn inspect_and_cancel_expectation(run: &ScenarioRun) -> Result<()> {
    let preview = run
        .inspected
        .first()
        .ok_or_else(|| anyhow!("inspection view was not opened"))?;
    anyhow::ensure!(
        preview.part(SlotKey::Alpha) == run.second.part(SlotKey::Alpha),
        "inspection should show the toggled draft"
    );
    anyhow::ensure!(
        run.ignored_keys == 1,
        "confirm must not be available while inspecting"
    );
    anyhow::ensure!(
        run.events.contains(&SalvageEvent::InspectionClosed),
        "review should resume after inspection"
    );
    anyhow::ensure!(
        run.events.last() == Some(&SalvageEvent::Cancelled),
        "cancel should end the session"
    );
    Ok(())
}

fn toggle_idempotence_expectation(run: &ScenarioRun) -> Result<()> {
    let merged = run
        .committed_item()
        .ok_or_else(|| anyhow!("no merged item in the backpack"))?;
    anyhow::ensure!(
        merged.parts == run.first.parts,
        "double toggle should leave the acceptor's parts"
    );
    anyhow::ensure!(
        merged.derived == run.first.derived,
        "derived data should match the acceptor"
    );
    Ok(())
}

fn insane_class_mod_expectation(run: &ScenarioRun) -> Result<()> {
    anyhow::ensure!(
        run.options.safety_tier == SafetyTier::Insane,
        "scenario must run at Insane"
    );
    let merged = run
        .committed_item()
        .ok_or_else(|| anyhow!("Insane tier should allow the merge"))?;
    anyhow::ensure!(
        merged.part(SlotKey::Gamma) == run.second.part(SlotKey::Gamma),
        "donor stat should be merged"
    );
    anyhow::ensure!(
        merged.required_class == run.first.required_class,
        "merged class mod keeps the acceptor's class"
    );
    Ok(())
}
