mod common;

use common::{
    ARTIFACT_FIRE, ARTIFACT_SHOCK, RecordingHost, SHIELD_A, SHIELD_B, SHOTGUN_LEGENDARY,
    SHOTGUN_RARE, SMG_HYPERION, SMG_MALIWAN, backpack, item,
};
use spare_parts_engine::{
    BackpackData, CommitStep, InputPhase, ItemId, SalvageController, SalvageEvent,
    SalvageOptions, SessionPhase, Side, SlotKey,
};

fn reviewing(
    data: &BackpackData,
    options: SalvageOptions,
    first: u64,
    second: u64,
) -> (SalvageController, RecordingHost) {
    let mut host = RecordingHost::with_backpack(data);
    host.select(data, first, second);
    let mut controller = SalvageController::new(options, data.balances.clone(), 0xC0FFEE);
    let key = controller.options().salvage_key.clone();
    assert!(controller.dispatch_on_input_event(&mut host, &key, InputPhase::Pressed));
    controller.on_message_closed(&mut host);
    assert_eq!(controller.phase(), SessionPhase::Previewing);
    (controller, host)
}

#[test]
fn summary_precedes_the_guided_review() {
    let data = backpack();
    let mut host = RecordingHost::with_backpack(&data);
    host.select(&data, SMG_HYPERION, SMG_MALIWAN);
    let mut controller =
        SalvageController::new(SalvageOptions::default(), data.balances.clone(), 5);

    assert!(controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Selecting);
    let (title, body) = host.last_message().unwrap();
    assert_eq!(title, "Found Parts");
    assert!(body.contains("SMG_Barrel_Maliwan"));
    assert!(body.contains("DUPLICATE PART"));
    assert!(body.contains("SMG_Stock_Torgue"));
    // Keys are left to the open dialog.
    assert!(!controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));

    controller.on_message_closed(&mut host);
    let review = host.last_choice().unwrap();
    assert_eq!(review.title, "Current Parts");
    assert_eq!(
        review.options,
        vec![
            "Salvage SMG_Barrel_Maliwan",
            "Salvage SMG_Grip_Bandit",
            "Salvage SMG_Sight_Maliwan",
        ]
    );
    assert_eq!(
        review.tooltip,
        "[Enter] Select    [Escape] Cancel    [C] Confirm    [F] Inspect"
    );
    assert_eq!(
        controller.drain_events(),
        vec![
            SalvageEvent::SessionOpened {
                candidates: 3,
                incompatible: 1,
                duplicates: 3,
                commit_blocked: false,
            },
            SalvageEvent::ReviewStarted,
        ]
    );
}

#[test]
fn toggle_refocuses_and_flips_the_option_label() {
    let data = backpack();
    let (mut controller, mut host) =
        reviewing(&data, SalvageOptions::default(), SMG_HYPERION, SMG_MALIWAN);

    controller.on_choice_selected(&mut host, 2);
    let review = host.last_choice().unwrap();
    assert_eq!(review.focused, 2);
    assert_eq!(review.options[2], "Salvage SMG_Sight_Hyperion");
    assert!(review.body.contains("SMG_Sight_Maliwan"));

    // Out-of-range picks are ignored.
    let presented = host.choices.len();
    controller.on_choice_selected(&mut host, 9);
    assert_eq!(host.choices.len(), presented);

    let events = controller.drain_events();
    assert_eq!(
        events.last(),
        Some(&SalvageEvent::Toggled {
            slot: SlotKey::Sight,
            side: Side::Second,
        })
    );
}

#[test]
fn inspection_is_read_only_and_returns_to_review() {
    let data = backpack();
    let (mut controller, mut host) =
        reviewing(&data, SalvageOptions::default(), ARTIFACT_FIRE, ARTIFACT_SHOCK);
    controller.on_choice_selected(&mut host, 0);

    assert!(controller.dispatch_on_input_event(&mut host, "f", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Inspecting);
    let preview = host.inspected.last().unwrap();
    assert_eq!(preview.id, ItemId(ARTIFACT_FIRE));
    assert_eq!(
        preview.part(SlotKey::Alpha),
        item(&data, ARTIFACT_SHOCK).part(SlotKey::Alpha)
    );

    // Confirm is not available while inspecting.
    assert!(!controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));
    assert_eq!(host.inventory.items.len(), data.items.len());

    let presented = host.choices.len();
    controller.on_inspection_closed(&mut host);
    assert_eq!(controller.phase(), SessionPhase::Previewing);
    assert_eq!(host.choices.len(), presented + 1);

    controller.on_choice_cancelled(&mut host);
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(host.inventory.items.len(), data.items.len());
    assert_eq!(host.inventory.refreshes, 0);
}

#[test]
fn only_pressed_keys_are_consumed() {
    let data = backpack();
    let (mut controller, mut host) =
        reviewing(&data, SalvageOptions::default(), SMG_HYPERION, SMG_MALIWAN);
    for phase in [
        InputPhase::Repeat,
        InputPhase::Released,
        InputPhase::DoubleClick,
        InputPhase::Axis,
    ] {
        assert!(!controller.dispatch_on_input_event(&mut host, "C", phase));
    }
    assert!(!controller.dispatch_on_input_event(&mut host, "Q", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Previewing);
    assert_eq!(host.inventory.items.len(), data.items.len());
}

#[test]
fn rebound_keys_drive_the_review() {
    let data = backpack();
    let options = SalvageOptions {
        salvage_key: "X".to_string(),
        inspect_key: "V".to_string(),
        ..SalvageOptions::default()
    };
    let (mut controller, mut host) = reviewing(&data, options, SHIELD_A, SHIELD_B);
    assert!(
        host.last_choice()
            .unwrap()
            .tooltip
            .contains("[X] Confirm    [V] Inspect")
    );
    assert!(!controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));
    assert!(controller.dispatch_on_input_event(&mut host, "x", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(host.dismissed, 1);
    assert_eq!(host.inventory.items.len(), data.items.len() - 1);
}

#[test]
fn new_selection_replaces_the_open_session() {
    let data = backpack();
    let (mut controller, mut host) =
        reviewing(&data, SalvageOptions::default(), SMG_HYPERION, SMG_MALIWAN);
    controller.drain_events();

    assert!(controller.select_pair(
        &mut host,
        item(&data, SHIELD_A),
        item(&data, SHIELD_B)
    ));
    let events = controller.drain_events();
    assert_eq!(events.first(), Some(&SalvageEvent::Replaced));
    assert_eq!(controller.phase(), SessionPhase::Selecting);
    assert_eq!(
        controller.session().unwrap().first().id,
        ItemId(SHIELD_A)
    );
}

#[test]
fn inventory_failure_drops_the_session_without_rollback() {
    let data = backpack();
    let (mut controller, mut host) =
        reviewing(&data, SalvageOptions::default(), SMG_HYPERION, SMG_MALIWAN);
    host.inventory.reject_add = true;
    controller.drain_events();

    assert!(controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(host.dismissed, 0);
    assert_eq!(host.inventory.items.len(), data.items.len());
    assert!(matches!(
        controller.drain_events().as_slice(),
        [SalvageEvent::CommitFailed {
            step: CommitStep::AddDraft,
            ..
        }]
    ));
}

#[test]
fn nothing_actionable_shows_the_found_list_only() {
    let data = backpack();
    let options = SalvageOptions {
        rarity_lock: false,
        ..SalvageOptions::default()
    };
    let mut host = RecordingHost::with_backpack(&data);
    host.select(&data, SHOTGUN_LEGENDARY, SHOTGUN_RARE);
    let mut controller = SalvageController::new(options, data.balances.clone(), 6);

    assert!(controller.dispatch_on_input_event(&mut host, "C", InputPhase::Pressed));
    assert_eq!(controller.phase(), SessionPhase::Idle);
    let (title, body) = host.last_message().unwrap();
    assert_eq!(title, "Found Parts");
    assert!(body.contains("Incompatible:"));
    assert!(body.contains("SG_Barrel_Bandit"));
    assert!(host.choices.is_empty());
    assert!(matches!(
        controller.drain_events().as_slice(),
        [SalvageEvent::Rejected {
            code: "no_compatible_slots",
            ..
        }]
    ));
}

#[test]
fn tooltip_hint_needs_two_distinct_items() {
    let data = backpack();
    let mut host = RecordingHost::with_backpack(&data);
    let controller = SalvageController::new(SalvageOptions::default(), data.balances.clone(), 7);

    assert_eq!(controller.tooltip_hint(&host, "[E] Equip"), "[E] Equip");
    host.select(&data, SMG_HYPERION, SMG_HYPERION);
    assert_eq!(controller.tooltip_hint(&host, "[E] Equip"), "[E] Equip");
    host.select(&data, SMG_HYPERION, SMG_MALIWAN);
    assert_eq!(
        controller.tooltip_hint(&host, "[E] Equip"),
        "[E] Equip\n[C] Salvage Parts"
    );
}
