use anyhow::{Result, anyhow};
use colored::Colorize;
use serde::Serialize;
use spare_parts_engine::options::ESCAPE_KEY;
use spare_parts_engine::{
    ChoiceDialog, InputPhase, ItemId, ItemRecord, SalvageController, SalvageEvent,
    SalvageOptions, SessionPhase,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logic::assets::TesterAssets;
use crate::logic::host::{TesterHost, TesterInventory};
use crate::scenario::{SalvageScenario, Step};

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub key: String,
    pub passed: bool,
    pub steps_run: usize,
    pub failures: Vec<String>,
    pub events: Vec<SalvageEvent>,
    #[serde(serialize_with = "duration_millis")]
    pub duration: Duration,
}

/// Everything a scenario left behind, handed to its expectations.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub first: ItemRecord,
    pub second: ItemRecord,
    pub options: SalvageOptions,
    pub events: Vec<SalvageEvent>,
    pub messages: Vec<(String, String)>,
    pub choices: Vec<ChoiceDialog>,
    pub inspected: Vec<ItemRecord>,
    pub dismissed: usize,
    pub refreshes: usize,
    pub ignored_keys: usize,
    pub items_before: usize,
    pub inventory: Vec<ItemRecord>,
    pub final_phase: SessionPhase,
}

impl ScenarioRun {
    pub fn holds(&self, id: ItemId) -> bool {
        self.inventory.iter().any(|item| item.id == id)
    }

    pub fn committed_id(&self) -> Option<ItemId> {
        self.events.iter().find_map(|event| match event {
            SalvageEvent::Committed { id } => Some(*id),
            _ => None,
        })
    }

    pub fn committed_item(&self) -> Option<&ItemRecord> {
        let id = self.committed_id()?;
        self.inventory.iter().find(|item| item.id == id)
    }

    pub fn rejection_code(&self) -> Option<&'static str> {
        self.events.iter().find_map(|event| match event {
            SalvageEvent::Rejected { code, .. } => Some(*code),
            _ => None,
        })
    }
}

pub struct SalvageTester {
    assets: Arc<TesterAssets>,
    base_options: SalvageOptions,
    seed: u64,
    verbose: bool,
}

impl SalvageTester {
    pub const fn new(
        assets: Arc<TesterAssets>,
        base_options: SalvageOptions,
        seed: u64,
        verbose: bool,
    ) -> Self {
        Self {
            assets,
            base_options,
            seed,
            verbose,
        }
    }

    pub fn run_scenario(&self, key: &str, scenario: &SalvageScenario) -> ScenarioResult {
        if self.verbose {
            let (first, second) = scenario.pair();
            println!(
                "🧪 Testing scenario: {} ({first} <- {second}, seed {})",
                scenario.name().bright_white(),
                self.seed
            );
        }

        let start_time = Instant::now();
        let mut failures = Vec::new();
        let mut events = Vec::new();

        match self.execute(scenario, &mut failures) {
            Ok(run) => {
                for expectation in scenario.expectations() {
                    if let Err(err) = expectation(&run) {
                        failures.push(err.to_string());
                    }
                }
                events = run.events;
            }
            Err(err) => failures.push(format!("{err:#}")),
        }

        let duration = start_time.elapsed();
        if self.verbose {
            if failures.is_empty() {
                println!("  ✅ passed ({duration:?})");
            } else {
                for failure in &failures {
                    println!("  ❌ {}", failure.red());
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.name().to_string(),
            key: key.to_string(),
            passed: failures.is_empty(),
            steps_run: scenario.steps().len(),
            failures,
            events,
            duration,
        }
    }

    fn pick(&self, id: u64) -> Result<ItemRecord> {
        self.assets
            .item(id)
            .cloned()
            .ok_or_else(|| anyhow!("item {id} is not in the fixture backpack"))
    }

    fn execute(
        &self,
        scenario: &SalvageScenario,
        failures: &mut Vec<String>,
    ) -> Result<ScenarioRun> {
        let (first_id, second_id) = scenario.pair();
        let first = self.pick(first_id)?;
        let second = self.pick(second_id)?;
        let options = scenario.options(&self.base_options);
        options.validate()?;

        let backpack = self.assets.backpack();
        let mut host = TesterHost::new(TesterInventory::new(backpack.items.clone()));
        host.compare(first.clone(), second.clone());
        let mut controller =
            SalvageController::new(options.clone(), backpack.balances.clone(), self.seed);

        let mut ignored_keys = 0;
        for (index, step) in scenario.steps().iter().enumerate() {
            match apply_step(&mut controller, &mut host, *step) {
                Ok(true) => {}
                Ok(false) => ignored_keys += 1,
                Err(err) => failures.push(format!("step {} ({step:?}): {err}", index + 1)),
            }
            if self.verbose {
                println!("   ↳ {step:?} -> {:?}", controller.phase());
            }
        }

        Ok(ScenarioRun {
            first,
            second,
            options,
            events: controller.drain_events(),
            messages: host.messages,
            choices: host.choices,
            inspected: host.inspected,
            dismissed: host.dismissed,
            refreshes: host.inventory.refreshes,
            ignored_keys,
            items_before: backpack.items.len(),
            inventory: host.inventory.items,
            final_phase: controller.phase(),
        })
    }
}

/// Replay one step. Key presses report whether the controller consumed them.
fn apply_step(
    controller: &mut SalvageController,
    host: &mut TesterHost,
    step: Step,
) -> Result<bool> {
    let press = |controller: &mut SalvageController, host: &mut TesterHost, key: &str| {
        controller.dispatch_on_input_event(host, key, InputPhase::Pressed)
    };
    let consumed = match step {
        Step::PressSalvage => {
            let key = controller.options().salvage_key.clone();
            press(controller, host, &key)
        }
        Step::PressInspect => {
            let key = controller.options().inspect_key.clone();
            press(controller, host, &key)
        }
        Step::PressEscape => press(controller, host, ESCAPE_KEY),
        Step::CloseMessage => {
            controller.on_message_closed(host);
            true
        }
        Step::Choose(slot) => {
            let index = controller
                .session()
                .and_then(|session| {
                    session
                        .candidates()
                        .iter()
                        .position(|candidate| candidate.slot == slot)
                })
                .ok_or_else(|| anyhow!("{slot} is not offered in the review"))?;
            controller.on_choice_selected(host, index);
            true
        }
        Step::CloseInspection => {
            controller.on_inspection_closed(host);
            true
        }
    };
    Ok(consumed)
}

fn duration_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    duration.as_millis().serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::get_scenario;

    fn tester() -> SalvageTester {
        SalvageTester::new(
            Arc::new(TesterAssets::load_default()),
            SalvageOptions::default(),
            1337,
            false,
        )
    }

    #[test]
    fn catalog_scenarios_pass_against_bundled_backpack() {
        let tester = tester();
        for (key, _) in crate::scenario::list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            let result = tester.run_scenario(key, &scenario);
            assert!(result.passed, "{key}: {:?}", result.failures);
        }
    }

    #[test]
    fn unknown_items_fail_the_scenario() {
        let scenario = SalvageScenario::new("Missing", 1, 2).with_steps([Step::PressSalvage]);
        let result = tester().run_scenario("missing", &scenario);
        assert!(!result.passed);
        assert!(result.failures[0].contains("not in the fixture backpack"));
        assert!(result.events.is_empty());
    }

    #[test]
    fn unoffered_slot_is_reported_as_step_failure() {
        let scenario = SalvageScenario::new("Bad Choice", 1001, 1002)
            .with_steps([Step::PressSalvage, Step::CloseMessage])
            .with_steps([Step::Choose(spare_parts_engine::SlotKey::Material)]);
        let result = tester().run_scenario("bad-choice", &scenario);
        assert!(!result.passed);
        assert!(result.failures[0].starts_with("step 3"));
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            key: "smoke".to_string(),
            passed: true,
            steps_run: 1,
            failures: Vec::new(),
            events: vec![SalvageEvent::Cancelled],
            duration: Duration::from_millis(12),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["duration"], 12);
        assert_eq!(json["events"][0]["event"], "cancelled");
    }
}
