use anyhow::Result;
use serde::Serialize;
use spare_parts_engine::{SalvageOptions, SlotKey};

use crate::logic::ScenarioRun;

pub mod catalog;

pub type Expectation = fn(&ScenarioRun) -> Result<()>;

/// One player action replayed against the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "slot", rename_all = "snake_case")]
pub enum Step {
    PressSalvage,
    PressInspect,
    PressEscape,
    CloseMessage,
    /// Pick the review option for this slot.
    Choose(SlotKey),
    CloseInspection,
}

/// A scripted salvage interaction over two backpack items.
#[derive(Debug, Clone)]
pub struct SalvageScenario {
    name: &'static str,
    first: u64,
    second: u64,
    setup: Option<fn(&mut SalvageOptions)>,
    steps: Vec<Step>,
    expectations: Vec<Expectation>,
}

impl SalvageScenario {
    pub const fn new(name: &'static str, first: u64, second: u64) -> Self {
        Self {
            name,
            first,
            second,
            setup: None,
            steps: Vec::new(),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut SalvageOptions)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn pair(&self) -> (u64, u64) {
        (self.first, self.second)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Scenario options layered over the command-line defaults.
    pub fn options(&self, base: &SalvageOptions) -> SalvageOptions {
        let mut options = base.clone();
        if let Some(setup) = self.setup {
            setup(&mut options);
        }
        options
    }
}

pub fn get_scenario(name: &str) -> Option<SalvageScenario> {
    let key = name.to_lowercase();
    let canonical = match key.as_str() {
        "rarity" => "rarity-lock",
        "class-mod" => "class-mismatch",
        "duplicates" => "duplicate-filter",
        "commit" => "toggle-commit",
        "equipped" => "equipped-donor",
        "ammo-pool" => "ammo-pool-donor",
        "uniques" => "strict-uniques",
        "inspect" => "inspect-and-cancel",
        "idempotence" => "toggle-idempotence",
        other => other,
    };
    catalog::find_catalog_scenario(canonical)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog::catalog_scenarios()
        .into_iter()
        .map(|(key, scenario)| (key, scenario.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spare_parts_engine::SafetyTier;

    #[test]
    fn aliases_resolve_to_catalog_entries() {
        let scenario = get_scenario("Commit").unwrap();
        assert_eq!(scenario.name(), get_scenario("toggle-commit").unwrap().name());
        assert!(get_scenario("unknown").is_none());
    }

    #[test]
    fn listed_keys_are_unique_and_resolvable() {
        let listed = list_scenarios();
        for (index, (key, _)) in listed.iter().enumerate() {
            assert!(get_scenario(key).is_some(), "{key} does not resolve");
            assert!(listed[index + 1..].iter().all(|(other, _)| other != key));
        }
    }

    #[test]
    fn setup_overrides_base_options() {
        let scenario = SalvageScenario::new("pinned", 1, 2)
            .with_setup(|options| options.safety_tier = SafetyTier::Insane);
        let base = SalvageOptions::default().with_safety_tier(SafetyTier::Expert);
        assert_eq!(scenario.options(&base).safety_tier, SafetyTier::Insane);

        let open = SalvageScenario::new("open", 1, 2);
        assert_eq!(open.options(&base).safety_tier, SafetyTier::Expert);
    }
}
