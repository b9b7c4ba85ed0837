//! Text the engine hands to the host dialogs: the found-parts summary, the
//! guided review and rejection messages.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::constants::{
    CLASS_MISMATCH_BODY, CLASS_MISMATCH_TITLE, COMPATIBLE_HEADER, DUPLICATE_NOTE, EQUIPPED_BODY,
    EQUIPPED_TITLE, FOUND_PARTS_TITLE, INCOMPATIBLE_HEADER, LIST_INDENT, OPTIONS_HINT,
    RARITY_LOCK_BODY, RARITY_LOCK_TITLE, REVIEW_LINE_CLOSE, REVIEW_LINE_OPEN,
    REVIEW_OPTION_PREFIX, REVIEW_TITLE, STRICT_UNIQUES_BODY, STRICT_UNIQUES_TITLE,
    TOOLTIP_SALVAGE_SUFFIX,
};
use crate::error::SalvageError;
use crate::host::{ChoiceDialog, PartFormatter};
use crate::item::{PartRef, SlotKey};
use crate::options::{ESCAPE_KEY, SalvageOptions};
use crate::resolver::{IncompatiblePart, Resolution, SwapCandidate};

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"</?font( color=("|')#[0-z]{6}("|'))?>"#)
            .unwrap_or_else(|err| unreachable!("static markup pattern is valid: {err}"))
    })
}

/// Remove `<font>` decoration from a host-formatted label.
#[must_use]
pub fn strip_markup(label: &str) -> Cow<'_, str> {
    markup_pattern().replace_all(label, "")
}

/// One row of the compatible section of the found-parts summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundPart {
    pub slot: SlotKey,
    pub part: Option<PartRef>,
    pub duplicate: bool,
}

/// Everything the resolver found for a pair, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundParts {
    pub compatible: Vec<FoundPart>,
    pub incompatible: Vec<IncompatiblePart>,
}

impl FoundParts {
    #[must_use]
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let compatible = resolution
            .candidates
            .iter()
            .map(|candidate| FoundPart {
                slot: candidate.slot,
                part: candidate.from_second.clone(),
                duplicate: candidate.is_duplicate(),
            })
            .collect();
        Self {
            compatible,
            incompatible: resolution.incompatible.clone(),
        }
    }

    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.compatible.iter().filter(|found| found.duplicate).count()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        FOUND_PARTS_TITLE
    }

    /// Body of the found-parts summary dialog.
    #[must_use]
    pub fn render<F: PartFormatter + ?Sized>(&self, formatter: &F) -> String {
        let mut body = String::from(COMPATIBLE_HEADER);
        for found in &self.compatible {
            body.push_str(LIST_INDENT);
            body.push_str(&formatter.format_part_label(found.part.as_ref(), true, false));
            if found.duplicate {
                body.push_str(DUPLICATE_NOTE);
            }
            body.push('\n');
        }
        if !self.incompatible.is_empty() {
            body.push_str(INCOMPATIBLE_HEADER);
            for incompatible in &self.incompatible {
                body.push_str(LIST_INDENT);
                body.push_str(&formatter.format_part_label(incompatible.part.as_ref(), true, true));
                body.push('\n');
            }
        }
        body
    }
}

/// Option label for a candidate: the part the player would switch to.
#[must_use]
pub fn candidate_label<F: PartFormatter + ?Sized>(
    candidate: &SwapCandidate,
    formatter: &F,
) -> String {
    let styled = formatter.format_part_label(candidate.inactive_part(), true, false);
    format!("{REVIEW_OPTION_PREFIX}{}", strip_markup(&styled))
}

/// Guided review dialog listing the draft's active parts.
#[must_use]
pub fn guided_review<F: PartFormatter + ?Sized>(
    candidates: &[SwapCandidate],
    formatter: &F,
    options: &SalvageOptions,
    focused: usize,
) -> ChoiceDialog {
    let mut body = String::new();
    for candidate in candidates {
        body.push_str(REVIEW_LINE_OPEN);
        body.push_str(&formatter.format_part_label(candidate.active_part(), true, false));
        body.push_str(REVIEW_LINE_CLOSE);
    }
    let tooltip = format!(
        "[Enter] Select    [{ESCAPE_KEY}] Cancel    [{}] Confirm    [{}] Inspect",
        options.salvage_key, options.inspect_key
    );
    ChoiceDialog {
        title: REVIEW_TITLE.to_string(),
        body,
        options: candidates
            .iter()
            .map(|candidate| candidate_label(candidate, formatter))
            .collect(),
        tooltip,
        focused: focused.min(candidates.len().saturating_sub(1)),
    }
}

/// Title and body for a user-visible rejection, `None` for silent ones.
#[must_use]
pub fn rejection_message<F: PartFormatter + ?Sized>(
    error: &SalvageError,
    formatter: &F,
) -> Option<(String, String)> {
    let message = match error {
        SalvageError::NoOpSelection | SalvageError::KindMismatch { .. } => return None,
        SalvageError::EquippedItem(_) => (EQUIPPED_TITLE.to_string(), EQUIPPED_BODY.to_string()),
        SalvageError::RarityViolation { donor, band } => {
            let body = format!(
                "{RARITY_LOCK_BODY}\n\nDonor rarity: {donor}\nAccepted rarity: {band}\n\n{OPTIONS_HINT}"
            );
            (RARITY_LOCK_TITLE.to_string(), body)
        }
        SalvageError::UniqueItemViolation => (
            STRICT_UNIQUES_TITLE.to_string(),
            format!("{STRICT_UNIQUES_BODY}\n\n{OPTIONS_HINT}"),
        ),
        SalvageError::ClassMismatch { .. } => (
            CLASS_MISMATCH_TITLE.to_string(),
            CLASS_MISMATCH_BODY.to_string(),
        ),
        SalvageError::NoCompatibleSlots { found } => {
            (FOUND_PARTS_TITLE.to_string(), found.render(formatter))
        }
        SalvageError::UnstagedSlot(_) | SalvageError::InvalidPhase { .. } => {
            (REVIEW_TITLE.to_string(), error.to_string())
        }
    };
    Some(message)
}

/// Tooltip for the comparison view with the salvage hint appended.
#[must_use]
pub fn tooltip_hint(existing: &str, options: &SalvageOptions) -> String {
    format!(
        "{existing}\n[{}] {TOOLTIP_SALVAGE_SUFFIX}",
        options.salvage_key
    )
}
