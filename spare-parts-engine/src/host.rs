//! Collaborators the engine expects the host game to provide.
//!
//! The engine never renders, captures keys or owns the inventory. Hosts
//! implement these traits and forward input and dialog callbacks to
//! [`SalvageController`](crate::SalvageController).
use serde::{Deserialize, Serialize};

use crate::item::{ItemRecord, PartRef};

/// Phase of a key event as delivered by the host input system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPhase {
    Pressed,
    Repeat,
    Released,
    DoubleClick,
    Axis,
}

/// Inventory mutation primitives. Each call succeeds or fails as a whole.
pub trait Inventory {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Add an item to the backpack.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the item.
    fn add(&mut self, item: ItemRecord) -> Result<(), Self::Error>;

    /// Remove an item from the backpack.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot remove the item.
    fn remove(&mut self, item: &ItemRecord) -> Result<(), Self::Error>;

    /// Refresh the backpack count and display.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refresh fails.
    fn refresh_count(&mut self) -> Result<(), Self::Error>;
}

/// Host text formatting for part names.
pub trait PartFormatter {
    fn format_part_label(
        &self,
        part: Option<&PartRef>,
        include_styling: bool,
        include_null_placeholder: bool,
    ) -> String;
}

/// A list dialog with one selectable option per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDialog {
    pub title: String,
    pub body: String,
    pub options: Vec<String>,
    pub tooltip: String,
    pub focused: usize,
}

/// Host dialog primitives.
///
/// Choice dialogs report back through
/// [`SalvageController::on_choice_selected`](crate::SalvageController::on_choice_selected)
/// and [`SalvageController::on_choice_cancelled`](crate::SalvageController::on_choice_cancelled);
/// message dialogs through
/// [`SalvageController::on_message_closed`](crate::SalvageController::on_message_closed).
pub trait DialogPresenter {
    fn present_choice(&mut self, dialog: &ChoiceDialog);

    fn present_message(&mut self, title: &str, body: &str);

    /// Open the read-only item inspection view on a clone of the draft.
    fn present_inspection(&mut self, item: &ItemRecord);

    /// Leave the item comparison view after a successful commit.
    fn dismiss_comparison(&mut self);
}

/// Source of the item pair the player is comparing.
pub trait SelectionSource {
    /// `(acceptor, donor)` when a two-item comparison is active.
    fn selected_pair(&self) -> Option<(ItemRecord, ItemRecord)>;
}

/// Everything the controller needs from the host.
pub trait SalvageHost: SelectionSource + DialogPresenter + PartFormatter {
    type Inventory: Inventory;

    fn inventory(&mut self) -> &mut Self::Inventory;
}

/// Formatter that renders the last path segment of a part reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPartFormatter;

pub const NULL_PART_PLACEHOLDER: &str = "<None>";

impl PartFormatter for PlainPartFormatter {
    fn format_part_label(
        &self,
        part: Option<&PartRef>,
        include_styling: bool,
        include_null_placeholder: bool,
    ) -> String {
        let Some(part) = part else {
            return if include_null_placeholder {
                NULL_PART_PLACEHOLDER.to_string()
            } else {
                String::new()
            };
        };
        let name = part.as_str().rsplit('.').next().unwrap_or_default();
        if include_styling {
            format!("<font color=\"#ffffff\">{name}</font>")
        } else {
            name.to_string()
        }
    }
}
