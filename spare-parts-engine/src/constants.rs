//! Dialog copy and markup used by the salvage flow.
//!
//! The host renders the `<font>` markup; the engine only strips it when it
//! needs a bare label.

pub(crate) const FOUND_PARTS_TITLE: &str = "Found Parts";
pub(crate) const COMPATIBLE_HEADER: &str = "<font color=\"#35fc3d\">Compatible:</font>\n";
pub(crate) const INCOMPATIBLE_HEADER: &str = "\n<font color=\"#dc4646\">Incompatible:</font>\n";
pub(crate) const DUPLICATE_NOTE: &str = "  <font color=\"#708090\">DUPLICATE PART</font>";
pub(crate) const LIST_INDENT: &str = "    ";

pub(crate) const REVIEW_TITLE: &str = "Current Parts";
pub(crate) const REVIEW_LINE_OPEN: &str = "<font color=\"#ffe6cc\">  ";
pub(crate) const REVIEW_LINE_CLOSE: &str = "\n</font>";
pub(crate) const REVIEW_OPTION_PREFIX: &str = "Salvage ";

pub(crate) const OPTIONS_HINT: &str =
    "<font color=\"#708090\">This can be disabled in the mod options section</font>";

pub(crate) const EQUIPPED_TITLE: &str = "<font color=\"#dc4646\">Item In Use</font>";
pub(crate) const EQUIPPED_BODY: &str =
    "You can't salvage parts from an equipped item or one in the ammo pool";

pub(crate) const RARITY_LOCK_TITLE: &str = "<font color=\"#dc4646\">Rarity Lock</font>";
pub(crate) const RARITY_LOCK_BODY: &str =
    "You can't attach parts from an item of lower rarity than the one selected";

pub(crate) const STRICT_UNIQUES_TITLE: &str = "<font color=\"#dc4646\">Strict Uniques</font>";
pub(crate) const STRICT_UNIQUES_BODY: &str = "You can't attach parts to a unique item that don't come from another copy of the same unique item";

pub(crate) const CLASS_MISMATCH_TITLE: &str =
    "<font color=\"#dc4646\">Incompatible Class Mod</font>";
pub(crate) const CLASS_MISMATCH_BODY: &str =
    "Can't salvage parts from another classes' Class Mod";

pub(crate) const TOOLTIP_SALVAGE_SUFFIX: &str = "Salvage Parts";
