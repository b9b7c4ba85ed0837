//! Rarity ranks and the per-game lookup tables that produce them.
//!
//! The two supported games grade items with overlapping but diverging raw
//! rarity codes, so each keeps its own table. Codes missing from a table
//! resolve to that table's highest rank.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Code used by drop-named uniques; looked up as [`NAMED_UNIQUE_CODE`].
pub const DROP_NAMED_UNIQUE_CODE: i32 = 500;
pub const NAMED_UNIQUE_CODE: i32 = 501;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    #[default]
    Bl2,
    Tps,
}

impl GameVariant {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bl2 => "bl2",
            Self::Tps => "tps",
        }
    }
}

/// Ordered rarity tiers; declaration order is rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    ETech,
    Glitch,
    Legendary,
    Seraph,
    Pearlescent,
    Effervescent,
}

impl RarityTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::VeryRare => "Very Rare",
            Self::ETech => "E-Tech",
            Self::Glitch => "Glitch",
            Self::Legendary => "Legendary",
            Self::Seraph => "Seraph",
            Self::Pearlescent => "Pearlescent",
            Self::Effervescent => "Effervescent",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank derived from a raw rarity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RarityRank {
    /// Rank shown to the player and compared against other items.
    pub display: RarityTier,
    /// Lowest donor rank this item accepts parts from.
    pub minimum: RarityTier,
}

impl RarityRank {
    const fn new(display: RarityTier, minimum: RarityTier) -> Self {
        Self { display, minimum }
    }

    const fn plain(tier: RarityTier) -> Self {
        Self::new(tier, tier)
    }
}

/// Range of donor ranks an acceptor takes parts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptableBand {
    pub minimum: RarityTier,
    pub maximum: RarityTier,
}

impl AcceptableBand {
    #[must_use]
    pub fn contains(&self, tier: RarityTier) -> bool {
        (self.minimum..=self.maximum).contains(&tier)
    }
}

impl fmt::Display for AcceptableBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minimum == self.maximum {
            write!(f, "{}", self.minimum)
        } else {
            write!(f, "{} to {}", self.minimum, self.maximum)
        }
    }
}

type RarityRow = (i32, RarityRank);

const BL2_TABLE: &[RarityRow] = &[
    (0, RarityRank::plain(RarityTier::Common)),
    (1, RarityRank::plain(RarityTier::Common)),
    (2, RarityRank::plain(RarityTier::Uncommon)),
    (3, RarityRank::plain(RarityTier::Rare)),
    (4, RarityRank::plain(RarityTier::VeryRare)),
    (5, RarityRank::plain(RarityTier::ETech)),
    (6, RarityRank::plain(RarityTier::ETech)),
    (7, RarityRank::plain(RarityTier::Legendary)),
    (501, RarityRank::plain(RarityTier::Legendary)),
    (502, RarityRank::plain(RarityTier::Pearlescent)),
    (503, RarityRank::plain(RarityTier::Seraph)),
    (504, RarityRank::plain(RarityTier::Seraph)),
    (
        506,
        RarityRank::new(RarityTier::Effervescent, RarityTier::Seraph),
    ),
];

const TPS_TABLE: &[RarityRow] = &[
    (0, RarityRank::plain(RarityTier::Common)),
    (1, RarityRank::plain(RarityTier::Common)),
    (2, RarityRank::plain(RarityTier::Uncommon)),
    (3, RarityRank::plain(RarityTier::Rare)),
    (4, RarityRank::plain(RarityTier::VeryRare)),
    (5, RarityRank::new(RarityTier::Glitch, RarityTier::VeryRare)),
    (6, RarityRank::plain(RarityTier::Legendary)),
    (7, RarityRank::plain(RarityTier::Legendary)),
    (501, RarityRank::plain(RarityTier::Legendary)),
    (502, RarityRank::plain(RarityTier::Legendary)),
    (
        505,
        RarityRank::new(RarityTier::Effervescent, RarityTier::Legendary),
    ),
];

/// Lookup table for one game variant.
#[derive(Debug, Clone, Copy)]
pub struct RarityTable {
    rows: &'static [RarityRow],
    max: RarityRank,
    unique_threshold: RarityTier,
}

const BL2: RarityTable = RarityTable {
    rows: BL2_TABLE,
    max: RarityRank::new(RarityTier::Effervescent, RarityTier::Seraph),
    unique_threshold: RarityTier::ETech,
};

const TPS: RarityTable = RarityTable {
    rows: TPS_TABLE,
    max: RarityRank::new(RarityTier::Effervescent, RarityTier::Legendary),
    unique_threshold: RarityTier::Glitch,
};

impl RarityTable {
    #[must_use]
    pub const fn for_variant(variant: GameVariant) -> &'static Self {
        match variant {
            GameVariant::Bl2 => &BL2,
            GameVariant::Tps => &TPS,
        }
    }

    #[must_use]
    pub fn rank_of(&self, rarity_code: i32) -> RarityRank {
        let code = if rarity_code == DROP_NAMED_UNIQUE_CODE {
            NAMED_UNIQUE_CODE
        } else {
            rarity_code
        };
        self.rows
            .iter()
            .find(|(row_code, _)| *row_code == code)
            .map_or(self.max, |(_, rank)| *rank)
    }

    /// Highest rank in the table, used for unknown codes.
    #[must_use]
    pub const fn max_rank(&self) -> RarityRank {
        self.max
    }

    /// Display rank at or above which an item counts as a named unique.
    #[must_use]
    pub const fn unique_threshold(&self) -> RarityTier {
        self.unique_threshold
    }

    /// Donor band accepted by an item of `acceptor` rank.
    #[must_use]
    pub const fn acceptable_band(&self, acceptor: RarityRank) -> AcceptableBand {
        AcceptableBand {
            minimum: acceptor.minimum,
            maximum: self.max.display,
        }
    }
}

/// Rank of `rarity_code` in the table for `variant`.
#[must_use]
pub fn rank_of(rarity_code: i32, variant: GameVariant) -> RarityRank {
    RarityTable::for_variant(variant).rank_of(rarity_code)
}

/// True when a donor of `target` rank may give parts to an acceptor of `source` rank.
#[must_use]
pub fn is_acceptable(source: RarityRank, target: RarityRank) -> bool {
    target.display >= source.minimum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_codes_map_to_their_rank() {
        for variant in [GameVariant::Bl2, GameVariant::Tps] {
            assert_eq!(rank_of(2, variant).display, RarityTier::Uncommon);
            assert_eq!(rank_of(3, variant).display, RarityTier::Rare);
        }
    }

    #[test]
    fn drop_named_unique_is_normalized() {
        for variant in [GameVariant::Bl2, GameVariant::Tps] {
            assert_eq!(rank_of(500, variant), rank_of(501, variant));
            assert_eq!(rank_of(500, variant).display, RarityTier::Legendary);
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_table_max() {
        assert_eq!(rank_of(9_999, GameVariant::Bl2), BL2.max_rank());
        assert_eq!(rank_of(-3, GameVariant::Tps), TPS.max_rank());
        // 503 is a seraph code in one game and unknown in the other.
        assert_eq!(rank_of(503, GameVariant::Bl2).display, RarityTier::Seraph);
        assert_eq!(
            rank_of(503, GameVariant::Tps).display,
            RarityTier::Effervescent
        );
    }

    #[test]
    fn tables_diverge_above_very_rare() {
        assert_ne!(
            rank_of(5, GameVariant::Bl2).display,
            rank_of(5, GameVariant::Tps).display
        );
        assert_ne!(
            rank_of(6, GameVariant::Bl2).display,
            rank_of(6, GameVariant::Tps).display
        );
    }

    #[test]
    fn every_row_accepts_its_own_rank() {
        for table in [&BL2, &TPS] {
            for (_, rank) in table.rows {
                assert!(rank.minimum <= rank.display);
                assert!(is_acceptable(*rank, *rank));
            }
            assert!(is_acceptable(table.max, table.max));
        }
    }

    #[test]
    fn lower_display_rank_is_rejected_for_plain_ranks() {
        let rare = rank_of(3, GameVariant::Bl2);
        let uncommon = rank_of(2, GameVariant::Bl2);
        assert!(!is_acceptable(rare, uncommon));
        assert!(is_acceptable(uncommon, rare));

        let legendary = rank_of(7, GameVariant::Bl2);
        let etech = rank_of(5, GameVariant::Bl2);
        assert!(!is_acceptable(legendary, etech));
    }

    #[test]
    fn family_minimum_widens_the_band() {
        let effervescent = rank_of(506, GameVariant::Bl2);
        let seraph = rank_of(503, GameVariant::Bl2);
        assert!(is_acceptable(effervescent, seraph));
        let band = BL2.acceptable_band(effervescent);
        assert!(band.contains(RarityTier::Seraph));
        assert!(!band.contains(RarityTier::Legendary));
        assert_eq!(band.to_string(), "Seraph to Effervescent");
    }
}
