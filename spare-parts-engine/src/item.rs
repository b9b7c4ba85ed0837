//! Item records and the closed set of part slots they expose.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Unique identifier of an item inside the host inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

/// Reference to a part definition, e.g. `GD_Weap_Shotgun.Barrel.SG_Barrel_Jakobs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartRef(String);

impl PartRef {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque key naming the balance definition whose native pools apply to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceId(String);

impl BalanceId {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BalanceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Weapon,
    Shield,
    Artifact,
    ClassMod,
    GrenadeMod,
}

impl ClassKind {
    pub const ALL: [Self; 5] = [
        Self::Weapon,
        Self::Shield,
        Self::Artifact,
        Self::ClassMod,
        Self::GrenadeMod,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Shield => "shield",
            Self::Artifact => "artifact",
            Self::ClassMod => "class_mod",
            Self::GrenadeMod => "grenade_mod",
        }
    }
}

/// Player class a class mod is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerClass {
    Siren,
    Commando,
    Gunzerker,
    Assassin,
    Mechromancer,
    Psycho,
    Gladiator,
    Enforcer,
    Lawbringer,
    Prototype,
    Doppelganger,
    Baroness,
}

impl PlayerClass {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Siren => "Siren",
            Self::Commando => "Commando",
            Self::Gunzerker => "Gunzerker",
            Self::Assassin => "Assassin",
            Self::Mechromancer => "Mechromancer",
            Self::Psycho => "Psycho",
            Self::Gladiator => "Gladiator",
            Self::Enforcer => "Enforcer",
            Self::Lawbringer => "Lawbringer",
            Self::Prototype => "Prototype",
            Self::Doppelganger => "Doppelganger",
            Self::Baroness => "Baroness",
        }
    }
}

/// Label for an optional class requirement.
#[must_use]
pub const fn class_label(class: Option<PlayerClass>) -> &'static str {
    match class {
        Some(class) => class.label(),
        None => "any class",
    }
}

/// Every part field an item can carry.
///
/// Weapons use the first block, everything else uses the generic
/// Alpha..Theta block. `Material` is shared by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    Accessory1,
    Accessory2,
    Barrel,
    Body,
    Elemental,
    Grip,
    Sight,
    Stock,
    Prefix,
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Zeta,
    Eta,
    Theta,
    Material,
}

impl SlotKey {
    pub const ALL: [Self; 18] = [
        Self::Accessory1,
        Self::Accessory2,
        Self::Barrel,
        Self::Body,
        Self::Elemental,
        Self::Grip,
        Self::Sight,
        Self::Stock,
        Self::Prefix,
        Self::Alpha,
        Self::Beta,
        Self::Gamma,
        Self::Delta,
        Self::Epsilon,
        Self::Zeta,
        Self::Eta,
        Self::Theta,
        Self::Material,
    ];

    /// Name of the definition field holding the equipped part.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Accessory1 => "Accessory1PartDefinition",
            Self::Accessory2 => "Accessory2PartDefinition",
            Self::Barrel => "BarrelPartDefinition",
            Self::Body => "BodyPartDefinition",
            Self::Elemental => "ElementalPartDefinition",
            Self::Grip => "GripPartDefinition",
            Self::Sight => "SightPartDefinition",
            Self::Stock => "StockPartDefinition",
            Self::Prefix => "PrefixPartDefinition",
            Self::Alpha => "AlphaItemPartDefinition",
            Self::Beta => "BetaItemPartDefinition",
            Self::Gamma => "GammaItemPartDefinition",
            Self::Delta => "DeltaItemPartDefinition",
            Self::Epsilon => "EpsilonItemPartDefinition",
            Self::Zeta => "ZetaItemPartDefinition",
            Self::Eta => "EtaItemPartDefinition",
            Self::Theta => "ThetaItemPartDefinition",
            Self::Material => "MaterialPartDefinition",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Part fields of an item definition, addressed through [`SlotKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PartSlots {
    pub accessory1: Option<PartRef>,
    pub accessory2: Option<PartRef>,
    pub barrel: Option<PartRef>,
    pub body: Option<PartRef>,
    pub elemental: Option<PartRef>,
    pub grip: Option<PartRef>,
    pub sight: Option<PartRef>,
    pub stock: Option<PartRef>,
    pub prefix: Option<PartRef>,
    pub alpha: Option<PartRef>,
    pub beta: Option<PartRef>,
    pub gamma: Option<PartRef>,
    pub delta: Option<PartRef>,
    pub epsilon: Option<PartRef>,
    pub zeta: Option<PartRef>,
    pub eta: Option<PartRef>,
    pub theta: Option<PartRef>,
    pub material: Option<PartRef>,
}

impl PartSlots {
    #[must_use]
    pub fn get(&self, key: SlotKey) -> Option<&PartRef> {
        match key {
            SlotKey::Accessory1 => self.accessory1.as_ref(),
            SlotKey::Accessory2 => self.accessory2.as_ref(),
            SlotKey::Barrel => self.barrel.as_ref(),
            SlotKey::Body => self.body.as_ref(),
            SlotKey::Elemental => self.elemental.as_ref(),
            SlotKey::Grip => self.grip.as_ref(),
            SlotKey::Sight => self.sight.as_ref(),
            SlotKey::Stock => self.stock.as_ref(),
            SlotKey::Prefix => self.prefix.as_ref(),
            SlotKey::Alpha => self.alpha.as_ref(),
            SlotKey::Beta => self.beta.as_ref(),
            SlotKey::Gamma => self.gamma.as_ref(),
            SlotKey::Delta => self.delta.as_ref(),
            SlotKey::Epsilon => self.epsilon.as_ref(),
            SlotKey::Zeta => self.zeta.as_ref(),
            SlotKey::Eta => self.eta.as_ref(),
            SlotKey::Theta => self.theta.as_ref(),
            SlotKey::Material => self.material.as_ref(),
        }
    }

    pub const fn slot_mut(&mut self, key: SlotKey) -> &mut Option<PartRef> {
        match key {
            SlotKey::Accessory1 => &mut self.accessory1,
            SlotKey::Accessory2 => &mut self.accessory2,
            SlotKey::Barrel => &mut self.barrel,
            SlotKey::Body => &mut self.body,
            SlotKey::Elemental => &mut self.elemental,
            SlotKey::Grip => &mut self.grip,
            SlotKey::Sight => &mut self.sight,
            SlotKey::Stock => &mut self.stock,
            SlotKey::Prefix => &mut self.prefix,
            SlotKey::Alpha => &mut self.alpha,
            SlotKey::Beta => &mut self.beta,
            SlotKey::Gamma => &mut self.gamma,
            SlotKey::Delta => &mut self.delta,
            SlotKey::Epsilon => &mut self.epsilon,
            SlotKey::Zeta => &mut self.zeta,
            SlotKey::Eta => &mut self.eta,
            SlotKey::Theta => &mut self.theta,
            SlotKey::Material => &mut self.material,
        }
    }

    pub fn set(&mut self, key: SlotKey, part: Option<PartRef>) {
        *self.slot_mut(key) = part;
    }

    /// Occupied slots in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (SlotKey, &PartRef)> + '_ {
        SlotKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|part| (key, part)))
    }
}

/// Data recomputed whenever an item's parts change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedData {
    pub filled_slots: u8,
    pub fingerprint: u64,
}

impl DerivedData {
    #[must_use]
    pub fn from_parts(parts: &PartSlots) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        let mut filled_slots = 0_u8;
        for (key, part) in parts.filled() {
            filled_slots = filled_slots.saturating_add(1);
            hasher.write(key.field_name().as_bytes());
            hasher.write_u8(0x1f);
            hasher.write(part.as_str().as_bytes());
            hasher.write_u8(0x1e);
        }
        Self {
            filled_slots,
            fingerprint: hasher.finish(),
        }
    }
}

/// A concrete item as held by the host inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub class_kind: ClassKind,
    pub rarity_code: i32,
    pub balance: BalanceId,
    /// Weapon type or item definition family, e.g. `shotgun` or `shield_turtle`.
    #[serde(default)]
    pub sub_kind: String,
    #[serde(default)]
    pub required_class: Option<PlayerClass>,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub ammo_pooled: bool,
    #[serde(default)]
    pub parts: PartSlots,
    #[serde(default)]
    pub derived: DerivedData,
}

impl ItemRecord {
    #[must_use]
    pub fn new(
        id: ItemId,
        class_kind: ClassKind,
        rarity_code: i32,
        balance: impl Into<BalanceId>,
    ) -> Self {
        let mut item = Self {
            id,
            class_kind,
            rarity_code,
            balance: balance.into(),
            sub_kind: String::new(),
            required_class: None,
            equipped: false,
            ammo_pooled: false,
            parts: PartSlots::default(),
            derived: DerivedData::default(),
        };
        item.initialize_internal();
        item
    }

    #[must_use]
    pub fn with_sub_kind(mut self, sub_kind: impl Into<String>) -> Self {
        self.sub_kind = sub_kind.into();
        self
    }

    #[must_use]
    pub const fn with_required_class(mut self, class: PlayerClass) -> Self {
        self.required_class = Some(class);
        self
    }

    #[must_use]
    pub const fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    #[must_use]
    pub fn with_part(mut self, key: SlotKey, part: impl Into<PartRef>) -> Self {
        self.parts.set(key, Some(part.into()));
        self.initialize_internal();
        self
    }

    #[must_use]
    pub fn part(&self, key: SlotKey) -> Option<&PartRef> {
        self.parts.get(key)
    }

    /// Equipped or ammo-pooled items cannot donate parts.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.equipped || self.ammo_pooled
    }

    /// Recompute derived data from the current parts.
    pub fn initialize_internal(&mut self) {
        self.derived = DerivedData::from_parts(&self.parts);
    }
}
