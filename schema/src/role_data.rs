use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// The standard damage dice, smallest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DieSize {
    D4,
    D6,
    D8,
    D10,
    D12,
}

impl DieSize {
    pub const ALL: [DieSize; 5] = [DieSize::D4, DieSize::D6, DieSize::D8, DieSize::D10, DieSize::D12];

    pub fn faces(self) -> u32 {
        match self {
            DieSize::D4 => 4,
            DieSize::D6 => 6,
            DieSize::D8 => 8,
            DieSize::D10 => 10,
            DieSize::D12 => 12,
        }
    }
}

/// Die size per move category. Unrecognized die names in the file are
/// dropped rather than failing the whole role table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceProfile {
    #[serde(deserialize_with = "lenient_die", skip_serializing_if = "Option::is_none")]
    pub physical: Option<DieSize>,
    #[serde(deserialize_with = "lenient_die", skip_serializing_if = "Option::is_none")]
    pub special: Option<DieSize>,
    #[serde(deserialize_with = "lenient_die", skip_serializing_if = "Option::is_none")]
    pub healing: Option<DieSize>,
}

impl DiceProfile {
    /// The profile used when a Pokemon has no unlocked roles yet.
    pub fn uniform(die: DieSize) -> Self {
        Self {
            physical: Some(die),
            special: Some(die),
            healing: Some(die),
        }
    }
}

fn lenient_die<'de, D>(deserializer: D) -> Result<Option<DieSize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|die| DieSize::from_str(die.trim()).ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Feature,
    TrainerAction,
    #[serde(other)]
    Other,
}

/// Text-only stat boost shown in the trainer features box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStatBoost {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub amount: i32,
    #[serde(default)]
    pub display_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    #[serde(rename = "type")]
    pub kind: LevelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_boost: Option<DisplayStatBoost>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBoostTable {
    pub level3: Option<IndexMap<String, i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRoleRecord")]
pub struct RoleRecord {
    pub id: String,
    pub name: String,
    /// Level definitions keyed `"2"` through `"5"`.
    pub levels: IndexMap<String, LevelDefinition>,
    pub stat_boosts: Option<StatBoostTable>,
    pub dice: Option<DiceProfile>,
}

impl RoleRecord {
    pub fn level(&self, level: u8) -> Option<&LevelDefinition> {
        self.levels.get(level.to_string().as_str())
    }

    pub fn level3_stat_boosts(&self) -> Option<&IndexMap<String, i32>> {
        self.stat_boosts.as_ref().and_then(|boosts| boosts.level3.as_ref())
    }
}

// Some role files nest the dice profile under `levels.dice`; entries under
// `levels` are therefore either a level definition or that stray profile.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevelEntry {
    Definition(LevelDefinition),
    Dice(DiceProfile),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoleRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    levels: IndexMap<String, RawLevelEntry>,
    #[serde(default)]
    stat_boosts: Option<StatBoostTable>,
    #[serde(default)]
    dice: Option<DiceProfile>,
}

impl From<RawRoleRecord> for RoleRecord {
    fn from(raw: RawRoleRecord) -> Self {
        let mut levels = IndexMap::new();
        let mut nested_dice = None;

        for (key, entry) in raw.levels {
            match entry {
                RawLevelEntry::Definition(definition) => {
                    levels.insert(key, definition);
                }
                RawLevelEntry::Dice(profile) if key == "dice" => nested_dice = Some(profile),
                RawLevelEntry::Dice(_) => {}
            }
        }

        Self {
            id: raw.id,
            name: raw.name,
            levels,
            stat_boosts: raw.stat_boosts,
            dice: raw.dice.or(nested_dice),
        }
    }
}
