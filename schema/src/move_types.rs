use crate::lenient::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Where a move may be slotted on the sheet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoveTier {
    Nest,
    Great,
    Signature,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MoveCategory {
    Physical,
    Special,
    Healing,
    #[default]
    #[serde(other)]
    Other,
}

/// A dice count as written in the move file: usually a number (`3`), but
/// authors also write full expressions (`"2d6"`) or bare strings (`"1"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceCount {
    Number(f64),
    Text(String),
}

impl DiceCount {
    /// Whether the count would print anything in a description.
    pub fn is_present(&self) -> bool {
        match self {
            DiceCount::Number(n) => *n != 0.0 && n.is_finite(),
            DiceCount::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for DiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceCount::Number(n) => write!(f, "{}", n),
            DiceCount::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfliction {
    #[serde(default)]
    pub inflicts: String,
}

impl StatusInfliction {
    pub fn is_none(&self) -> bool {
        self.inflicts.is_empty() || self.inflicts == "none"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffDebuff {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub amount: i32,
    #[serde(default = "default_buff_duration")]
    pub duration: String,
}

fn default_buff_duration() -> String {
    "1 round".to_string()
}

impl BuffDebuff {
    pub fn is_none(&self) -> bool {
        self.stat.is_empty() || self.stat == "none"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub tier: MoveTier,
    #[serde(default)]
    pub category: MoveCategory,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub base_dice: Option<DiceCount>,
    /// Healing dice.
    #[serde(default, rename = "HD", skip_serializing_if = "Option::is_none")]
    pub hd: Option<DiceCount>,
    /// Text with an optional `{damage}` placeholder.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_suffix: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub economy: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<StatusInfliction>,
    #[serde(default)]
    pub buff_debuff: Option<BuffDebuff>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grantable_by_role: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl MoveRecord {
    pub fn lists_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// A great move this role can hand out as its level-1 grant.
    pub fn is_role_grant_for(&self, role: &str) -> bool {
        self.tier == MoveTier::Great && self.grantable_by_role && self.lists_role(role)
    }
}
