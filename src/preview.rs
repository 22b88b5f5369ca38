//! Plain-text move cards.

use crate::capabilities::SheetResolver;
use crate::rules::capitalize_word;
use schema::{DiceCount, DiceProfile, DieSize, MoveCategory, MoveRecord};
use serde::Serialize;
use std::fmt;

const DAMAGE_PLACEHOLDER: &str = "{damage}";
const FALLBACK_DISPLAY_NAME: &str = "Pokémon";

/// Die rolled for a move of `category` under `profile`.
pub fn die_for_category(profile: &DiceProfile, category: MoveCategory) -> Option<DieSize> {
    match category {
        MoveCategory::Healing => profile.healing,
        MoveCategory::Physical => profile.physical,
        _ => profile.special,
    }
}

/// Dice shown in the damage and HD lines. Full expressions (`2d8`) are kept
/// as written; bare counts get the die appended.
pub fn dice_text(count: &DiceCount, die: Option<DieSize>) -> String {
    match (count, die) {
        (DiceCount::Number(n), None) => n.to_string(),
        (DiceCount::Number(n), Some(_)) if *n <= 0.0 => "0".to_string(),
        (DiceCount::Number(n), Some(die)) => format!("{}{}", n, die),
        (DiceCount::Text(text), _) if text.contains('d') => text.clone(),
        (DiceCount::Text(text), Some(die)) => format!("{}{}", text, die),
        (DiceCount::Text(text), None) => text.clone(),
    }
}

/// Prefix, template and suffix, with the first `{damage}` filled in.
pub fn render_description(record: &MoveRecord, die: Option<DieSize>) -> String {
    let damage = match (&record.base_dice, die) {
        (Some(count), Some(die)) if count.is_present() => format!("{}{}", count, die),
        _ => String::new(),
    };

    format!(
        "{}{}{}",
        record.description_prefix.as_deref().unwrap_or_default(),
        record.description.replacen(DAMAGE_PLACEHOLDER, &damage, 1),
        record.description_suffix.as_deref().unwrap_or_default(),
    )
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePreview {
    pub display_name: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub target: String,
    /// `None` when the move shows neither damage nor healing dice.
    pub damage_line: Option<String>,
    pub range: String,
    pub tags: String,
    pub status: String,
    pub buff_debuff: String,
}

impl MovePreview {
    pub fn build(display_name: &str, record: &MoveRecord, profile: &DiceProfile) -> Self {
        let die = die_for_category(profile, record.category);

        let damage = record
            .base_dice
            .as_ref()
            .map(|count| dice_text(count, die))
            .unwrap_or_default();
        let damage_line = match &record.hd {
            Some(hd) => Some(format!(
                "damage: {}  HD: {}",
                if damage.is_empty() { "—" } else { damage.as_str() },
                dice_text(hd, profile.healing)
            )),
            None if !damage.is_empty() => Some(format!("damage: {}", damage)),
            None => None,
        };

        let element = record.element.as_deref().map(capitalize_first).unwrap_or_default();
        let status = record
            .status
            .as_ref()
            .filter(|status| !status.is_none())
            .map(|status| status.inflicts.clone())
            .unwrap_or_else(|| "None".to_string());
        let buff_debuff = record
            .buff_debuff
            .as_ref()
            .filter(|buff| !buff.is_none())
            .map(|buff| {
                format!("{} {} ({})", buff.stat.to_uppercase(), buff.amount, buff.duration)
            })
            .unwrap_or_else(|| "None".to_string());

        Self {
            display_name: display_name.to_string(),
            title: format!("{} ({})", record.name, element),
            subtitle: format!(
                "{} ({}) · {}",
                record.economy.as_deref().unwrap_or("—"),
                capitalize_first(&record.tier.to_string()),
                capitalize_first(&record.category.to_string()),
            ),
            description: render_description(record, die),
            target: record.target.clone().unwrap_or_else(|| "—".to_string()),
            damage_line,
            range: record.range.clone().unwrap_or_else(|| "—".to_string()),
            tags: if record.tags.is_empty() {
                "None".to_string()
            } else {
                record.tags.join(", ")
            },
            status,
            buff_debuff,
        }
    }
}

impl fmt::Display for MovePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display_name)?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "Target: {}", self.target)?;
        if let Some(line) = &self.damage_line {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "Range: {}", self.range)?;
        writeln!(f, "Tags: {}", self.tags)?;
        writeln!(f, "Status: {}", self.status)?;
        write!(f, "Buff/Debuff: {}", self.buff_debuff)
    }
}

impl<'a> SheetResolver<'a> {
    /// Nickname, else the species text as typed, else a generic label.
    pub fn display_name(&self, slot: usize) -> String {
        let Some(state) = self.slot_state(slot) else {
            return FALLBACK_DISPLAY_NAME.to_string();
        };
        let nickname = state.nickname.trim();
        if !nickname.is_empty() {
            return nickname.to_string();
        }
        let species = state.species_text.trim();
        if !species.is_empty() {
            return capitalize_word(species);
        }
        FALLBACK_DISPLAY_NAME.to_string()
    }

    fn preview_profile(&self, slot: usize) -> DiceProfile {
        self.dice_profile(slot)
            .unwrap_or_else(|| DiceProfile::uniform(DieSize::D6))
    }

    /// Card for a move from the table, as this slot would roll it.
    pub fn preview_move(&self, slot: usize, move_id: &str) -> Option<MovePreview> {
        let record = self.tables().move_record(move_id)?;
        Some(MovePreview::build(
            &self.display_name(slot),
            record,
            &self.preview_profile(slot),
        ))
    }

    /// Card for the slot's composed signature move.
    pub fn preview_signature(&self, slot: usize) -> Option<MovePreview> {
        let record = self.slot_state(slot)?.signature.compose(self.tables())?;
        Some(MovePreview::build(
            &self.display_name(slot),
            &record,
            &self.preview_profile(slot),
        ))
    }
}
