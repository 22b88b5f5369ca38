//! What a Pokemon can do right now, derived from its progression track.
//!
//! Every query here is a pure read of the party and the rule tables. The
//! move-slot queries live in `eligibility.rs` and the move text in
//! `preview.rs`; all of them hang off the same `SheetResolver`.

use crate::eligibility::{max_great_slots, nest_move_limit, MoveOption};
use crate::party::{PartyState, SlotState};
use crate::pools::{great_move_capacity, signature_move_capacity, trainer_action_capacity};
use crate::progression::{
    ABILITY_ROLE_INDEX, FEATURE_ROLE_INDEX, GREAT_MOVE_ROLE_INDEX, SIGNATURE_ROLE_INDEX,
    TRAINER_COMMAND_ROLE_INDEX,
};
use crate::rules::{capitalize_word, RuleTables};
use crate::stats::{
    apply_stat_boosts, average_dice_profiles, format_modifier, MiniStats, ModifierBlock,
};
use crate::errors::SheetResult;
use indexmap::IndexMap;
use schema::{AbilitySource, BaseStats, DiceProfile, DieSize, LevelKind, SpeciesRecord};
use serde::Serialize;

/// Level-3 bonus used when a role has no `statBoosts.level3` table.
const DEFAULT_STAT_BOOSTS: [(&str, &str); 6] = [
    ("striker", "atk"),
    ("mystic", "spAtk"),
    ("reactor", "spd"),
    ("balancer", "spDef"),
    ("anchor", "def"),
    ("manipulator", "man"),
];
const DEFAULT_STAT_BOOST_AMOUNT: i32 = 2;

/// The trainer command a Pokemon grants at level 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerCommand {
    pub role: String,
    pub role_name: String,
    pub grants: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityOption {
    pub id: String,
    pub label: String,
    pub description: String,
    pub role_granted: bool,
}

/// Everything derived for one slot in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCapabilities {
    pub slot: usize,
    pub display_name: String,
    pub species_key: Option<String>,
    pub level: u8,
    pub effective_role: Option<String>,
    pub great_move_role: Option<String>,
    pub ability_role: Option<String>,
    pub unlocked_roles: Vec<String>,
    pub roles_label: String,
    pub base_stats: Option<BaseStats>,
    pub stat_boosts: IndexMap<String, i32>,
    pub boosted_stats: Option<BaseStats>,
    pub modifiers: ModifierBlock,
    pub mini_stats: MiniStats,
    pub dice_profile: Option<DiceProfile>,
    pub abilities_unlocked: bool,
    pub ability_options: Vec<AbilityOption>,
    pub moves_enabled: bool,
    pub nest_slots: usize,
    pub nest_options: Vec<MoveOption>,
    pub great_slots: usize,
    pub great_options: Vec<Vec<MoveOption>>,
    pub role_great_move_consumed: bool,
    pub signature_unlocked: bool,
    pub signature_candidates: Vec<String>,
    pub trainer_command: Option<TrainerCommand>,
    pub trainer_action_options: Vec<MoveOption>,
    pub great_move_capacity: u32,
    pub signature_capacity: u32,
    pub trainer_action_capacity: u32,
    pub trainer_features: Vec<String>,
    pub trainer_actions: Vec<String>,
}

impl DerivedCapabilities {
    /// Plain-text summary of the slot, one line per entry, starting with the
    /// `Slot N:` header.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Slot {}: {} (level {})",
            self.slot, self.display_name, self.level
        )];

        let Some(species) = self.species_key.as_deref() else {
            lines.push("  (empty)".to_string());
            return lines;
        };
        lines.push(format!("  Species: {}", species));
        lines.push(format!("  {}", self.roles_label));

        let m = &self.modifiers;
        lines.push(format!(
            "  Mods: ATK:{} DEF:{} SP.ATK:{} SP.DEF:{} MAN:{} SPD:{}",
            format_modifier(m.atk),
            format_modifier(m.def),
            format_modifier(m.sp_atk),
            format_modifier(m.sp_def),
            format_modifier(m.man),
            format_modifier(m.spd)
        ));
        if let Some(dice) = &self.dice_profile {
            let die = |d: Option<DieSize>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
            lines.push(format!(
                "  Dice: physical {} / special {} / healing {}",
                die(dice.physical),
                die(dice.special),
                die(dice.healing)
            ));
        }

        lines.push(format!(
            "  Moves: {} nest, {} great ({} uses)",
            self.nest_slots, self.great_slots, self.great_move_capacity
        ));
        if self.role_great_move_consumed {
            lines.push("  Role great move already taken".to_string());
        }
        if self.abilities_unlocked {
            let labels: Vec<&str> = self
                .ability_options
                .iter()
                .map(|option| option.label.as_str())
                .collect();
            lines.push(format!("  Abilities: {}", labels.join(", ")));
        }
        if let Some(command) = &self.trainer_command {
            lines.push(format!("  Trainer command: {}", command.role_name));
        }
        if self.signature_unlocked {
            lines.push(format!(
                "  Signature move: {} candidates, {} uses",
                self.signature_candidates.len(),
                self.signature_capacity
            ));
        }
        lines
    }
}

/// Read-only view joining the party with the rule tables. Slot numbers are
/// 1-based; an out-of-range slot reads as an empty one.
#[derive(Debug, Clone, Copy)]
pub struct SheetResolver<'a> {
    tables: &'a RuleTables,
    party: &'a PartyState,
}

impl<'a> SheetResolver<'a> {
    pub fn new(tables: &'a RuleTables, party: &'a PartyState) -> Self {
        Self { tables, party }
    }

    pub fn tables(&self) -> &'a RuleTables {
        self.tables
    }

    pub fn party(&self) -> &'a PartyState {
        self.party
    }

    pub(crate) fn slot_state(&self, slot: usize) -> Option<&'a SlotState> {
        self.party.slot(slot).ok()
    }

    pub fn pokemon_level(&self) -> u8 {
        self.party.pokemon_level()
    }

    fn role_at(&self, slot: usize, index: usize) -> Option<&'a str> {
        self.slot_state(slot)?.progression.role_at(index)
    }

    /// Canonical key for the slot's current species text.
    pub fn species_key(&self, slot: usize) -> Option<String> {
        let state = self.slot_state(slot)?;
        self.tables.resolve_species(&state.species_text)
    }

    pub fn species(&self, slot: usize) -> Option<&'a SpeciesRecord> {
        let state = self.slot_state(slot)?;
        self.tables.species_for_text(&state.species_text)
    }

    /// Role at the current level, else the slot's trainer selector, else the
    /// primary selector.
    pub fn effective_role(&self, slot: usize) -> Option<&'a str> {
        let state = self.slot_state(slot)?;
        let level = self.pokemon_level() as usize;

        state
            .progression
            .role_at(level - 1)
            .or_else(|| self.party.trainer.role_for_selector(slot))
            .or_else(|| self.party.trainer.primary_role())
    }

    pub fn great_move_role(&self, slot: usize) -> Option<&'a str> {
        self.role_at(slot, GREAT_MOVE_ROLE_INDEX)
    }

    pub fn ability_role(&self, slot: usize) -> Option<&'a str> {
        self.role_at(slot, ABILITY_ROLE_INDEX)
    }

    pub fn signature_unlocked(&self, slot: usize) -> bool {
        self.role_at(slot, SIGNATURE_ROLE_INDEX).is_some()
    }

    pub fn abilities_unlocked(&self, slot: usize) -> bool {
        self.ability_role(slot).is_some() && self.species(slot).is_some()
    }

    /// Present when the level-3 role's level-3 entry is a trainer action.
    pub fn trainer_command(&self, slot: usize) -> Option<TrainerCommand> {
        let role_id = self.role_at(slot, TRAINER_COMMAND_ROLE_INDEX)?;
        let role = self.tables.role(role_id)?;
        let level3 = role.level(3)?;
        if level3.kind != LevelKind::TrainerAction {
            return None;
        }

        Some(TrainerCommand {
            role: role_id.to_string(),
            role_name: self.tables.role_name(role_id),
            grants: level3.grants.clone(),
        })
    }

    /// Level-3 stat boosts. Empty below level 3 or without a level-3 role.
    pub fn stat_boosts(&self, slot: usize) -> IndexMap<String, i32> {
        if self.pokemon_level() < 3 {
            return IndexMap::new();
        }
        let Some(role_id) = self.role_at(slot, TRAINER_COMMAND_ROLE_INDEX) else {
            return IndexMap::new();
        };

        if let Some(table) = self.tables.role(role_id).and_then(|r| r.level3_stat_boosts()) {
            return table.clone();
        }

        DEFAULT_STAT_BOOSTS
            .iter()
            .filter(|(role, _)| *role == role_id)
            .map(|(_, stat)| (stat.to_string(), DEFAULT_STAT_BOOST_AMOUNT))
            .collect()
    }

    /// Distinct roles assigned up to the current level, in track order.
    pub fn unlocked_roles(&self, slot: usize) -> Vec<&'a str> {
        match self.slot_state(slot) {
            Some(state) => state.progression.unlocked_roles(self.pokemon_level()),
            None => Vec::new(),
        }
    }

    /// `Roles: Striker / Mystic`, or `Roles: —` before any role is set.
    pub fn roles_label(&self, slot: usize) -> String {
        let roles = self.unlocked_roles(slot);
        if roles.is_empty() {
            return "Roles: —".to_string();
        }
        let names: Vec<String> = roles.into_iter().map(capitalize_word).collect();
        format!("Roles: {}", names.join(" / "))
    }

    /// Averaged die sizes of the unlocked roles. `None` until a role is
    /// unlocked.
    pub fn dice_profile(&self, slot: usize) -> Option<DiceProfile> {
        let roles = self.unlocked_roles(slot);
        if roles.is_empty() {
            return None;
        }

        let profiles: Vec<DiceProfile> = roles
            .iter()
            .filter_map(|role| self.tables.role(role).and_then(|r| r.dice))
            .collect();
        Some(average_dice_profiles(&profiles))
    }

    fn role_grants_ability(&self, ability_id: &str, role: Option<&str>) -> bool {
        self.tables
            .ability(ability_id)
            .is_some_and(|ability| ability.granted_by_role(role))
    }

    /// Ability ids the Pokemon may pick: its native abilities plus those its
    /// ability role grants, filtered by level.
    pub fn eligible_ability_ids(&self, slot: usize) -> Vec<String> {
        let Some(species) = self.species(slot) else {
            return Vec::new();
        };
        let role = self.ability_role(slot);
        let level = self.pokemon_level();

        let mut candidates: Vec<&str> = Vec::new();
        for id in &species.abilities {
            if !candidates.contains(&id.as_str()) {
                candidates.push(id);
            }
        }
        for ability in self.tables.abilities() {
            if ability.granted_by_role(role) && !candidates.contains(&ability.id.as_str()) {
                candidates.push(&ability.id);
            }
        }

        candidates
            .into_iter()
            .filter(|id| {
                let Some(ability) = self.tables.ability(id) else {
                    return false;
                };
                if ability.unlocks_at > level {
                    return false;
                }
                let native = ability.has_source(AbilitySource::Native)
                    && species.abilities.iter().any(|own| own == id);
                native || ability.granted_by_role(role)
            })
            .map(str::to_string)
            .collect()
    }

    /// Ability choices with labels. Empty while abilities are locked.
    pub fn ability_options(&self, slot: usize) -> Vec<AbilityOption> {
        if !self.abilities_unlocked(slot) {
            return Vec::new();
        }
        let role = self.ability_role(slot);
        let role_name = role.map(|r| self.tables.role_name(r));

        self.eligible_ability_ids(slot)
            .into_iter()
            .filter_map(|id| {
                let ability = self.tables.ability(&id)?;
                let role_granted = self.role_grants_ability(&id, role);
                let label = match (&role_name, role_granted) {
                    (Some(name), true) => format!("{} ({})", ability.name, name),
                    _ => ability.name.clone(),
                };
                Some(AbilityOption {
                    id,
                    label,
                    description: ability.description.clone(),
                    role_granted,
                })
            })
            .collect()
    }

    pub fn modifiers(&self, slot: usize) -> ModifierBlock {
        self.species(slot)
            .map(|species| ModifierBlock::from_stats(&species.base_stats))
            .unwrap_or_default()
    }

    pub fn boosted_stats(&self, slot: usize) -> Option<BaseStats> {
        let species = self.species(slot)?;
        Some(apply_stat_boosts(&species.base_stats, &self.stat_boosts(slot)))
    }

    /// Feature lines the slot contributes to the trainer: the level-2 role
    /// feature and the level-3 display-only stat boost.
    pub fn trainer_features(&self, slot: usize) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(role_id) = self.role_at(slot, FEATURE_ROLE_INDEX) {
            if let Some(role) = self.tables.role(role_id) {
                let feature = role
                    .level(2)
                    .filter(|level| level.kind == LevelKind::Feature)
                    .and_then(|level| level.description.as_deref())
                    .filter(|text| !text.is_empty());
                if let Some(text) = feature {
                    lines.push(format!("{} (Level 2): {}", role.name, text));
                }
            }
        }

        if let Some(role_id) = self.role_at(slot, TRAINER_COMMAND_ROLE_INDEX) {
            if let Some(role) = self.tables.role(role_id) {
                let boost = role
                    .level(3)
                    .and_then(|level| level.stat_boost.as_ref())
                    .filter(|boost| boost.display_only);
                if let Some(boost) = boost {
                    lines.push(format!(
                        "{} (Level 3): +{} {}",
                        role.name,
                        boost.amount,
                        boost.stat.to_uppercase()
                    ));
                }
            }
        }

        lines
    }

    /// Trainer action lines: the baseline actions plus the slot's trainer
    /// command once unlocked.
    pub fn trainer_actions(&self, slot: usize) -> Vec<String> {
        let mut lines = vec![
            "Use Item".to_string(),
            "Swap Pokémon".to_string(),
            "Quick Switch (Reaction)\nCost: 1".to_string(),
        ];

        if let Some(command) = self.trainer_command(slot) {
            let selected = self
                .slot_state(slot)
                .and_then(|state| state.trainer_action_move.as_deref())
                .and_then(|id| self.tables.move_record(id));

            lines.push(match selected {
                Some(record) => format!("Trainer Command: {}\nCost: 1", record.name),
                None => format!(
                    "{} (Level 3): Trainer Command\nSelect a Great move you know that matches your role.\nCost: 1",
                    command.role_name
                ),
            });
        }

        lines
    }

    /// Derive the whole slot at once.
    pub fn derive_slot(&self, slot: usize) -> SheetResult<DerivedCapabilities> {
        self.party.slot(slot)?;

        let level = self.pokemon_level();
        let total_levels = self.party.trainer.total_role_levels();
        let species = self.species(slot);
        let modifiers = self.modifiers(slot);
        let great_slots = max_great_slots(level);

        Ok(DerivedCapabilities {
            slot,
            display_name: self.display_name(slot),
            species_key: self.species_key(slot),
            level,
            effective_role: self.effective_role(slot).map(str::to_string),
            great_move_role: self.great_move_role(slot).map(str::to_string),
            ability_role: self.ability_role(slot).map(str::to_string),
            unlocked_roles: self.unlocked_roles(slot).into_iter().map(str::to_string).collect(),
            roles_label: self.roles_label(slot),
            base_stats: species.map(|s| s.base_stats),
            stat_boosts: self.stat_boosts(slot),
            boosted_stats: self.boosted_stats(slot),
            modifiers,
            mini_stats: modifiers.mini_stats(),
            dice_profile: self.dice_profile(slot),
            abilities_unlocked: self.abilities_unlocked(slot),
            ability_options: self.ability_options(slot),
            moves_enabled: self.moves_enabled(slot),
            nest_slots: nest_move_limit(level),
            nest_options: self.nest_move_options(slot),
            great_slots,
            great_options: (0..great_slots)
                .map(|index| self.great_move_options(slot, index))
                .collect(),
            role_great_move_consumed: self.has_consumed_role_great_move(slot),
            signature_unlocked: self.signature_unlocked(slot),
            signature_candidates: self.signature_candidates(slot),
            trainer_command: self.trainer_command(slot),
            trainer_action_options: self.trainer_action_options(slot),
            great_move_capacity: great_move_capacity(level),
            signature_capacity: signature_move_capacity(total_levels),
            trainer_action_capacity: trainer_action_capacity(total_levels),
            trainer_features: self.trainer_features(slot),
            trainer_actions: self.trainer_actions(slot),
        })
    }
}
