use crate::capabilities::SheetResolver;
use crate::rules::capitalize_word;
use schema::{MoveRecord, MoveTier};
use serde::Serialize;

/// Nest move slots at a Pokemon level.
pub fn nest_move_limit(pokemon_level: u8) -> usize {
    match pokemon_level {
        1 => 3,
        2 | 3 => 4,
        4 => 5,
        l if l >= 5 => 5,
        _ => 3,
    }
}

/// Great move slots at a Pokemon level.
pub fn max_great_slots(pokemon_level: u8) -> usize {
    if pokemon_level <= 2 {
        3
    } else {
        4
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "role")]
pub enum MoveSource {
    Native,
    Role(String),
}

/// One entry of a move selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOption {
    pub id: String,
    pub name: String,
    pub label: String,
    pub source: MoveSource,
}

impl MoveOption {
    fn native(record: &MoveRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            label: record.name.clone(),
            source: MoveSource::Native,
        }
    }

    fn role_granted(record: &MoveRecord, role: &str) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            label: format!("{} ({})", record.name, capitalize_word(role)),
            source: MoveSource::Role(role.to_string()),
        }
    }
}

fn push_unique(options: &mut Vec<MoveOption>, option: MoveOption) {
    if !options.iter().any(|existing| existing.id == option.id) {
        options.push(option);
    }
}

impl<'a> SheetResolver<'a> {
    /// Move selectors only open once the species resolves.
    pub fn moves_enabled(&self, slot: usize) -> bool {
        self.species(slot).is_some()
    }

    fn native_moves_of_tier(&self, slot: usize, tier: MoveTier) -> Vec<&'a MoveRecord> {
        let Some(species) = self.species(slot) else {
            return Vec::new();
        };
        species
            .moves
            .ids()
            .into_iter()
            .filter_map(|id| self.tables().move_record(id))
            .filter(|record| record.tier == tier)
            .collect()
    }

    pub fn native_nest_moves(&self, slot: usize) -> Vec<&'a MoveRecord> {
        self.native_moves_of_tier(slot, MoveTier::Nest)
    }

    pub fn native_great_moves(&self, slot: usize) -> Vec<&'a MoveRecord> {
        self.native_moves_of_tier(slot, MoveTier::Great)
    }

    pub fn nest_move_options(&self, slot: usize) -> Vec<MoveOption> {
        self.native_nest_moves(slot)
            .into_iter()
            .map(MoveOption::native)
            .collect()
    }

    /// Whether the first great slot holds a move the species only has
    /// through its role. Native moves never use up the role grant.
    pub fn has_consumed_role_great_move(&self, slot: usize) -> bool {
        let Some(move_id) = self
            .slot_state(slot)
            .and_then(|state| state.great_moves.first())
            .and_then(|entry| entry.as_deref())
        else {
            return false;
        };
        let Some(species) = self.species(slot) else {
            return false;
        };
        if species.moves.contains(move_id) {
            return false;
        }

        self.tables()
            .move_record(move_id)
            .is_some_and(|record| record.grantable_by_role)
    }

    /// Options for great slot `index`. The first slot offers the moves the
    /// level-1 role can grant (in move table order) ahead of native great
    /// moves; once a role move is taken only that one stays on offer. The
    /// other slots offer native great moves only.
    pub fn great_move_options(&self, slot: usize, index: usize) -> Vec<MoveOption> {
        if !self.moves_enabled(slot) || index >= max_great_slots(self.pokemon_level()) {
            return Vec::new();
        }

        let mut options = Vec::new();

        if index == 0 {
            if let Some(role) = self.great_move_role(slot) {
                let consumed = self.has_consumed_role_great_move(slot);
                let saved = self
                    .slot_state(slot)
                    .and_then(|state| state.great_moves.first())
                    .and_then(|entry| entry.as_deref());

                for record in self.tables().moves() {
                    if !record.is_role_grant_for(role) {
                        continue;
                    }
                    if consumed && saved != Some(record.id.as_str()) {
                        continue;
                    }
                    push_unique(&mut options, MoveOption::role_granted(record, role));
                }
            }
        }

        for record in self.native_great_moves(slot) {
            push_unique(&mut options, MoveOption::native(record));
        }
        options
    }

    /// Known great moves that match the effective role, usable as the
    /// trainer command.
    pub fn trainer_action_move_ids(&self, slot: usize) -> Vec<String> {
        let Some(role) = self.effective_role(slot) else {
            return Vec::new();
        };
        let Some(state) = self.slot_state(slot) else {
            return Vec::new();
        };

        let mut ids: Vec<String> = Vec::new();
        for id in state.great_moves.iter().flatten() {
            let eligible = self
                .tables()
                .move_record(id)
                .is_some_and(|record| record.tier == MoveTier::Great && record.lists_role(role));
            if eligible && !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Trainer command move choices. Empty until the command unlocks.
    pub fn trainer_action_options(&self, slot: usize) -> Vec<MoveOption> {
        if self.trainer_command(slot).is_none() {
            return Vec::new();
        }
        self.trainer_action_move_ids(slot)
            .iter()
            .filter_map(|id| self.tables().move_record(id))
            .map(MoveOption::native)
            .collect()
    }

    /// Nest then great picks, de-duplicated.
    pub fn known_move_ids(&self, slot: usize) -> Vec<String> {
        let Some(state) = self.slot_state(slot) else {
            return Vec::new();
        };

        let mut ids: Vec<String> = Vec::new();
        for id in state.nest_moves.iter().chain(&state.great_moves).flatten() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Known moves a signature move may be built on, once unlocked.
    pub fn signature_candidates(&self, slot: usize) -> Vec<String> {
        if !self.signature_unlocked(slot) {
            return Vec::new();
        }
        self.known_move_ids(slot)
            .into_iter()
            .filter(|id| self.tables().move_record(id).is_some())
            .collect()
    }
}
