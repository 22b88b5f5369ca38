use crate::progression::MAX_POKEMON_LEVEL;
use crate::stats::pb_from_trainer_level;
use serde::{Deserialize, Serialize};

pub const ROLE_SELECTOR_COUNT: usize = 4;

/// Free-text boxes on the trainer half of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerNotes {
    pub trainer_actions: String,
    pub trainer_features: String,
    pub bag: String,
}

/// Everything the player types into the trainer panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainerInputs {
    pub player_name: String,
    pub trainer_name: String,
    /// Role id per selector, blank when unset.
    pub role_selections: [String; ROLE_SELECTOR_COUNT],
    pub role_levels: [i32; ROLE_SELECTOR_COUNT],
    pub notes: TrainerNotes,
}

impl TrainerInputs {
    /// Sum of all role levels, never below 1.
    pub fn total_role_levels(&self) -> i32 {
        let total = self
            .role_levels
            .iter()
            .fold(0i32, |sum, level| sum.saturating_add(*level));
        total.max(1)
    }

    /// Party Pokemon level, derived from the trainer's total role levels.
    pub fn pokemon_level(&self) -> u8 {
        self.total_role_levels().clamp(1, MAX_POKEMON_LEVEL as i32) as u8
    }

    pub fn proficiency_bonus(&self) -> i32 {
        pb_from_trainer_level(self.total_role_levels())
    }

    /// Distinct selected roles in selector order.
    pub fn selected_roles_in_order(&self) -> Vec<String> {
        let mut roles: Vec<String> = Vec::new();
        for role in self.role_selections.iter().filter(|r| !r.is_empty()) {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }

    /// The first selector's role.
    pub fn primary_role(&self) -> Option<&str> {
        self.role_for_selector(1)
    }

    /// Role in selector `selector` (1-based), if one is chosen.
    pub fn role_for_selector(&self, selector: usize) -> Option<&str> {
        selector
            .checked_sub(1)
            .and_then(|index| self.role_selections.get(index))
            .map(String::as_str)
            .filter(|role| !role.is_empty())
    }
}
