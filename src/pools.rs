use crate::stats::pb_from_trainer_level;
use serde::{Deserialize, Serialize};

/// A row of use markers. Only the spent count is stored; the capacity is
/// derived from the sheet each time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePool {
    pub used: i32,
}

impl UsagePool {
    pub fn new(used: i32) -> Self {
        Self { used }
    }

    /// Click marker `unit`: a spent marker refunds one use, an open marker
    /// spends one. The result is clamped into `[0, capacity]`.
    pub fn toggle(&mut self, unit: usize, capacity: u32) {
        let spent = (unit as i64) < self.used as i64;
        self.used = if spent {
            self.used.saturating_sub(1)
        } else {
            self.used.saturating_add(1)
        };
        self.clamp_to(capacity);
    }

    pub fn clamp_to(&mut self, capacity: u32) {
        let capacity = i32::try_from(capacity).unwrap_or(i32::MAX);
        self.used = self.used.clamp(0, capacity);
    }

    /// Spent flag per marker, for display.
    pub fn markers(&self, capacity: u32) -> Vec<bool> {
        (0..capacity as usize)
            .map(|unit| (unit as i64) < self.used as i64)
            .collect()
    }
}

/// Great move uses per rest.
pub fn great_move_capacity(pokemon_level: u8) -> u32 {
    if pokemon_level <= 3 {
        3
    } else {
        4
    }
}

pub fn signature_move_capacity(total_role_levels: i32) -> u32 {
    (pb_from_trainer_level(total_role_levels) + 2) as u32
}

pub fn trainer_action_capacity(total_role_levels: i32) -> u32 {
    (pb_from_trainer_level(total_role_levels) + 2) as u32
}
