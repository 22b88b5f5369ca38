use indexmap::IndexMap;
use schema::{BaseStats, DiceProfile, DieSize, StatName};
use serde::Serialize;
use std::str::FromStr;

/// Modifier for a base stat. Non-finite input yields no modifier.
pub fn stat_to_mod(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }

    let modifier = if value < 34.0 {
        -2
    } else if value <= 49.0 {
        -1
    } else if value <= 59.0 {
        0
    } else if value <= 74.0 {
        1
    } else if value <= 89.0 {
        2
    } else if value <= 109.0 {
        3
    } else if value <= 129.0 {
        4
    } else if value >= 160.0 {
        6
    } else {
        5
    };
    Some(modifier)
}

/// Sheet spelling of a modifier: `+2`, `0`, `-1`, or blank.
pub fn format_modifier(modifier: Option<i32>) -> String {
    match modifier {
        Some(m) if m > 0 => format!("+{}", m),
        Some(m) => m.to_string(),
        None => String::new(),
    }
}

/// Movement in feet for a speed modifier.
pub fn movement_from_spd_mod(spd_mod: Option<i32>) -> Option<u32> {
    match spd_mod? {
        m if m >= 5 => Some(50),
        4 => Some(45),
        2 | 3 => Some(35),
        0 | 1 => Some(30),
        -2 | -1 => Some(25),
        _ => None,
    }
}

/// Proficiency bonus for a trainer level (the total of all role levels).
pub fn pb_from_trainer_level(level: i32) -> i32 {
    match level {
        l if l <= 4 => 2,
        l if l <= 8 => 3,
        l if l <= 12 => 4,
        l if l <= 16 => 5,
        _ => 6,
    }
}

fn half_rounded_up(n: i32) -> i32 {
    -(-n).div_euclid(2)
}

pub fn awareness(sp_def_mod: Option<i32>) -> Option<i32> {
    Some(10 + sp_def_mod?)
}

/// CE: 10 + speed modifier + half the defense modifier, rounded up.
pub fn composite_defense(spd_mod: Option<i32>, def_mod: Option<i32>) -> Option<i32> {
    Some(10 + spd_mod? + half_rounded_up(def_mod?))
}

/// Nearest standard die to an average face count. Ties go to the larger die.
pub fn snap_to_standard_die(average: f64) -> DieSize {
    let mut best = DieSize::D4;
    let mut best_diff = f64::INFINITY;

    for die in DieSize::ALL {
        let diff = (die.faces() as f64 - average).abs();
        if diff < best_diff || (diff == best_diff && die > best) {
            best = die;
            best_diff = diff;
        }
    }
    best
}

fn average_die<I>(faces: I) -> Option<DieSize>
where
    I: Iterator<Item = u32>,
{
    let (sum, count) = faces.fold((0u32, 0u32), |(sum, count), f| (sum + f, count + 1));
    if count == 0 {
        return None;
    }
    Some(snap_to_standard_die(sum as f64 / count as f64))
}

/// Per-category average of several dice profiles. Categories no profile
/// defines stay empty.
pub fn average_dice_profiles(profiles: &[DiceProfile]) -> DiceProfile {
    DiceProfile {
        physical: average_die(profiles.iter().filter_map(|p| p.physical).map(DieSize::faces)),
        special: average_die(profiles.iter().filter_map(|p| p.special).map(DieSize::faces)),
        healing: average_die(profiles.iter().filter_map(|p| p.healing).map(DieSize::faces)),
    }
}

/// The six modifiers of a Pokemon, empty when there is no species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierBlock {
    pub atk: Option<i32>,
    pub def: Option<i32>,
    pub sp_atk: Option<i32>,
    pub sp_def: Option<i32>,
    pub man: Option<i32>,
    pub spd: Option<i32>,
}

impl ModifierBlock {
    pub fn from_stats(stats: &BaseStats) -> Self {
        let modifier = |stat: StatName| stat_to_mod(stats.get(stat) as f64);
        Self {
            atk: modifier(StatName::Atk),
            def: modifier(StatName::Def),
            sp_atk: modifier(StatName::SpAtk),
            sp_def: modifier(StatName::SpDef),
            man: modifier(StatName::Man),
            spd: modifier(StatName::Spd),
        }
    }

    pub fn get(&self, stat: StatName) -> Option<i32> {
        match stat {
            StatName::Atk => self.atk,
            StatName::Def => self.def,
            StatName::SpAtk => self.sp_atk,
            StatName::SpDef => self.sp_def,
            StatName::Man => self.man,
            StatName::Spd => self.spd,
        }
    }

    pub fn mini_stats(&self) -> MiniStats {
        MiniStats {
            movement: movement_from_spd_mod(self.spd),
            composite_defense: composite_defense(self.spd, self.def),
            awareness: awareness(self.sp_def),
        }
    }
}

/// Movement, CE and awareness shown beside the active Pokemon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniStats {
    pub movement: Option<u32>,
    pub composite_defense: Option<i32>,
    pub awareness: Option<i32>,
}

/// Add role stat boosts to a copy of `stats`. Boosts naming a stat the sheet
/// doesn't track are ignored.
pub fn apply_stat_boosts(stats: &BaseStats, boosts: &IndexMap<String, i32>) -> BaseStats {
    let mut boosted = *stats;
    for (name, amount) in boosts {
        match StatName::from_str(name) {
            Ok(stat) => {
                let value = boosted.get_mut(stat);
                *value = value.saturating_add(*amount);
            }
            Err(_) => tracing::debug!(stat = %name, "Skipping boost for untracked stat"),
        }
    }
    boosted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Some(-2))]
    #[case(33.0, Some(-2))]
    #[case(34.0, Some(-1))]
    #[case(49.0, Some(-1))]
    #[case(50.0, Some(0))]
    #[case(59.0, Some(0))]
    #[case(60.0, Some(1))]
    #[case(75.0, Some(2))]
    #[case(90.0, Some(3))]
    #[case(110.0, Some(4))]
    #[case(130.0, Some(5))]
    #[case(159.0, Some(5))]
    #[case(160.0, Some(6))]
    #[case(f64::NAN, None)]
    fn test_stat_to_mod_ladder(#[case] value: f64, #[case] expected: Option<i32>) {
        assert_eq!(stat_to_mod(value), expected);
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(Some(3)), "+3");
        assert_eq!(format_modifier(Some(0)), "0");
        assert_eq!(format_modifier(Some(-2)), "-2");
        assert_eq!(format_modifier(None), "");
    }

    #[rstest]
    #[case(Some(6), Some(50))]
    #[case(Some(5), Some(50))]
    #[case(Some(4), Some(45))]
    #[case(Some(3), Some(35))]
    #[case(Some(2), Some(35))]
    #[case(Some(1), Some(30))]
    #[case(Some(0), Some(30))]
    #[case(Some(-1), Some(25))]
    #[case(Some(-2), Some(25))]
    #[case(Some(-3), None)]
    #[case(None, None)]
    fn test_movement_from_spd_mod(#[case] spd_mod: Option<i32>, #[case] expected: Option<u32>) {
        assert_eq!(movement_from_spd_mod(spd_mod), expected);
    }

    #[rstest]
    #[case(1, 2)]
    #[case(4, 2)]
    #[case(5, 3)]
    #[case(8, 3)]
    #[case(9, 4)]
    #[case(13, 5)]
    #[case(16, 5)]
    #[case(17, 6)]
    #[case(20, 6)]
    fn test_pb_table(#[case] level: i32, #[case] expected: i32) {
        assert_eq!(pb_from_trainer_level(level), expected);
    }

    #[test]
    fn test_awareness_and_composite_defense() {
        assert_eq!(awareness(Some(3)), Some(13));
        assert_eq!(awareness(None), None);

        assert_eq!(composite_defense(Some(2), Some(3)), Some(14));
        assert_eq!(composite_defense(Some(0), Some(-1)), Some(10));
        assert_eq!(composite_defense(Some(0), Some(-3)), Some(9));
        assert_eq!(composite_defense(Some(1), None), None);
    }

    #[rstest]
    #[case(4.0, DieSize::D4)]
    #[case(5.0, DieSize::D6)]
    #[case(7.0, DieSize::D8)]
    #[case(7.9, DieSize::D8)]
    #[case(11.0, DieSize::D12)]
    #[case(20.0, DieSize::D12)]
    fn test_snap_to_standard_die(#[case] average: f64, #[case] expected: DieSize) {
        assert_eq!(snap_to_standard_die(average), expected);
    }

    #[test]
    fn test_average_dice_profiles() {
        let striker = DiceProfile {
            physical: Some(DieSize::D10),
            special: Some(DieSize::D6),
            healing: None,
        };
        let mystic = DiceProfile {
            physical: Some(DieSize::D4),
            special: Some(DieSize::D10),
            healing: None,
        };

        let averaged = average_dice_profiles(&[striker, mystic]);
        assert_eq!(averaged.physical, Some(DieSize::D8));
        assert_eq!(averaged.special, Some(DieSize::D8));
        assert_eq!(averaged.healing, None);
    }

    #[test]
    fn test_modifier_block_and_mini_stats() {
        let stats = BaseStats {
            atk: 55,
            def: 40,
            sp_atk: 50,
            sp_def: 50,
            man: 60,
            spd: 90,
        };
        let mods = ModifierBlock::from_stats(&stats);
        assert_eq!(mods.get(StatName::Spd), Some(3));
        assert_eq!(mods.get(StatName::Def), Some(-1));

        let mini = mods.mini_stats();
        assert_eq!(mini.movement, Some(35));
        assert_eq!(mini.composite_defense, Some(13));
        assert_eq!(mini.awareness, Some(10));

        assert_eq!(ModifierBlock::default().mini_stats(), MiniStats::default());
    }

    #[test]
    fn test_apply_stat_boosts_skips_untracked_stats() {
        let stats = BaseStats {
            atk: 55,
            sp_atk: 50,
            ..BaseStats::default()
        };
        let boosts = IndexMap::from([("spAtk".to_string(), 3), ("hp".to_string(), 5)]);

        let boosted = apply_stat_boosts(&stats, &boosts);
        assert_eq!(boosted.sp_atk, 53);
        assert_eq!(boosted.atk, 55);
    }

    #[test]
    fn test_apply_stat_boosts_saturates() {
        let stats = BaseStats {
            atk: i32::MAX - 1,
            def: i32::MIN + 1,
            ..BaseStats::default()
        };
        let boosts = IndexMap::from([("atk".to_string(), 5), ("def".to_string(), -5)]);

        let boosted = apply_stat_boosts(&stats, &boosts);
        assert_eq!(boosted.atk, i32::MAX);
        assert_eq!(boosted.def, i32::MIN);
    }
}
