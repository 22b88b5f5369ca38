//! Runtime settings, read from the environment.

use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "POKEMON_SHEET_DATA_DIR";
pub const SAVE_PATH_VAR: &str = "POKEMON_SHEET_SAVE_PATH";
pub const SEED_SIGNATURE_DEFAULTS_VAR: &str = "POKEMON_SHEET_SEED_SIGNATURE_DEFAULTS";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SAVE_PATH: &str = "pokemon_trainer_sheet_v1.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// Directory holding the rule tables.
    pub data_dir: PathBuf,
    pub save_path: PathBuf,
    /// Pre-fill new signature moves with the bond defaults.
    pub seed_signature_defaults: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            seed_signature_defaults: false,
        }
    }
}

impl SheetConfig {
    /// Read `POKEMON_SHEET_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_dir: non_blank(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            save_path: non_blank(SAVE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.save_path),
            seed_signature_defaults: non_blank(SEED_SIGNATURE_DEFAULTS_VAR)
                .map(|raw| parse_flag(SEED_SIGNATURE_DEFAULTS_VAR, &raw))
                .unwrap_or(defaults.seed_signature_defaults),
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        other => {
            tracing::warn!(key, value = other, "Unrecognized flag value, using false");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> SheetConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SheetConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), SheetConfig::default());
        assert!(!SheetConfig::default().seed_signature_defaults);
    }

    #[test]
    fn test_overrides_from_variables() {
        let config = config_from(&[
            (DATA_DIR_VAR, "/srv/rules"),
            (SAVE_PATH_VAR, "ash.json"),
            (SEED_SIGNATURE_DEFAULTS_VAR, "true"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/rules"));
        assert_eq!(config.save_path, PathBuf::from("ash.json"));
        assert!(config.seed_signature_defaults);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[(DATA_DIR_VAR, "  ")]);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[rstest]
    #[case("1", true)]
    #[case("Yes", true)]
    #[case("off", false)]
    #[case("maybe", false)]
    fn test_parse_flag(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag("FLAG", raw), expected);
    }
}
