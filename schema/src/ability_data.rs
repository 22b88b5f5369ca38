use crate::lenient::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilitySource {
    Native,
    Role,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Minimum Pokemon level; missing means available from level 1.
    #[serde(default)]
    pub unlocks_at: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<AbilitySource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl AbilityRecord {
    pub fn has_source(&self, source: AbilitySource) -> bool {
        self.sources.contains(&source)
    }

    /// Role-sourced and listed for `role`.
    pub fn granted_by_role(&self, role: Option<&str>) -> bool {
        match role {
            Some(role) => self.has_source(AbilitySource::Role) && self.roles.iter().any(|r| r == role),
            None => false,
        }
    }
}
