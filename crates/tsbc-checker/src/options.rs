//! Detector configuration.

use serde::{Deserialize, Deserializer, Serialize};
use tsbc_solver::RelationOptions;

/// Accepts `true`/`false` as well as their string spellings, so a config
/// written as `"requiredToOptionalAsBreakingChange": "false"` still loads.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// How two type expressions are related when deciding a `TypeChanged`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRelationMode {
    /// Both directions: the types admit the same values.
    #[default]
    Equivalent,
    /// Source assignable to target only.
    Assignable,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DetectorOptions {
    /// Report a concrete target type replaced by `any` or `unknown`.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub concrete_type_to_any_as_breaking_change: bool,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub required_to_optional_as_breaking_change: bool,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub optional_to_required_as_breaking_change: bool,
    pub type_relation: TypeRelationMode,
    /// Interface whose call signatures form the route table.
    pub routes_interface_name: String,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        DetectorOptions {
            concrete_type_to_any_as_breaking_change: false,
            required_to_optional_as_breaking_change: true,
            optional_to_required_as_breaking_change: true,
            type_relation: TypeRelationMode::Equivalent,
            routes_interface_name: "Routes".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid detector options: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorOptions {
    pub fn from_json_str(text: &str) -> Result<DetectorOptions, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn relation_options(&self) -> RelationOptions {
        RelationOptions {
            concrete_to_any_is_change: self.concrete_type_to_any_as_breaking_change,
        }
    }
}
