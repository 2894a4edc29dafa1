use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use adokit::{GroupPayload, VariableValue};

/// Provider tag for service-stored variable groups.
pub const DEFAULT_GROUP_TYPE: &str = "Vsts";

fn default_group_type() -> String {
    DEFAULT_GROUP_TYPE.to_string()
}

// ============================================================================
// Definition Schema
// ============================================================================

/// One variable as it appears in a definition file.
///
/// Authors can write a bare string for the common case or a structured
/// descriptor when flags matter. Flags the author never wrote stay unset
/// rather than defaulting to false, since the wire distinguishes the two.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    /// Bare value with default flags.
    Plain(String),
    /// Structured descriptor.
    Detailed {
        value: Option<String>,
        #[serde(rename = "isSecret")]
        is_secret: Option<bool>,
        #[serde(rename = "isReadOnly")]
        is_read_only: Option<bool>,
    },
}

/// Desired state of one variable group, loaded from one JSON file.
///
/// Immutable once loaded; `name` is the sole key used to match remote state.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableGroupDefinition {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type", default = "default_group_type")]
    pub group_type: String,

    #[serde(default)]
    pub variables: BTreeMap<String, VariableSpec>,
}

impl VariableGroupDefinition {
    /// Load a definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read definition file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON definition: {}", path.display()))
    }

    /// Validate the definition before any remote call.
    pub fn validate(&self) -> adokit::Result<()> {
        if self.name.trim().is_empty() {
            return Err(adokit::Error::validation(
                "definition is missing a group name",
            ));
        }
        Ok(())
    }

    /// Validate and normalize into a wire-ready payload.
    pub fn to_payload(&self) -> adokit::Result<GroupPayload> {
        self.validate()?;
        Ok(GroupPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            group_type: self.group_type.clone(),
            variables: normalize_variables(&self.variables)?,
        })
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize raw variable specs into the canonical wire shape.
///
/// A bare string becomes a value-only entry. A structured entry must carry a
/// value; its flags pass through only when explicitly present.
pub fn normalize_variables(
    variables: &BTreeMap<String, VariableSpec>,
) -> adokit::Result<BTreeMap<String, VariableValue>> {
    let mut normalized = BTreeMap::new();
    for (name, spec) in variables {
        let value = match spec {
            VariableSpec::Plain(value) => VariableValue::plain(value.clone()),
            VariableSpec::Detailed {
                value,
                is_secret,
                is_read_only,
            } => {
                let value = value.clone().ok_or_else(|| {
                    adokit::Error::validation(format!("variable '{name}' is missing a value"))
                })?;
                VariableValue {
                    value,
                    is_secret: *is_secret,
                    is_read_only: *is_read_only,
                }
            }
        };
        normalized.insert(name.clone(), value);
    }
    Ok(normalized)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VariableGroupDefinition {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bare_string_normalizes_to_value_only() {
        let def = parse(r#"{ "name": "g", "variables": { "X": "v" } }"#);
        let normalized = normalize_variables(&def.variables).unwrap();
        assert_eq!(normalized["X"], VariableValue::plain("v"));
        assert_eq!(normalized["X"].is_secret, None);
        assert_eq!(normalized["X"].is_read_only, None);
    }

    #[test]
    fn test_explicit_secret_preserved_read_only_omitted() {
        let def = parse(
            r#"{ "name": "g", "variables": { "X": { "value": "v", "isSecret": true } } }"#,
        );
        let normalized = normalize_variables(&def.variables).unwrap();
        assert_eq!(normalized["X"].value, "v");
        assert_eq!(normalized["X"].is_secret, Some(true));
        assert_eq!(normalized["X"].is_read_only, None);
    }

    #[test]
    fn test_detailed_entry_missing_value_fails() {
        let def = parse(r#"{ "name": "g", "variables": { "X": { "isSecret": true } } }"#);
        let err = normalize_variables(&def.variables).unwrap_err();
        assert!(matches!(err, adokit::Error::Validation(_)));
        assert!(format!("{err}").contains("'X'"));
    }

    #[test]
    fn test_group_type_defaults_to_provider_tag() {
        let def = parse(r#"{ "name": "g" }"#);
        assert_eq!(def.group_type, "Vsts");

        let custom = parse(r#"{ "name": "g", "type": "AzureKeyVault" }"#);
        assert_eq!(custom.group_type, "AzureKeyVault");
    }

    #[test]
    fn test_validate_rejects_missing_name() {
        let def = parse(r#"{ "description": "no name here" }"#);
        assert!(def.validate().is_err());
        assert!(def.to_payload().is_err());
    }

    #[test]
    fn test_to_payload_carries_everything() {
        let def = parse(
            r#"{
                "name": "release-vars",
                "description": "Release settings",
                "variables": {
                    "REGION": "eu-west-1",
                    "API_KEY": { "value": "k", "isSecret": true, "isReadOnly": true }
                }
            }"#,
        );
        let payload = def.to_payload().unwrap();
        assert_eq!(payload.name, "release-vars");
        assert_eq!(payload.description, "Release settings");
        assert_eq!(payload.group_type, "Vsts");
        assert_eq!(payload.variables.len(), 2);
        assert_eq!(payload.variables["API_KEY"].is_read_only, Some(true));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.json");
        std::fs::write(&path, r#"{ "name": "g", "variables": { "X": "v" } }"#).unwrap();

        let def = VariableGroupDefinition::load(&path).unwrap();
        assert_eq!(def.name, "g");

        let missing = VariableGroupDefinition::load(&dir.path().join("absent.json"));
        assert!(missing.is_err());
    }
}
