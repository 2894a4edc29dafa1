//! Request-body assembly for variable group writes.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::types::{ProjectRef, VariableValue};

/// Desired state of one variable group, normalized and ready for the wire.
///
/// Built from a validated definition; carries no remote identity. The same
/// payload serves create and update, with update embedding the resolved id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPayload {
    /// Group name, the matching key.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Provider tag, `Vsts` for service-stored variables.
    pub group_type: String,
    /// Variables in canonical wire shape.
    pub variables: BTreeMap<String, VariableValue>,
}

impl GroupPayload {
    /// Request body for creating the group in the given project.
    #[must_use]
    pub fn create_body(&self, project: &ProjectRef) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "type": self.group_type,
            "variables": self.variables,
            "variableGroupProjectReferences": [{
                "name": self.name,
                "projectReference": {
                    "id": project.id,
                    "name": project.name,
                },
            }],
        })
    }

    /// Request body for replacing the group with the given remote id.
    ///
    /// Update is a full-object replace; nothing from the remote copy is
    /// merged in.
    #[must_use]
    pub fn update_body(&self, project: &ProjectRef, id: u64) -> Value {
        let mut body = self.create_body(project);
        body["id"] = json!(id);
        body
    }
}
