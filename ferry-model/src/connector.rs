use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{DefinitionId, InstanceId};

/// Which side of a sync a connector sits on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorRole {
    Source,
    Destination,
}

impl ConnectorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorRole::Source => "source",
            ConnectorRole::Destination => "destination",
        }
    }
}

impl fmt::Display for ConnectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry describing a connector type and its container image coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDefinition {
    pub id: DefinitionId,
    pub role: ConnectorRole,
    pub name: String,
    pub docker_repository: String,
    pub docker_image_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

/// A configured occurrence of a connector definition.
///
/// Persisted instances carry `id`; transient instances (built from a creation
/// request or a merged update) leave it `None` and never gain one while they
/// travel through a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<InstanceId>,
    pub role: ConnectorRole,
    pub definition_id: DefinitionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub configuration: Value,
}

impl ConnectorInstance {
    pub fn persisted(
        id: InstanceId,
        role: ConnectorRole,
        definition_id: DefinitionId,
        name: impl Into<String>,
        configuration: Value,
    ) -> Self {
        Self {
            id: Some(id),
            role,
            definition_id,
            name: Some(name.into()),
            configuration,
        }
    }

    pub fn transient(
        role: ConnectorRole,
        definition_id: DefinitionId,
        configuration: Value,
    ) -> Self {
        Self {
            id: None,
            role,
            definition_id,
            name: None,
            configuration,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }
}

/// Declared specification of a connector image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpecification {
    pub documentation_url: String,
    pub connection_specification: Value,
}

impl ConnectorSpecification {
    /// Top-level property names whose schema carries `"airbyte_secret": true`.
    pub fn secret_properties(&self) -> Vec<&str> {
        self.connection_specification
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .filter(|(_, schema)| {
                        schema
                            .get("airbyte_secret")
                            .and_then(Value::as_bool)
                            .unwrap_or(false)
                    })
                    .map(|(name, _)| name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
