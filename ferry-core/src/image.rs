//! Canonical `repository:tag` image references.

use std::fmt;

use ferry_model::ConnectorDefinition;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// Wraps an already composed `repository:tag` string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn tagged_image_name(repository: &str, tag: &str) -> ImageReference {
    ImageReference(format!("{repository}:{tag}"))
}

pub fn image_for(definition: &ConnectorDefinition) -> ImageReference {
    tagged_image_name(&definition.docker_repository, &definition.docker_image_tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_repository_and_tag() {
        let first = tagged_image_name("airbyte/source-foo", "0.1.0");
        let second = tagged_image_name("airbyte/source-foo", "0.1.0");
        assert_eq!(first.as_str(), "airbyte/source-foo:0.1.0");
        assert_eq!(first, second);
    }

    #[test]
    fn keeps_registry_ports_intact() {
        let image = tagged_image_name("registry.local:5000/source-pg", "dev");
        assert_eq!(image.to_string(), "registry.local:5000/source-pg:dev");
    }
}
