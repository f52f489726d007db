//! Minimal JSON:API document model.
//!
//! Only the parts the option normalizer reads are typed: resource
//! identity, raw attributes and relationship linkage. Links, meta and
//! anything else in the payload are ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub data: PrimaryData,
    #[serde(default)]
    pub included: Vec<Resource>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Resource),
    Many(Vec<Resource>),
    #[default]
    None,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Relationship {
    #[serde(default)]
    pub data: RelationshipData,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
    #[default]
    None,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

/// Access to the `included` side table of a response.
pub trait IncludedLookup {
    fn find_included(&self, resource_type: &str, id: &str) -> Option<&Resource>;
}

impl IncludedLookup for [Resource] {
    fn find_included(&self, resource_type: &str, id: &str) -> Option<&Resource> {
        self.iter()
            .find(|resource| resource.resource_type == resource_type && resource.id == id)
    }
}

impl IncludedLookup for Document {
    fn find_included(&self, resource_type: &str, id: &str) -> Option<&Resource> {
        self.included.as_slice().find_included(resource_type, id)
    }
}

impl Document {
    #[must_use]
    pub fn primary_resources(&self) -> Vec<&Resource> {
        match &self.data {
            PrimaryData::One(resource) => vec![resource],
            PrimaryData::Many(resources) => resources.iter().collect(),
            PrimaryData::None => Vec::new(),
        }
    }
}

impl RelationshipData {
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            RelationshipData::One(identifier) => std::slice::from_ref(identifier),
            RelationshipData::Many(identifiers) => identifiers.as_slice(),
            RelationshipData::None => &[],
        }
    }
}

impl Resource {
    /// Returns a string attribute, failing if it is absent or not a string.
    pub fn attribute_str(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingAttribute {
                resource_type: self.resource_type.clone(),
                id: self.id.clone(),
                attribute: name.to_owned(),
            })
    }

    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// Returns the linkage of a to-one relationship.
    pub fn relationship_identifier(&self, name: &str) -> Result<&ResourceIdentifier> {
        match self.relationship(name).map(|relationship| &relationship.data) {
            Some(RelationshipData::One(identifier)) => Ok(identifier),
            _ => Err(Error::MissingRelationship {
                resource_type: self.resource_type.clone(),
                id: self.id.clone(),
                relationship: name.to_owned(),
            }),
        }
    }
}

/// Resolves every resource linked from `resource` through `relationship`.
///
/// Works for both to-one and to-many linkage. Identifiers missing from the
/// side table are skipped.
pub fn find_included_of_type<'a, L>(
    lookup: &'a L,
    resource: &Resource,
    relationship: &str,
) -> Vec<&'a Resource>
where
    L: IncludedLookup + ?Sized,
{
    let Some(linkage) = resource.relationship(relationship) else {
        return Vec::new();
    };

    linkage
        .data
        .identifiers()
        .iter()
        .filter_map(|identifier| {
            let found = lookup.find_included(&identifier.resource_type, &identifier.id);
            if found.is_none() {
                tracing::warn!(
                    owner = %resource.id,
                    relationship,
                    resource_type = %identifier.resource_type,
                    id = %identifier.id,
                    "linked resource missing from included"
                );
            }
            found
        })
        .collect()
}
