//! Object identity and lightweight references.
//!
//! Every FDM configuration object carries the same four identity fields. They
//! live in [`ObjectMeta`], which resource records embed with `#[serde(flatten)]`.
//! A [`Reference`] is the pointer form of an object used inside other objects
//! (group members, rule field lists); it is a snapshot and is never updated
//! when the object it was taken from changes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity fields shared by every configuration object.
///
/// `id` and `version` are assigned by the appliance and stay empty until the
/// object has been created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Server-assigned version, bumped on every change.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Object name, unique per type.
    #[serde(default)]
    pub name: String,
    /// Type tag (e.g. `networkobject`).
    #[serde(rename = "type", default)]
    pub type_tag: String,
}

impl ObjectMeta {
    /// Metadata for a not-yet-created object.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True once the appliance has assigned an identifier.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Immutable pointer to a configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    version: String,
    name: String,
    #[serde(rename = "type")]
    type_tag: String,
}

impl Reference {
    /// Build a reference from its parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        type_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    /// Identifier of the referenced object.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the referenced object.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version of the referenced object at projection time.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Type tag of the referenced object.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }
}

impl From<&ObjectMeta> for Reference {
    fn from(meta: &ObjectMeta) -> Self {
        Self::new(
            meta.id.clone(),
            meta.name.clone(),
            meta.version.clone(),
            meta.type_tag.clone(),
        )
    }
}

/// A configuration object managed through the FDM API.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Identity fields.
    fn meta(&self) -> &ObjectMeta;

    /// Mutable identity fields.
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Copy the type-specific value fields from `source` onto `self`.
    ///
    /// Implementations must leave [`ObjectMeta`] untouched.
    fn overlay_domain_fields(&mut self, source: &Self);

    /// Pointer form of this object.
    fn reference(&self) -> Reference {
        project(self)
    }
}

/// Project any resource into its [`Reference`].
#[must_use]
pub fn project<R: Resource>(resource: &R) -> Reference {
    Reference::from(resource.meta())
}
