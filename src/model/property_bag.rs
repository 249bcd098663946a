//! Extension property container.
//!
//! Extension properties carry data that is not part of an entity's fixed
//! schema. The container is an ordered list of `(key, value)` pairs: keys are
//! case-sensitive, duplicates are tolerated, and every lookup resolves to the
//! first match.

use serde::{Deserialize, Serialize};

/// A named configuration parameter attached to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationParameter {
    pub name: String,
    pub value: String,
}

/// Value of an extension property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Parameters(Vec<ConfigurationParameter>),
}

impl PropertyValue {
    /// String payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Vec<ConfigurationParameter>> for PropertyValue {
    fn from(value: Vec<ConfigurationParameter>) -> Self {
        PropertyValue::Parameters(value)
    }
}

/// A single `(key, value)` extension property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

/// Ordered extension property bag.
///
/// Not synchronised. Entities shared across requests wrap their bag in
/// [`Shared`](super::Shared) and go through the enrichment guard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    properties: Vec<Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first property whose key matches exactly.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// Value of the first property whose key matches ignoring ASCII case.
    pub fn get_ignore_case(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .map(|p| &p.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key` to `value`.
    ///
    /// Overwrites the first matching property in place, or appends a new one
    /// when the key is absent. Callers that must not overwrite check
    /// [`contains`](Self::contains) first.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.properties.push(Property { key, value }),
        }
    }

    /// Append a property without looking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.push(Property {
            key: key.into(),
            value: value.into(),
        });
    }

    /// String value of the first match, or `""` when absent or not a string.
    pub fn string_or_empty(&self, key: &str) -> &str {
        self.get(key).and_then(PropertyValue::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Number of properties stored under exactly `key`.
    pub fn count(&self, key: &str) -> usize {
        self.properties.iter().filter(|p| p.key == key).count()
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(key, value)| Property { key, value })
                .collect(),
        }
    }
}
