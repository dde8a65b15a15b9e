// ABOUTME: Extraction output types: per-field values and the field-name keyed result map.
// ABOUTME: Serializes to plain JSON (string, null or array of strings per field).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value extracted for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Result of a single-valued rule; `None` serializes as `null`.
    Single(Option<String>),
    /// Result of a multi-valued rule, possibly empty.
    Multi(Vec<String>),
}

impl FieldValue {
    /// The empty form for a rule of the given cardinality.
    pub fn empty(multi: bool) -> Self {
        if multi {
            FieldValue::Multi(Vec::new())
        } else {
            FieldValue::Single(None)
        }
    }

    /// Resolves normalized values to the rule's cardinality: all of them, or the first.
    pub fn from_values(values: Vec<String>, multi: bool) -> Self {
        if multi {
            FieldValue::Multi(values)
        } else {
            FieldValue::Single(values.into_iter().next())
        }
    }

    /// The single value, if this is a single-valued result that found something.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(v) => v.as_deref(),
            FieldValue::Multi(_) => None,
        }
    }

    /// The values of a multi-valued result.
    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            FieldValue::Multi(v) => Some(v),
            FieldValue::Single(_) => None,
        }
    }

    /// Returns true for `null` and `[]`.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(v) => v.is_none(),
            FieldValue::Multi(v) => v.is_empty(),
        }
    }
}

/// Field name to extracted value, one entry per rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: BTreeMap<String, FieldValue>,
}

impl ExtractionResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Removes a field from the result.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Looks up the value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the result has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for ExtractionResult {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
