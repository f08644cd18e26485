use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::StructuralError;

/// A node of a parsed XML document, attributes removed
///
/// Elements holding only text become `Text`, elements with children become
/// `Map`, and a child element repeated under the same parent becomes `List`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum RawNode {
    Text(String),
    List(Vec<RawNode>),
    Map(RawFields),
}

impl RawNode {
    /// Text content, if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Empty text is the only value the source format treats as "nothing"
    pub fn is_blank(&self) -> bool {
        matches!(self, RawNode::Text(text) if text.is_empty())
    }

    /// View as an object; an empty element (`<x/>`) counts as an empty object
    pub fn into_fields(self) -> Option<RawFields> {
        match self {
            RawNode::Map(fields) => Some(fields),
            RawNode::Text(text) if text.is_empty() => Some(RawFields::new()),
            _ => None,
        }
    }

    /// Coerce to a list, dropping blank entries
    pub fn into_list(self) -> Vec<RawNode> {
        let items = match self {
            RawNode::List(items) => items,
            other => vec![other],
        };
        items.into_iter().filter(|item| !item.is_blank()).collect()
    }
}

/// An ordered bag of raw fields that is consumed as it is normalized
///
/// Every `take_*` call removes the field. Once an entity has taken
/// everything it understands, `ensure_exhausted` reports whatever is left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    entries: Vec<(String, RawNode)>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawNode)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&RawNode> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Set a field, replacing any previous value in place
    pub fn insert(&mut self, key: impl Into<String>, value: RawNode) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Add a child element; a repeated name turns the field into a list
    pub fn push_child(&mut self, key: impl Into<String>, value: RawNode) {
        let key = key.into();
        let Some(i) = self.position(&key) else {
            self.entries.push((key, value));
            return;
        };
        let slot = &mut self.entries[i].1;
        match slot {
            RawNode::List(items) => items.push(value),
            other => {
                let first = std::mem::replace(other, RawNode::List(Vec::new()));
                *other = RawNode::List(vec![first, value]);
            }
        }
    }

    /// Consume a field whatever its shape
    pub fn take(&mut self, key: &str) -> Option<RawNode> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Consume the first field in source order
    pub fn take_first(&mut self) -> Option<(String, RawNode)> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    /// Consume a text field; a field of another shape is left in place so
    /// the exhaustion check reports it
    pub fn take_text(&mut self, key: &str) -> Option<String> {
        if !matches!(self.get(key), Some(RawNode::Text(_))) {
            return None;
        }
        match self.take(key) {
            Some(RawNode::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Consume an object field (an empty element counts as an empty object)
    pub fn take_fields(&mut self, key: &str) -> Option<RawFields> {
        let is_object = match self.get(key)? {
            RawNode::Map(_) => true,
            RawNode::Text(text) => text.is_empty(),
            RawNode::List(_) => false,
        };
        if !is_object {
            return None;
        }
        self.take(key).and_then(RawNode::into_fields)
    }

    /// Consume a scalar-or-list field as a list with blank entries removed
    pub fn take_list(&mut self, key: &str) -> Option<Vec<RawNode>> {
        self.take(key).map(RawNode::into_list)
    }

    /// Consume a scalar-or-list field of texts; a field holding any other
    /// shape is left in place so the exhaustion check reports it
    pub fn take_text_list(&mut self, key: &str) -> Option<Vec<String>> {
        if !self.holds_only(key, |item| matches!(item, RawNode::Text(_))) {
            return None;
        }
        self.take_list(key).map(|items| {
            items
                .into_iter()
                .filter_map(|item| match item {
                    RawNode::Text(text) => Some(text),
                    _ => None,
                })
                .collect()
        })
    }

    /// Consume a scalar-or-list field of objects; a field holding any other
    /// shape is left in place so the exhaustion check reports it
    pub fn take_fields_list(&mut self, key: &str) -> Option<Vec<RawFields>> {
        if !self.holds_only(key, |item| matches!(item, RawNode::Map(_))) {
            return None;
        }
        self.take_list(key)
            .map(|items| items.into_iter().filter_map(RawNode::into_fields).collect())
    }

    /// Whether every non-blank entry of a scalar-or-list field passes `accept`
    fn holds_only(&self, key: &str, accept: impl Fn(&RawNode) -> bool) -> bool {
        let entries = match self.get(key) {
            Some(RawNode::List(items)) => items.iter().collect::<Vec<_>>(),
            Some(node) => vec![node],
            None => return false,
        };
        entries
            .into_iter()
            .filter(|item| !item.is_blank())
            .all(accept)
    }

    /// Move the value found under any legacy key onto `canonical`
    pub fn rename(&mut self, legacy: &[&str], canonical: &str) {
        for key in legacy {
            if let Some(value) = self.take(key) {
                self.insert(canonical, value);
            }
        }
    }

    /// Move the listed keys, when present, into `dest`
    pub fn relocate(&mut self, dest: &mut RawFields, keys: &[&str]) {
        for key in keys {
            if let Some(value) = self.take(key) {
                dest.insert(*key, value);
            }
        }
    }

    /// Shallow merge: fields of `other` overwrite fields of the same name
    pub fn merge(&mut self, other: RawFields) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Fail with the leftover key names if anything was not consumed
    pub fn ensure_exhausted(&self, context: &str) -> Result<(), StructuralError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(StructuralError {
            context: context.to_string(),
            keys: self.keys().map(str::to_string).collect(),
        })
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl FromIterator<(String, RawNode)> for RawFields {
    fn from_iter<I: IntoIterator<Item = (String, RawNode)>>(iter: I) -> Self {
        let mut fields = RawFields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl Serialize for RawFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
