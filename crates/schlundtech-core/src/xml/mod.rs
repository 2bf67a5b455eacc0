//! Gateway XML values and codec
//!
//! The gateway speaks a restricted XML dialect: no attributes, no mixed
//! content, just elements that hold either text or further elements.
//! [`XmlValue`] models exactly that shape:
//!
//! - [`XmlValue::Text`]: an element with scalar text
//! - [`XmlValue::List`]: repeated same-named sibling elements
//! - [`XmlValue::Map`]: an element with child elements, in document order
//!
//! See [`decode`] and [`encode`] for the wire mapping.

mod codec;

pub use codec::{decode, encode};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A value in the gateway's XML dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Scalar element text
    Text(String),
    /// Repeated sibling elements sharing one tag
    List(Vec<XmlValue>),
    /// Nested child elements
    Map(XmlMap),
}

impl XmlValue {
    /// Borrow the scalar text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the nested mapping, if this is a map value
    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// View the value as a sequence of items
    ///
    /// A single element decodes to a scalar or map rather than a one-item
    /// list, so callers reading "zero or more" elements should go through
    /// this instead of matching on [`XmlValue::List`].
    pub fn items(&self) -> &[XmlValue] {
        match self {
            XmlValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        XmlValue::Text(text.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(text: String) -> Self {
        XmlValue::Text(text)
    }
}

impl From<u32> for XmlValue {
    fn from(number: u32) -> Self {
        XmlValue::Text(number.to_string())
    }
}

impl From<XmlMap> for XmlValue {
    fn from(map: XmlMap) -> Self {
        XmlValue::Map(map)
    }
}

impl From<Vec<XmlValue>> for XmlValue {
    fn from(items: Vec<XmlValue>) -> Self {
        XmlValue::List(items)
    }
}

impl Serialize for XmlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            XmlValue::Text(text) => serializer.serialize_str(text),
            XmlValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            XmlValue::Map(map) => map.serialize(serializer),
        }
    }
}

/// Insertion-ordered mapping of element names to values
///
/// Order is significant: the gateway may reject requests whose elements
/// appear out of sequence, so encoding always follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlMap {
    entries: Vec<(String, XmlValue)>,
}

impl XmlMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<XmlValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing (in place) any value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<XmlValue>) -> Option<XmlValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Get the scalar text stored under `key`
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(XmlValue::as_text)
    }

    /// Get the nested mapping stored under `key`
    pub fn get_map(&self, key: &str) -> Option<&XmlMap> {
        self.get(key).and_then(XmlValue::as_map)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Add a decoded child element; a repeated name turns into a list
    pub(crate) fn append_child(&mut self, key: String, value: XmlValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, XmlValue::List(items))) => items.push(value),
            Some((_, slot)) => {
                let first = std::mem::replace(slot, XmlValue::List(Vec::with_capacity(2)));
                if let XmlValue::List(items) = slot {
                    items.push(first);
                    items.push(value);
                }
            }
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for XmlMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
