//! Directory search model
//!
//! Strongly-typed view of a directory search response. The protocol client
//! decodes its wire representation into these types once; modules only do
//! typed map lookups against them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{MalformedEntry, Result};

/// A single attribute value as decoded by the protocol client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// UTF-8 textual value
    Text(String),
    /// Value that did not decode as UTF-8
    Binary(Vec<u8>),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(b: Vec<u8>) -> Self {
        AttributeValue::Binary(b)
    }
}

/// One object returned by a directory search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Distinguished name of the object
    pub dn: String,
    /// Attribute name to its ordered values
    pub attributes: HashMap<String, Vec<AttributeValue>>,
}

impl Entry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute insertion; replaces any previous values.
    pub fn with_attr<V>(mut self, name: &str, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<AttributeValue>,
    {
        self.attributes
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// All values of an attribute, if the attribute is present
    pub fn values(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// First value of an attribute as text.
    ///
    /// `Ok(None)` means the attribute is absent. A present attribute with no
    /// values, or whose first value is binary, is reported as malformed.
    pub fn first_text(&self, name: &str) -> std::result::Result<Option<&str>, MalformedEntry> {
        let Some(values) = self.values(name) else {
            return Ok(None);
        };
        match values.first() {
            None => Err(MalformedEntry::EmptyValues {
                attribute: name.to_string(),
            }),
            Some(AttributeValue::Text(s)) => Ok(Some(s.as_str())),
            Some(AttributeValue::Binary(b)) => Err(MalformedEntry::BinaryValue {
                attribute: name.to_string(),
                len: b.len(),
            }),
        }
    }
}

/// One item of a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchItem {
    /// A directory entry
    Entry(Entry),
    /// A search continuation reference with its URLs
    Referral(Vec<String>),
    /// An intermediate response message
    Intermediate,
}

impl SearchItem {
    /// The entry carried by this item, if any
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            SearchItem::Entry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Entry> for SearchItem {
    fn from(entry: Entry) -> Self {
        SearchItem::Entry(entry)
    }
}

/// A live, already-authenticated directory connection.
///
/// Implementations own the protocol details (framing, decoding, retries,
/// timeouts). Failures are returned as `DirectoryError`.
pub trait DirectoryConnection {
    /// Run one search and return its decoded items in server order
    fn search(&mut self, filter: &str, attributes: &[&str]) -> Result<Vec<SearchItem>>;
}

impl<T: DirectoryConnection + ?Sized> DirectoryConnection for &mut T {
    fn search(&mut self, filter: &str, attributes: &[&str]) -> Result<Vec<SearchItem>> {
        (**self).search(filter, attributes)
    }
}

impl<T: DirectoryConnection + ?Sized> DirectoryConnection for Box<T> {
    fn search(&mut self, filter: &str, attributes: &[&str]) -> Result<Vec<SearchItem>> {
        (**self).search(filter, attributes)
    }
}
