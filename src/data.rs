use std::collections::BTreeMap;
use std::collections::btree_map;

use strum::IntoEnumIterator;

use crate::error::Error;
use crate::keyword::{Keyword, MESSAGE_KEY, TYPE_KEY};
use crate::value::Value;

/// The two keys every payload must bind to a non-nil value.
///
/// Declaration order is validation order: a payload missing both keys is
/// reported as missing `message`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ReservedKey {
    Message,
    Type,
}

impl ReservedKey {
    pub fn keyword(self) -> Keyword {
        match self {
            Self::Message => MESSAGE_KEY,
            Self::Type => TYPE_KEY,
        }
    }
}

/// Open key/value payload describing one failure.
///
/// Mutable only while the raiser still owns it. Once handed to
/// [`StructuredError`](crate::StructuredError) it is exposed by shared
/// reference only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorData {
    entries: BTreeMap<Keyword, Value>,
}

impl ErrorData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload holding just the two mandatory keys.
    pub fn from_message(error_type: impl Into<Value>, message: impl Into<Value>) -> Self {
        Self::new()
            .with(TYPE_KEY, error_type)
            .with(MESSAGE_KEY, message)
    }

    pub fn with(mut self, key: Keyword, value: impl Into<Value>) -> Self {
        self.entries.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: Keyword, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key, value.into())
    }

    pub fn get(&self, key: &Keyword) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Textual form of the value at `key`, `None` when absent or nil.
    pub fn get_str(&self, key: &Keyword) -> Option<String> {
        self.get(key)
            .filter(|v| !v.is_nil())
            .map(ToString::to_string)
    }

    /// True when `key` is bound to a non-nil value.
    pub fn contains_key(&self, key: &Keyword) -> bool {
        self.get(key).is_some_and(|v| !v.is_nil())
    }

    /// Reserved keys that are absent or nil, in validation order.
    pub fn missing_reserved(&self) -> Vec<ReservedKey> {
        ReservedKey::iter()
            .filter(|key| !self.contains_key(&key.keyword()))
            .collect()
    }

    pub fn require(&self, key: ReservedKey) -> Result<String, Error> {
        let keyword = key.keyword();
        self.get_str(&keyword)
            .ok_or_else(|| Error::InvalidPayload { key: keyword })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Keyword, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, Keyword, Value> {
        self.entries.keys()
    }

    pub(crate) fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
            .collect()
    }

    pub(crate) fn from_json(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        obj.into_iter()
            .map(|(k, v)| (Keyword::from_encoded(&k), Value::from(v)))
            .collect()
    }
}

impl FromIterator<(Keyword, Value)> for ErrorData {
    fn from_iter<I: IntoIterator<Item = (Keyword, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ErrorData {
    type Item = (Keyword, Value);
    type IntoIter = btree_map::IntoIter<Keyword, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorData {
    type Item = (&'a Keyword, &'a Value);
    type IntoIter = btree_map::Iter<'a, Keyword, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
