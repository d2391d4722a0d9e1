use crate::tezos::AccountId;
use serde_json::Value;

/// Decoded contract storage value.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    /// `int`, `nat`, `mutez` and numeric timestamps, kept as decimal text.
    Int(String),
    String(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Unit,
    Address(AccountId),
    Option(Option<Box<StorageValue>>),
    List(Vec<StorageValue>),
    Map(Vec<(StorageValue, StorageValue)>),
    Record(StorageMapping),
    /// Anything the decoder does not model (lambdas, tickets, ...).
    Opaque(Value),
}

impl StorageValue {
    pub fn as_record(&self) -> Option<&StorageMapping> {
        match self {
            Self::Record(mapping) => Some(mapping),
            _ => None,
        }
    }
}

/// Field name to value, in storage declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageMapping {
    fields: Vec<(String, StorageValue)>,
}

impl StorageMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&StorageValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: StorageValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, StorageValue)> for StorageMapping {
    fn from_iter<I: IntoIterator<Item = (K, StorageValue)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, value) in iter {
            mapping.insert(name, value);
        }
        mapping
    }
}
