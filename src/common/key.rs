use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// A named key attribute and its value.
///
/// ```rust
/// use dynamodb_single_table::common::key;
///
/// let key = key::Key::new("ppk", "USER#1");
/// assert_eq!(key.name, "ppk");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T> Key<T> {
    /// Bind a value to a key attribute name.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Primary key of an item: partition key and optional sort key.
///
/// ```rust
/// use dynamodb_single_table::common::key;
///
/// let keys = key::Keys {
///     partition_key: key::Key::new("ppk", "USER#1"),
///     sort_key: Some(key::Key::new("psk", "PROFILE")),
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition key.
    pub partition_key: Key<T>,
    /// The sort key, for tables with a composite primary key.
    pub sort_key: Option<Key<T>>,
}

impl<T: Serialize> TryFrom<Keys<T>> for collections::HashMap<String, types::AttributeValue> {
    type Error = Error;

    fn try_from(keys: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(keys.partition_key.value)?;
        let mut map = Self::from([(keys.partition_key.name, partition_key_value)]);
        if let Some(sort_key) = keys.sort_key {
            map.insert(sort_key.name, to_attribute_value(sort_key.value)?);
        }
        Ok(map)
    }
}
