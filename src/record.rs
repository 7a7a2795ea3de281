//! The record layout of the single table.
//!
//! Every item carries a primary key pair (`ppk`, `psk`), an optional secondary
//! key pair (`spk`, `ssk`) feeding the secondary index, an optional
//! `isDeleted` flag and the caller's own attributes, flattened alongside.

use serde::{Deserialize, Deserializer, Serialize, de};

/// A stored record with the default attribute names.
///
/// Absent optional attributes are left out of the item entirely, which keeps
/// records without `spk` out of the (sparse) secondary index.
///
/// ```rust
/// use dynamodb_single_table::record::Record;
/// use serde_json::json;
///
/// let order = Record::new("USER#1", "ORDER#7", json!({"total": 42}))
///     .with_secondary_keys("ORDER", "2024-05-01");
/// assert_eq!(order.spk.as_deref(), Some("ORDER"));
/// assert!(!order.is_deleted());
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record<T> {
    /// Primary partition key.
    pub ppk: String,
    /// Primary sort key.
    pub psk: String,
    /// Secondary partition key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spk: Option<String>,
    /// Secondary sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssk: Option<String>,
    /// Soft-delete flag.
    ///
    /// A stored value that is not a boolean decodes as `None`, keeping the record visible.
    #[serde(
        default,
        deserialize_with = "deleted_flag",
        rename = "isDeleted",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_deleted: Option<bool>,
    /// The caller's attributes.
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Record<T> {
    /// A live record with only the primary keys set.
    pub fn new(ppk: impl Into<String>, psk: impl Into<String>, payload: T) -> Self {
        Self {
            ppk: ppk.into(),
            psk: psk.into(),
            spk: None,
            ssk: None,
            is_deleted: None,
            payload,
        }
    }

    /// Place the record in the secondary index.
    pub fn with_secondary_keys(mut self, spk: impl Into<String>, ssk: impl Into<String>) -> Self {
        self.spk = Some(spk.into());
        self.ssk = Some(ssk.into());
        self
    }

    /// Whether the record is flagged as soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted == Some(true)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeletedFlag {
    Bool(bool),
    Other(de::IgnoredAny),
}

fn deleted_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<DeletedFlag>::deserialize(deserializer)? {
        Some(DeletedFlag::Bool(deleted)) => Ok(Some(deleted)),
        Some(DeletedFlag::Other(de::IgnoredAny)) | None => Ok(None),
    }
}
