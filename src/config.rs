//! Table layout configuration.

use crate::read;

use serde::Deserialize;

/// Name and key layout of the single table.
///
/// Every field has a default, so a config file only needs to name what
/// differs from the standard layout:
///
/// ```rust
/// use dynamodb_single_table::config::TableConfig;
///
/// let config: TableConfig = serde_json::from_str(r#"{"table_name": "app"}"#).unwrap();
/// assert_eq!(config.partition_key, "ppk");
/// assert_eq!(config.index_name, "gsi");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    /// Whether primary-key reads are strongly consistent.
    ///
    /// Secondary index queries always read eventually consistent.
    pub consistent_read: Option<bool>,
    /// Attribute holding the soft-delete flag.
    pub deleted_attribute: String,
    /// Name of the secondary index.
    pub index_name: String,
    /// Partition key attribute of the secondary index.
    pub index_partition_key: String,
    /// Sort key attribute of the secondary index.
    pub index_sort_key: String,
    /// Primary partition key attribute.
    pub partition_key: String,
    /// Primary sort key attribute.
    pub sort_key: String,
    /// Name of the table.
    pub table_name: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            consistent_read: None,
            deleted_attribute: read::soft_delete::DEFAULT_DELETED_ATTRIBUTE.to_string(),
            index_name: "gsi".to_string(),
            index_partition_key: "spk".to_string(),
            index_sort_key: "ssk".to_string(),
            partition_key: "ppk".to_string(),
            sort_key: "psk".to_string(),
            table_name: String::new(),
        }
    }
}

impl TableConfig {
    /// Standard layout for `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }
}
