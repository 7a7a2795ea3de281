//! The single-table facade.
//!
//! [`Table`] pairs an SDK client with a [`TableConfig`] and turns key values
//! into the requests of [`crate::read`] and [`crate::write`]. The builder
//! methods (`put_item`, `get_item`, `query_primary`, ...) only assemble the
//! request so callers can adjust it before sending. The async methods send
//! it, hide soft-deleted records and deserialize what is left.

use crate::{common, config::TableConfig, error::Result, read, write};

use aws_sdk_dynamodb::{Client, types};
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::{from_item, from_items};
use std::collections;

type Item = collections::HashMap<String, types::AttributeValue>;

/// A DynamoDB table laid out for single-table access.
///
/// ```rust,no_run
/// use dynamodb_single_table::{Record, Table, TableConfig, common::condition::Condition};
/// use serde_json::{Value, json};
///
/// # async fn example() -> dynamodb_single_table::Result<()> {
/// let table = Table::from_env(TableConfig::new("app")).await;
/// let order = Record::new("USER#1", "ORDER#7", json!({"total": 42}))
///     .with_secondary_keys("ORDER", "2024-05-01");
/// table.put(order).await?;
/// let orders: Vec<Record<Value>> = table
///     .query("USER#1", Some(Condition::BeginsWith("ORDER#".to_string())))
///     .await?;
/// table.soft_delete("USER#1", "ORDER#7").await?;
/// let order: Option<Record<Value>> = table.get("USER#1", "ORDER#7").await?;
/// assert!(order.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Table {
    client: Client,
    config: TableConfig,
}

impl Table {
    /// Wrap an existing client.
    pub fn new(client: Client, config: TableConfig) -> Self {
        Self { client, config }
    }

    /// Build the client from the standard AWS environment (region, credentials, endpoint).
    pub async fn from_env(config: TableConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config), config)
    }

    /// The underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The table layout.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn keys<K>(&self, ppk: K, psk: K) -> common::key::Keys<K> {
        common::key::Keys {
            partition_key: common::key::Key::new(&self.config.partition_key, ppk),
            sort_key: Some(common::key::Key::new(&self.config.sort_key, psk)),
        }
    }

    fn write_args<T>(&self) -> write::common::WriteArgs<T> {
        write::common::WriteArgs::new(&self.config.table_name)
    }

    /// Put request that creates or replaces the item.
    pub fn put_item<T>(&self, item: T) -> write::put_item::PutItem<T> {
        write::put_item::PutItem {
            item,
            write_args: self.write_args(),
        }
    }

    /// Put request that fails when an item with the same key already exists.
    pub fn create_item<T>(&self, item: T) -> write::put_item::PutItem<T> {
        let mut put_item = self.put_item(item);
        put_item.write_args.condition = Some(common::condition::ConditionMap::Leaves(
            common::condition::LogicalOperator::And,
            vec![common::condition::KeyCondition::new(
                &self.config.partition_key,
                common::condition::Condition::Null,
            )],
        ));
        put_item
    }

    /// Get request for the item at (`ppk`, `psk`).
    pub fn get_item<K>(&self, ppk: K, psk: K) -> read::get_item::GetItem<K> {
        read::get_item::GetItem {
            keys: self.keys(ppk, psk),
            single_read_args: read::common::SingleReadArgs {
                consistent_read: self.config.consistent_read,
                table_name: self.config.table_name.clone(),
            },
        }
    }

    /// Delete request that removes the item at (`ppk`, `psk`).
    pub fn delete_item<K>(&self, ppk: K, psk: K) -> write::delete_item::DeleteItem<K> {
        write::delete_item::DeleteItem {
            keys: self.keys(ppk, psk),
            write_args: self.write_args(),
        }
    }

    /// Update request that sets (`deleted: true`) or clears the soft-delete flag.
    pub fn soft_delete_item<K>(
        &self,
        ppk: K,
        psk: K,
        deleted: bool,
    ) -> write::soft_delete_item::SoftDeleteItem<K> {
        write::soft_delete_item::SoftDeleteItem {
            deleted,
            deleted_attribute: self.config.deleted_attribute.clone(),
            keys: self.keys(ppk, psk),
            write_args: self.write_args(),
        }
    }

    /// Query request on the primary key: `ppk = :ppk` plus an optional sort key condition.
    pub fn query_primary<K>(
        &self,
        ppk: K,
        sort_key_condition: Option<common::condition::Condition<K>>,
    ) -> read::query::Query<K> {
        read::query::Query {
            multiple_read_args: read::common::MultipleReadArgs {
                condition: None,
                consistent_read: self.config.consistent_read,
                index_name: None,
                table_name: self.config.table_name.clone(),
            },
            partition_key: common::key::Key::new(&self.config.partition_key, ppk),
            scan_index_forward: None,
            sort_key_condition: sort_key_condition.map(|condition| {
                common::condition::KeyCondition::new(&self.config.sort_key, condition)
            }),
        }
    }

    /// Query request on the secondary index: `spk = :spk` plus an optional sort key condition.
    pub fn query_secondary<K>(
        &self,
        spk: K,
        sort_key_condition: Option<common::condition::Condition<K>>,
    ) -> read::query::Query<K> {
        read::query::Query {
            multiple_read_args: read::common::MultipleReadArgs {
                condition: None,
                consistent_read: None,
                index_name: Some(self.config.index_name.clone()),
                table_name: self.config.table_name.clone(),
            },
            partition_key: common::key::Key::new(&self.config.index_partition_key, spk),
            scan_index_forward: None,
            sort_key_condition: sort_key_condition.map(|condition| {
                common::condition::KeyCondition::new(&self.config.index_sort_key, condition)
            }),
        }
    }

    /// Create or replace an item.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.put",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn put<T: Serialize>(&self, item: T) -> Result<()> {
        self.put_item(item).send(&self.client).await?;
        Ok(())
    }

    /// Write an item that must not exist yet.
    ///
    /// An existing item makes this fail with
    /// [`Error::is_conditional_check_failed`](crate::error::Error::is_conditional_check_failed).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.create",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn create<T: Serialize>(&self, item: T) -> Result<()> {
        self.create_item(item).send(&self.client).await?;
        Ok(())
    }

    /// Fetch the item at (`ppk`, `psk`).
    ///
    /// Missing and soft-deleted items both come back as `None`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.get",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn get<K: Serialize, T: DeserializeOwned>(
        &self,
        ppk: K,
        psk: K,
    ) -> Result<Option<T>> {
        let output = self.get_item(ppk, psk).send(&self.client).await?;
        live_item(output.item, &self.config.deleted_attribute)
    }

    /// Remove the item at (`ppk`, `psk`). Removing a missing item is not an error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.delete",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn delete<K: Serialize>(&self, ppk: K, psk: K) -> Result<()> {
        self.delete_item(ppk, psk).send(&self.client).await?;
        Ok(())
    }

    /// Flag the item at (`ppk`, `psk`) as deleted, hiding it from `get` and queries.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.soft_delete",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn soft_delete<K: Serialize>(&self, ppk: K, psk: K) -> Result<()> {
        self.soft_delete_item(ppk, psk, true).send(&self.client).await?;
        Ok(())
    }

    /// Clear the deleted flag of the item at (`ppk`, `psk`).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.restore",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn restore<K: Serialize>(&self, ppk: K, psk: K) -> Result<()> {
        self.soft_delete_item(ppk, psk, false).send(&self.client).await?;
        Ok(())
    }

    /// Live items under primary partition `ppk`, in sort key order.
    pub async fn query<K: Serialize, T: DeserializeOwned>(
        &self,
        ppk: K,
        sort_key_condition: Option<common::condition::Condition<K>>,
    ) -> Result<Vec<T>> {
        self.fetch(self.query_primary(ppk, sort_key_condition)).await
    }

    /// Live items under secondary partition `spk`, in secondary sort key order.
    pub async fn query_index<K: Serialize, T: DeserializeOwned>(
        &self,
        spk: K,
        sort_key_condition: Option<common::condition::Condition<K>>,
    ) -> Result<Vec<T>> {
        self.fetch(self.query_secondary(spk, sort_key_condition)).await
    }

    /// Send a query built by [`Self::query_primary`] or [`Self::query_secondary`]
    /// (possibly adjusted) and return the live items.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_single_table.query",
            skip_all,
            fields(table = %self.config.table_name),
            err
        )
    )]
    pub async fn fetch<K: Serialize, T: DeserializeOwned>(
        &self,
        query: read::query::Query<K>,
    ) -> Result<Vec<T>> {
        let output = query.send(&self.client).await?;
        live_items(
            output.items.unwrap_or_default(),
            &self.config.deleted_attribute,
        )
    }
}

/// Deserialize the item unless it is missing or flagged in `deleted_attribute`.
fn live_item<T: DeserializeOwned>(
    item: Option<Item>,
    deleted_attribute: &str,
) -> Result<Option<T>> {
    match item {
        Some(item) if read::soft_delete::is_deleted(&item, deleted_attribute) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("hiding soft-deleted item");
            Ok(None)
        }
        Some(item) => Ok(Some(from_item(item)?)),
        None => Ok(None),
    }
}

/// Drop the items flagged in `deleted_attribute` and deserialize the rest.
fn live_items<T: DeserializeOwned>(
    mut items: Vec<Item>,
    deleted_attribute: &str,
) -> Result<Vec<T>> {
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    let hidden = read::soft_delete::retain_live(&mut items, deleted_attribute);
    #[cfg(feature = "tracing")]
    tracing::debug!(hidden, returned = items.len(), "filtered soft-deleted items");
    Ok(from_items(items)?)
}
