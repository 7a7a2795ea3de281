#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB single table
//!
//! Single-table access helper for Amazon DynamoDB, built on the AWS SDK.
//!
//! ## Overview
//!
//! Every record lives in one table, keyed by a primary partition/sort key pair
//! (`ppk`, `psk`) and optionally placed in a secondary index by a second pair
//! (`spk`, `ssk`). Records can be soft-deleted: a boolean `isDeleted` flag hides
//! them from every read path without removing them.
//!
//! This crate:
//! - Builds the request parameters (table name, key names, key-condition
//!   expressions and their placeholders) for put, get, delete and query
//! - Queries either the primary key or the secondary index
//! - Post-filters get and query results so that soft-deleted records never surface
//!
//! Pagination, retries and consistency are left to the SDK and the service.
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_single_table::{Record, Table, TableConfig, common::condition::Condition};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Deserialize, Serialize)]
//! struct Order {
//!     total: u64,
//! }
//!
//! # async fn example() -> dynamodb_single_table::Result<()> {
//! let table = Table::from_env(TableConfig::new("app")).await;
//!
//! // Under the user's partition, and in the secondary index by order date.
//! let order = Record::new("USER#1", "ORDER#7", Order { total: 42 })
//!     .with_secondary_keys("ORDER", "2024-05-01");
//! table.create(order).await?;
//!
//! // "#ppk = :ppk_eq0 AND begins_with(#psk, :psk_begins_with1)"
//! let orders: Vec<Record<Order>> = table
//!     .query("USER#1", Some(Condition::BeginsWith("ORDER#".to_string())))
//!     .await?;
//!
//! // "#spk = :spk_eq0 AND #ssk >= :ssk_gte1" on the "gsi" index
//! let recent: Vec<Record<Order>> = table
//!     .query_index("ORDER", Some(Condition::GreaterThanOrEqual("2024-01-01")))
//!     .await?;
//! # let _ = (orders, recent);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Keys, conditions and expression placeholders
//! - [`mod@config`] - Table name and key layout
//! - [`mod@error`] - Errors of the table facade
//! - [`mod@read`] - Read operations (GetItem, Query) and the soft-delete filter
//! - [`mod@record`] - The stored record shape
//! - [`mod@table`] - The single-table facade
//! - [`mod@write`] - Write operations (PutItem, DeleteItem, soft delete)

/// Common utilities for keys and conditions.
pub mod common;

pub mod config;

pub mod error;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items by partition key, on the table or the secondary index
/// - Recognizing and dropping soft-deleted items
pub mod read;

pub mod record;

pub mod table;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Deleting items by key
/// - Setting or clearing the soft-delete flag
pub mod write;

pub use config::TableConfig;
pub use error::{Error, Result};
pub use record::Record;
pub use table::Table;
