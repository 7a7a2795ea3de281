//! Errors returned by [`crate::table::Table`].
//!
//! The request builders under [`crate::read`] and [`crate::write`] return the
//! SDK error of their operation directly; the table facade folds them into one type.

use aws_sdk_dynamodb::{error::SdkError, operation};

/// Error from a table operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An item could not be converted to or from DynamoDB attribute values.
    #[error("failed to convert item: {0}")]
    Conversion(#[from] serde_dynamo::Error),
    /// The delete request failed.
    #[error("delete item failed: {0}")]
    DeleteItem(#[from] SdkError<operation::delete_item::DeleteItemError>),
    /// The get request failed.
    #[error("get item failed: {0}")]
    GetItem(#[from] SdkError<operation::get_item::GetItemError>),
    /// The put request failed.
    #[error("put item failed: {0}")]
    PutItem(#[from] SdkError<operation::put_item::PutItemError>),
    /// The query request failed.
    #[error("query failed: {0}")]
    Query(#[from] SdkError<operation::query::QueryError>),
    /// The soft delete (update) request failed.
    #[error("soft delete failed: {0}")]
    SoftDelete(#[from] SdkError<operation::update_item::UpdateItemError>),
}

impl Error {
    /// Whether the service rejected the write because its condition did not hold.
    ///
    /// This is how [`crate::table::Table::create`] reports an existing item and
    /// [`crate::table::Table::soft_delete`] a missing one.
    pub fn is_conditional_check_failed(&self) -> bool {
        match self {
            Self::DeleteItem(error) => error
                .as_service_error()
                .is_some_and(|error| error.is_conditional_check_failed_exception()),
            Self::PutItem(error) => error
                .as_service_error()
                .is_some_and(|error| error.is_conditional_check_failed_exception()),
            Self::SoftDelete(error) => error
                .as_service_error()
                .is_some_and(|error| error.is_conditional_check_failed_exception()),
            Self::Conversion(_) | Self::GetItem(_) | Self::Query(_) => false,
        }
    }
}

/// Result of a table operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;
