use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// soft delete operation
#[derive(Debug, PartialEq)]
struct SoftDeleteItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Soft delete operation: sets the deleted flag on an existing item.
///
/// The write is conditioned on the item existing, so flagging a missing key
/// fails with a conditional check error instead of creating a stub record.
/// With `deleted: false` the flag is cleared and the item shows up in reads again.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_single_table::{common, read, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let soft_delete = write::soft_delete_item::SoftDeleteItem {
///     deleted: true,
///     deleted_attribute: read::soft_delete::DEFAULT_DELETED_ATTRIBUTE.to_string(),
///     keys: common::key::Keys {
///         partition_key: common::key::Key::new("ppk", "USER#1"),
///         sort_key: Some(common::key::Key::new("psk", "PROFILE")),
///     },
///     write_args: write::common::WriteArgs::new("app"),
/// };
/// soft_delete.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct SoftDeleteItem<T> {
    /// The value to store in the flag.
    pub deleted: bool,
    /// The attribute holding the flag.
    pub deleted_attribute: String,
    /// The primary key of the item to flag.
    pub keys: common::key::Keys<T>,
    /// Table name, extra condition and return values.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<SoftDeleteItem<T>> for SoftDeleteItemInput {
    type Error = Error;

    fn try_from(soft_delete: SoftDeleteItem<T>) -> Result<Self> {
        let partition_key = soft_delete.keys.partition_key.name.clone();
        let keys = soft_delete.keys.try_into()?;
        let mut write_operation: write::common::WriteInput = soft_delete.write_args.try_into()?;

        let exists = common::Expression {
            text: format!(
                "attribute_exists({})",
                common::name_placeholder(&partition_key)
            ),
            names: collections::HashMap::from([(
                common::name_placeholder(&partition_key),
                partition_key,
            )]),
            ..Default::default()
        };
        let exists = write_operation.merge_expression(exists);
        let condition = match write_operation.condition_expression.take() {
            Some(condition) => format!("({condition}) AND {exists}"),
            None => exists,
        };
        write_operation.condition_expression = Some(condition);

        let name_placeholder = common::name_placeholder(&soft_delete.deleted_attribute);
        let value_placeholder = format!(
            ":{}",
            common::placeholder_token(&soft_delete.deleted_attribute)
        );
        let update = common::Expression {
            text: format!("SET {name_placeholder} = {value_placeholder}"),
            names: collections::HashMap::from([(
                name_placeholder,
                soft_delete.deleted_attribute,
            )]),
            values: collections::HashMap::from([(
                value_placeholder,
                types::AttributeValue::Bool(soft_delete.deleted),
            )]),
        };
        let update_expression = write_operation.merge_expression(update);

        Ok(Self {
            keys,
            update_expression,
            write_operation,
        })
    }
}

impl<T: Serialize> SoftDeleteItem<T> {
    /// Execute the soft delete operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let soft_delete: SoftDeleteItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        let write = soft_delete.write_operation;
        client
            .update_item()
            .set_key(Some(soft_delete.keys))
            .update_expression(soft_delete.update_expression)
            .set_condition_expression(write.condition_expression)
            .set_expression_attribute_names(write.expression_attribute_names)
            .set_expression_attribute_values(write.expression_attribute_values)
            .set_return_values(write.return_values)
            .table_name(write.table_name)
            .send()
            .await
    }
}
