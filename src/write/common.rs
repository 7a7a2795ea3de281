use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Write request parameters once the condition has been turned into an expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

impl WriteInput {
    /// Merge an expression into this write and return its text.
    pub(crate) fn merge_expression(&mut self, expression: common::Expression) -> String {
        expression.merge_into(
            &mut self.expression_attribute_names,
            &mut self.expression_attribute_values,
        )
    }
}

/// Arguments common to all write operations (Put, Delete, soft delete).
#[derive(Clone, Debug, PartialEq)]
pub struct WriteArgs<T> {
    /// Condition that must hold for the write to go through.
    ///
    /// When it does not, the service rejects the write with a conditional check failure.
    pub condition: Option<common::condition::ConditionMap<T>>,
    /// Which item attributes to return in the response (`AllOld` for put and delete).
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T> WriteArgs<T> {
    /// Unconditional write to `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            condition: None,
            return_values: None,
            table_name: table_name.into(),
        }
    }
}

impl<T: Serialize> TryFrom<WriteArgs<T>> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs<T>) -> Result<Self> {
        let mut write_input = Self {
            return_values: write_args.return_values,
            table_name: write_args.table_name,
            ..Default::default()
        };
        if let Some(condition) = write_args.condition {
            let condition: common::Expression = condition.try_into()?;
            // A tree without leaves constrains nothing.
            if !condition.text.is_empty() {
                write_input.condition_expression = Some(write_input.merge_expression(condition));
            }
        }
        Ok(write_input)
    }
}
