use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::Result;
use std::collections;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) table_name: String,
}

/// Arguments for single-item read operations (GetItem).
///
/// There is no projection: the soft-delete marker has to come back with
/// every item for the read paths to be able to hide it.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a strongly consistent read.
    ///
    /// `None` leaves the choice to the service, which defaults to eventually consistent.
    pub consistent_read: Option<bool>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        Self {
            consistent_read: single_read_args.consistent_read,
            table_name: single_read_args.table_name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for multiple-item read operations (Query).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Filter applied by the service after the key condition.
    pub condition: Option<common::condition::ConditionMap<T>>,
    /// Whether to use a strongly consistent read.
    ///
    /// Global secondary indexes only support eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// The secondary index to query instead of the base table.
    pub index_name: Option<String>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> MultipleReadArgs<T> {
    /// Convert into request parameters, numbering filter placeholders from `index`.
    pub(crate) fn into_input(self, index: &mut usize) -> Result<MultipleReadInput> {
        let (filter_expression, expression_attribute_names, expression_attribute_values) =
            match self.condition {
                Some(condition) => {
                    let filter = condition.to_expression(&[], index, true)?;
                    if filter.text.is_empty() {
                        (None, None, None)
                    } else {
                        let values = (!filter.values.is_empty()).then_some(filter.values);
                        (Some(filter.text), Some(filter.names), values)
                    }
                }
                None => (None, None, None),
            };
        Ok(MultipleReadInput {
            consistent_read: self.consistent_read,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: self.index_name,
            table_name: self.table_name,
        })
    }
}
