use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    scan_index_forward: Option<bool>,
}

/// Query operation.
///
/// Every page is fetched and the items are returned together. Soft-deleted
/// items are returned as stored; [`crate::table::Table::query`] hides them.
///
/// The output of [`Query::send`] only carries `items`, `count` and
/// `scanned_count` (summed over the pages). Per-page fields such as
/// `consumed_capacity` and `last_evaluated_key` are not kept.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_single_table::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "app".to_string(),
///         ..Default::default()
///     },
///     partition_key: common::key::Key::new("ppk", "USER#1"),
///     scan_index_forward: Some(false),
///     sort_key_condition: Some(common::condition::KeyCondition::new(
///         "psk",
///         common::condition::Condition::BeginsWith("ORDER#".to_string()),
///     )),
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Table name, index name, filter and consistency.
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Ascending (`true`, the service default) or descending sort key order.
    pub scan_index_forward: Option<bool>,
    /// Optional condition on the sort key.
    pub sort_key_condition: Option<common::condition::KeyCondition<T>>,
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut index = 0;
        let mut key_conditions = vec![common::condition::KeyCondition::new(
            query.partition_key.name,
            common::condition::Condition::Equals(query.partition_key.value),
        )];
        key_conditions.extend(query.sort_key_condition);
        let key_condition =
            common::condition::KeyCondition::key_condition_expression(key_conditions, &mut index)?;
        let mut multiple_read_operation = query.multiple_read_args.into_input(&mut index)?;
        let key_condition_expression = key_condition.merge_into(
            &mut multiple_read_operation.expression_attribute_names,
            &mut multiple_read_operation.expression_attribute_values,
        );
        Ok(Self {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: query.scan_index_forward,
        })
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query operation, following pagination to the last page.
    ///
    /// The pages are folded into one output holding the items and the two counts;
    /// `consumed_capacity`, `last_evaluated_key` and the other page fields are dropped.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        let read = query.multiple_read_operation;
        let mut paginator = client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_scan_index_forward(query.scan_index_forward)
            .set_consistent_read(read.consistent_read)
            .set_expression_attribute_names(read.expression_attribute_names)
            .set_expression_attribute_values(read.expression_attribute_values)
            .set_filter_expression(read.filter_expression)
            .set_index_name(read.index_name)
            .table_name(read.table_name)
            .into_paginator()
            .send();
        let mut pages = Vec::new();
        while let Some(page) = paginator.next().await {
            pages.push(page?);
        }
        Ok(combine_pages(pages))
    }
}

fn combine_pages(pages: Vec<operation::query::QueryOutput>) -> operation::query::QueryOutput {
    let (mut items, mut count, mut scanned_count) = (Vec::new(), 0, 0);
    for page in pages {
        items.extend(page.items.unwrap_or_default());
        count += page.count;
        scanned_count += page.scanned_count;
    }
    operation::query::QueryOutput::builder()
        .set_items(Some(items))
        .count(count)
        .scanned_count(scanned_count)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::Value;
    use std::collections;

    #[rstest]
    #[case::partition_key_only(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "app".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key::new(
                "ppk",
                Value::String(
                    "USER#1".to_string()
                ),
            ),
            ..Default::default()
        },
        QueryInput {
            key_condition_expression: "#ppk = :ppk_eq0".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#ppk".to_string(), "ppk".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":ppk_eq0".to_string(),
                                types::AttributeValue::S(
                                    "USER#1".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "app".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case::secondary_index_with_filter(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                condition: Some(
                    common::condition::ConditionMap::Leaves(
                        common::condition::LogicalOperator::And,
                        vec![
                            common::condition::KeyCondition::new(
                                "status",
                                common::condition::Condition::Equals(
                                    Value::String(
                                        "shipped".to_string()
                                    )
                                ),
                            ),
                        ]
                    )
                ),
                index_name: Some("gsi".to_string()),
                table_name: "app".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key::new(
                "spk",
                Value::String(
                    "ORDER".to_string()
                ),
            ),
            scan_index_forward: Some(false),
            sort_key_condition: Some(
                common::condition::KeyCondition::new(
                    "ssk",
                    common::condition::Condition::Between(
                        Value::String(
                            "2024-01-01".to_string()
                        ),
                        Value::String(
                            "2024-12-31".to_string()
                        ),
                    ),
                )
            ),
        },
        QueryInput {
            key_condition_expression: "#spk = :spk_eq0 AND #ssk BETWEEN :ssk_between1 AND :ssk_between2".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#spk".to_string(), "spk".to_string()),
                            ("#ssk".to_string(), "ssk".to_string()),
                            ("#status".to_string(), "status".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":spk_eq0".to_string(),
                                types::AttributeValue::S(
                                    "ORDER".to_string()
                                )
                            ),
                            (
                                ":ssk_between1".to_string(),
                                types::AttributeValue::S(
                                    "2024-01-01".to_string()
                                )
                            ),
                            (
                                ":ssk_between2".to_string(),
                                types::AttributeValue::S(
                                    "2024-12-31".to_string()
                                )
                            ),
                            (
                                ":status_eq3".to_string(),
                                types::AttributeValue::S(
                                    "shipped".to_string()
                                )
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "#status = :status_eq3".to_string()
                ),
                index_name: Some("gsi".to_string()),
                table_name: "app".to_string(),
                ..Default::default()
            },
            scan_index_forward: Some(false),
        }
    )]
    fn test_query(#[case] args: Query<Value>, #[case] expected: QueryInput) {
        let actual: QueryInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    fn page(psks: &[&str], scanned_count: i32) -> operation::query::QueryOutput {
        let items: Vec<_> = psks
            .iter()
            .map(|psk| {
                collections::HashMap::from([(
                    "psk".to_string(),
                    types::AttributeValue::S(psk.to_string()),
                )])
            })
            .collect();
        operation::query::QueryOutput::builder()
            .count(items.len() as i32)
            .set_items(Some(items))
            .scanned_count(scanned_count)
            .consumed_capacity(
                types::ConsumedCapacity::builder()
                    .table_name("app")
                    .capacity_units(0.5)
                    .build(),
            )
            .last_evaluated_key("psk", types::AttributeValue::S("LAST".to_string()))
            .build()
    }

    #[rstest]
    #[case::no_pages(vec![], vec![], 0)]
    #[case::single_page(vec![page(&["A", "B"], 3)], vec!["A", "B"], 3)]
    #[case::several_pages(
        vec![
            page(&["A"], 2),
            page(&[], 4),
            page(&["B", "C"], 2),
        ],
        vec!["A", "B", "C"],
        8
    )]
    fn test_combine_pages(
        #[case] pages: Vec<operation::query::QueryOutput>,
        #[case] expected_psks: Vec<&str>,
        #[case] expected_scanned_count: i32,
    ) {
        let actual = combine_pages(pages);
        let psks: Vec<&str> = actual
            .items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item.get("psk")?.as_s().ok().map(String::as_str))
            .collect();
        assert_eq!(psks, expected_psks);
        assert_eq!(actual.count, expected_psks.len() as i32);
        assert_eq!(actual.scanned_count, expected_scanned_count);
        assert_eq!(actual.consumed_capacity, None);
        assert_eq!(actual.last_evaluated_key, None);
    }
}
