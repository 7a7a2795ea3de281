use crate::common;

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::{collections, ops};

/// Logical operator for combining conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicalOperator {
    /// All conditions must be true.
    And,
    /// At least one condition must be true.
    Or,
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Condition types for DynamoDB expressions.
///
/// Key-condition expressions only accept `Equals` on the partition key and
/// `Equals`, the ordering comparisons, `Between` or `BeginsWith` on the sort
/// key. Filter and condition expressions accept all of them.
///
/// ```rust
/// use dynamodb_single_table::common::condition;
///
/// let prefix: condition::Condition<String> = condition::Condition::BeginsWith("ORDER#".to_string());
/// let range = condition::Condition::Between(10, 20);
/// let missing: condition::Condition<String> = condition::Condition::Null;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// The attribute begins with a prefix (string attributes only).
    BeginsWith(String),
    /// The attribute lies between two values, inclusive.
    Between(T, T),
    /// The attribute contains a value.
    Contains(T),
    /// The attribute equals a value.
    Equals(T),
    /// The attribute is greater than a value.
    GreaterThan(T),
    /// The attribute is greater than or equal to a value.
    GreaterThanOrEqual(T),
    /// The attribute is one of the listed values.
    ///
    /// The list must not be empty; building an expression from `In(vec![])` fails.
    In(Vec<T>),
    /// The attribute is less than a value.
    LessThan(T),
    /// The attribute is less than or equal to a value.
    LessThanOrEqual(T),
    /// The attribute does not contain a value.
    NotContains(T),
    /// The attribute does not equal a value.
    NotEqual(T),
    /// The attribute exists.
    NotNull,
    /// The attribute does not exist.
    Null,
}

/// Hands out value placeholders for one attribute.
struct Binder<'a> {
    token: String,
    index: &'a mut usize,
    values: collections::HashMap<String, types::AttributeValue>,
}

impl Binder<'_> {
    fn bind(&mut self, operation: &str, value: types::AttributeValue) -> String {
        let placeholder = format!(":{}_{operation}{}", self.token, *self.index);
        *self.index += 1;
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    fn compare<T: Serialize>(
        &mut self,
        path: &str,
        symbol: &str,
        operation: &str,
        value: T,
    ) -> Result<String> {
        let placeholder = self.bind(operation, to_attribute_value(value)?);
        Ok(format!("{path} {symbol} {placeholder}"))
    }
}

impl<T: Serialize> Condition<T> {
    fn to_expression(
        self,
        name: &str,
        path: &str,
        index: &mut usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let mut binder = Binder {
            token: common::placeholder_token(name),
            index,
            values: collections::HashMap::new(),
        };
        let text = match self {
            Self::BeginsWith(prefix) => {
                let placeholder = binder.bind("begins_with", types::AttributeValue::S(prefix));
                format!("begins_with({path}, {placeholder})")
            }
            Self::Between(low, high) => {
                let low = binder.bind("between", to_attribute_value(low)?);
                let high = binder.bind("between", to_attribute_value(high)?);
                format!("{path} BETWEEN {low} AND {high}")
            }
            Self::Contains(value) => {
                let placeholder = binder.bind("contains", to_attribute_value(value)?);
                format!("contains({path}, {placeholder})")
            }
            Self::Equals(value) => binder.compare(path, "=", "eq", value)?,
            Self::GreaterThan(value) => binder.compare(path, ">", "gt", value)?,
            Self::GreaterThanOrEqual(value) => binder.compare(path, ">=", "gte", value)?,
            Self::In(values) => {
                if values.is_empty() {
                    return Err(<Error as serde::ser::Error>::custom(format!(
                        "IN condition on `{name}` needs at least one value"
                    )));
                }
                let placeholders = values
                    .into_iter()
                    .map(|value| -> Result<String> {
                        Ok(binder.bind("in", to_attribute_value(value)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                format!("{path} IN ({})", placeholders.join(", "))
            }
            Self::LessThan(value) => binder.compare(path, "<", "lt", value)?,
            Self::LessThanOrEqual(value) => binder.compare(path, "<=", "lte", value)?,
            Self::NotContains(value) => {
                let placeholder = binder.bind("not_contains", to_attribute_value(value)?);
                format!("NOT contains({path}, {placeholder})")
            }
            Self::NotEqual(value) => binder.compare(path, "<>", "ne", value)?,
            Self::NotNull => format!("attribute_exists({path})"),
            Self::Null => format!("attribute_not_exists({path})"),
        };
        Ok((text, binder.values))
    }
}

/// Condition applied to a named attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute.
    pub name: String,
}

impl<T> KeyCondition<T> {
    /// Bind a condition to an attribute name.
    pub fn new(name: impl Into<String>, condition: Condition<T>) -> Self {
        Self {
            condition,
            name: name.into(),
        }
    }
}

impl<T: Serialize> KeyCondition<T> {
    fn to_expression(self, path: &[String], index: &mut usize) -> Result<common::Expression> {
        let (placeholder, new_path) = common::add_placeholder(path, &self.name);
        let (text, values) =
            self.condition
                .to_expression(&self.name, &new_path.join(common::PATH_SEPARATOR), index)?;
        Ok(common::Expression {
            text,
            names: collections::HashMap::from([(placeholder, self.name)]),
            values,
        })
    }

    /// Build a key-condition expression: every condition joined with `AND`.
    pub(crate) fn key_condition_expression(
        conditions: Vec<Self>,
        index: &mut usize,
    ) -> Result<common::Expression> {
        let expressions = conditions
            .into_iter()
            .map(|condition| condition.to_expression(&[], index))
            .collect::<Result<Vec<_>>>()?;
        Ok(common::Expression::merge(&LogicalOperator::And, expressions))
    }
}

/// Tree of conditions combined with logical operators.
///
/// `Node` entries descend into map attributes, so `Node(And, {"profile": Leaves(..)})`
/// tests attributes under `profile.`.
///
/// ```rust
/// use dynamodb_single_table::common::condition;
///
/// let map = condition::ConditionMap::Leaves(
///     condition::LogicalOperator::Or,
///     vec![
///         condition::KeyCondition::new("status", condition::Condition::Equals("active")),
///         condition::KeyCondition::new("status", condition::Condition::Equals("pending")),
///     ],
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionMap<T> {
    /// A flat list of conditions combined with the operator.
    Leaves(LogicalOperator, Vec<KeyCondition<T>>),
    /// Conditions nested under map attributes, combined with the operator.
    Node(LogicalOperator, IndexMap<String, ConditionMap<T>>),
}

impl<T: Serialize> TryFrom<ConditionMap<T>> for common::Expression {
    type Error = Error;

    fn try_from(condition_map: ConditionMap<T>) -> Result<Self> {
        condition_map.to_expression(&[], &mut 0, true)
    }
}

impl<T: Serialize> ConditionMap<T> {
    /// Build the expression, numbering value placeholders from `index`.
    ///
    /// Groups with more than one member are parenthesized unless they sit at the root.
    pub(crate) fn to_expression(
        self,
        path: &[String],
        index: &mut usize,
        is_root: bool,
    ) -> Result<common::Expression> {
        let (operator, mut expressions) = match self {
            Self::Leaves(operator, conditions) => {
                let expressions = conditions
                    .into_iter()
                    .map(|condition| condition.to_expression(path, index))
                    .collect::<Result<Vec<_>>>()?;
                (operator, expressions)
            }
            Self::Node(operator, map) => {
                let children_are_root = is_root && map.len() == 1;
                let mut expressions = Vec::with_capacity(map.len());
                for (name, child) in map {
                    let (placeholder, new_path) = common::add_placeholder(path, &name);
                    let mut expression = child.to_expression(&new_path, index, children_are_root)?;
                    expression.names.insert(placeholder, name);
                    expressions.push(expression);
                }
                (operator, expressions)
            }
        };
        // Members without leaves contribute neither text nor placeholders.
        expressions.retain(|expression| !expression.text.is_empty());
        let is_group = expressions.len() > 1;
        let mut expression = common::Expression::merge(&operator, expressions);
        if is_group && !is_root {
            expression.text = format!("({})", expression.text);
        }
        Ok(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::Value;

    fn string(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[rstest]
    #[case::begins_with(
        Condition::BeginsWith("ORDER#".to_string()),
        "begins_with(#psk, :psk_begins_with0)",
        vec![(":psk_begins_with0", string("ORDER#"))]
    )]
    #[case::between(
        Condition::Between(
            Value::String("A".to_string()),
            Value::String("M".to_string()),
        ),
        "#psk BETWEEN :psk_between0 AND :psk_between1",
        vec![
            (":psk_between0", string("A")),
            (":psk_between1", string("M")),
        ]
    )]
    #[case::equals(
        Condition::Equals(Value::String("PROFILE".to_string())),
        "#psk = :psk_eq0",
        vec![(":psk_eq0", string("PROFILE"))]
    )]
    #[case::greater_than_or_equal(
        Condition::GreaterThanOrEqual(Value::Number(5.into())),
        "#psk >= :psk_gte0",
        vec![(":psk_gte0", types::AttributeValue::N("5".to_string()))]
    )]
    #[case::in_list(
        Condition::In(vec![
            Value::String("a".to_string()),
            Value::String("b".to_string()),
        ]),
        "#psk IN (:psk_in0, :psk_in1)",
        vec![
            (":psk_in0", string("a")),
            (":psk_in1", string("b")),
        ]
    )]
    #[case::not_contains(
        Condition::NotContains(Value::String("x".to_string())),
        "NOT contains(#psk, :psk_not_contains0)",
        vec![(":psk_not_contains0", string("x"))]
    )]
    #[case::not_equal(
        Condition::NotEqual(Value::Bool(true)),
        "#psk <> :psk_ne0",
        vec![(":psk_ne0", types::AttributeValue::Bool(true))]
    )]
    #[case::exists(Condition::NotNull, "attribute_exists(#psk)", vec![])]
    #[case::not_exists(Condition::Null, "attribute_not_exists(#psk)", vec![])]
    fn test_condition_expression(
        #[case] condition: Condition<Value>,
        #[case] expected_text: &str,
        #[case] expected_values: Vec<(&str, types::AttributeValue)>,
    ) {
        let (text, values) = condition.to_expression("psk", "#psk", &mut 0).unwrap();
        assert_eq!(text, expected_text);
        let expected_values: collections::HashMap<_, _> = expected_values
            .into_iter()
            .map(|(placeholder, value)| (placeholder.to_string(), value))
            .collect();
        assert_eq!(values, expected_values);
    }

    #[test]
    fn test_empty_in_list_is_rejected() {
        let mut index = 0;
        let error = Condition::<Value>::In(vec![])
            .to_expression("psk", "#psk", &mut index)
            .unwrap_err();
        assert!(error.to_string().contains("IN condition on `psk`"));
        assert_eq!(index, 0);
    }

    #[test]
    fn test_key_condition_expression() {
        let mut index = 0;
        let actual = KeyCondition::key_condition_expression(
            vec![
                KeyCondition::new("ppk", Condition::Equals(Value::String("USER#1".to_string()))),
                KeyCondition::new("psk", Condition::BeginsWith("ORDER#".to_string())),
            ],
            &mut index,
        )
        .unwrap();
        let expected = common::Expression {
            text: "#ppk = :ppk_eq0 AND begins_with(#psk, :psk_begins_with1)".to_string(),
            names: collections::HashMap::from([
                ("#ppk".to_string(), "ppk".to_string()),
                ("#psk".to_string(), "psk".to_string()),
            ]),
            values: collections::HashMap::from([
                (":ppk_eq0".to_string(), string("USER#1")),
                (":psk_begins_with1".to_string(), string("ORDER#")),
            ]),
        };
        assert_eq!(actual, expected);
        assert_eq!(index, 2);
    }

    #[test]
    fn test_placeholders_are_sanitized() {
        let actual = KeyCondition::key_condition_expression(
            vec![KeyCondition::new(
                "created-at",
                Condition::GreaterThan(Value::Number(1.into())),
            )],
            &mut 0,
        )
        .unwrap();
        assert_eq!(actual.text, "#created_2d_at > :created_2d_at_gt0");
        assert_eq!(
            actual.names,
            collections::HashMap::from([("#created_2d_at".to_string(), "created-at".to_string())])
        );
    }

    #[test]
    fn test_similar_names_keep_separate_placeholders() {
        let condition_map = ConditionMap::Leaves(
            LogicalOperator::And,
            vec![
                KeyCondition::new("created-at", Condition::Equals(Value::Number(1.into()))),
                KeyCondition::new("created_at", Condition::Equals(Value::Number(2.into()))),
            ],
        );
        let actual: common::Expression = condition_map.try_into().unwrap();
        let expected = common::Expression {
            text: "#created_2d_at = :created_2d_at_eq0 AND #created__at = :created__at_eq1"
                .to_string(),
            names: collections::HashMap::from([
                ("#created_2d_at".to_string(), "created-at".to_string()),
                ("#created__at".to_string(), "created_at".to_string()),
            ]),
            values: collections::HashMap::from([
                (":created_2d_at_eq0".to_string(), types::AttributeValue::N("1".to_string())),
                (":created__at_eq1".to_string(), types::AttributeValue::N("2".to_string())),
            ]),
        };
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::single_leaf(
        ConditionMap::Leaves(
            LogicalOperator::And,
            vec![
                KeyCondition::new("status", Condition::Equals(Value::String("active".to_string()))),
            ]
        ),
        "#status = :status_eq0"
    )]
    #[case::root_leaves_are_not_wrapped(
        ConditionMap::Leaves(
            LogicalOperator::Or,
            vec![
                KeyCondition::new("status", Condition::Equals(Value::String("active".to_string()))),
                KeyCondition::new("status", Condition::Null),
            ]
        ),
        "#status = :status_eq0 OR attribute_not_exists(#status)"
    )]
    #[case::nested_groups_are_wrapped(
        ConditionMap::Node(
            LogicalOperator::And,
            IndexMap::from([
                (
                    "profile".to_string(),
                    ConditionMap::Leaves(
                        LogicalOperator::Or,
                        vec![
                            KeyCondition::new("age", Condition::LessThan(Value::Number(18.into()))),
                            KeyCondition::new("age", Condition::GreaterThan(Value::Number(65.into()))),
                        ]
                    ),
                ),
                (
                    "settings".to_string(),
                    ConditionMap::Leaves(
                        LogicalOperator::And,
                        vec![
                            KeyCondition::new("theme", Condition::NotNull),
                        ]
                    ),
                ),
            ])
        ),
        "(#profile.#age < :age_lt0 OR #profile.#age > :age_gt1) AND attribute_exists(#settings.#theme)"
    )]
    #[case::empty_members_are_dropped(
        ConditionMap::Node(
            LogicalOperator::And,
            IndexMap::from([
                (
                    "profile".to_string(),
                    ConditionMap::Node(
                        LogicalOperator::Or,
                        IndexMap::from([
                            ("age".to_string(), ConditionMap::Leaves(LogicalOperator::And, vec![])),
                            ("name".to_string(), ConditionMap::Leaves(LogicalOperator::And, vec![])),
                        ])
                    ),
                ),
                (
                    "status".to_string(),
                    ConditionMap::Leaves(LogicalOperator::And, vec![]),
                ),
                (
                    "settings".to_string(),
                    ConditionMap::Leaves(
                        LogicalOperator::And,
                        vec![
                            KeyCondition::new("theme", Condition::NotNull),
                        ]
                    ),
                ),
            ])
        ),
        "attribute_exists(#settings.#theme)"
    )]
    #[case::empty_root(ConditionMap::Leaves(LogicalOperator::Or, vec![]), "")]
    fn test_condition_map_expression(
        #[case] condition_map: ConditionMap<Value>,
        #[case] expected_text: &str,
    ) {
        let actual: common::Expression = condition_map.try_into().unwrap();
        assert_eq!(actual.text, expected_text);
    }

    #[test]
    fn test_condition_map_names() {
        let condition_map = ConditionMap::Node(
            LogicalOperator::And,
            IndexMap::from([(
                "profile".to_string(),
                ConditionMap::Leaves(
                    LogicalOperator::And,
                    vec![KeyCondition::new(
                        "age",
                        Condition::Equals(Value::Number(30.into())),
                    )],
                ),
            )]),
        );
        let actual: common::Expression = condition_map.try_into().unwrap();
        let expected = common::Expression {
            text: "#profile.#age = :age_eq0".to_string(),
            names: collections::HashMap::from([
                ("#profile".to_string(), "profile".to_string()),
                ("#age".to_string(), "age".to_string()),
            ]),
            values: collections::HashMap::from([(
                ":age_eq0".to_string(),
                types::AttributeValue::N("30".to_string()),
            )]),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_members_leave_no_names() {
        let condition_map = ConditionMap::<Value>::Node(
            LogicalOperator::And,
            IndexMap::from([(
                "profile".to_string(),
                ConditionMap::Leaves(LogicalOperator::And, vec![]),
            )]),
        );
        let actual: common::Expression = condition_map.try_into().unwrap();
        assert_eq!(actual, common::Expression::default());
    }
}
