use aws_sdk_dynamodb::types;
use std::collections;

/// Attribute that flags a record as soft-deleted unless configured otherwise.
pub const DEFAULT_DELETED_ATTRIBUTE: &str = "isDeleted";

/// Whether an item is flagged as soft-deleted.
///
/// Only the boolean `true` counts. A missing attribute, `false`, or a value of
/// any other type leaves the item visible.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_single_table::read::soft_delete;
/// use std::collections::HashMap;
///
/// let item = HashMap::from([
///     ("ppk".to_string(), AttributeValue::S("USER#1".to_string())),
///     ("isDeleted".to_string(), AttributeValue::Bool(true)),
/// ]);
/// assert!(soft_delete::is_deleted(&item, soft_delete::DEFAULT_DELETED_ATTRIBUTE));
/// ```
pub fn is_deleted(
    item: &collections::HashMap<String, types::AttributeValue>,
    attribute: &str,
) -> bool {
    matches!(item.get(attribute), Some(types::AttributeValue::Bool(true)))
}

/// Drop soft-deleted items in place, keeping the order of the rest.
///
/// Returns how many items were dropped.
pub fn retain_live(
    items: &mut Vec<collections::HashMap<String, types::AttributeValue>>,
    attribute: &str,
) -> usize {
    let before = items.len();
    items.retain(|item| !is_deleted(item, attribute));
    before - items.len()
}
