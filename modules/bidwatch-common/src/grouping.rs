//! Seller grouping for the dashboard view.
//!
//! Items are bucketed by exact `seller_ref`. Buckets come out in the order their
//! seller was first seen in the input. Within a bucket the item with the highest
//! `reference_value` becomes the primary (first one wins on ties) and the rest are
//! attached as secondaries in ascending `closes_at` order. Rows whose seller is
//! in the known-seller registry carry its display name.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::sellers::seller_for_url;
use crate::types::{GroupedItem, Item};

/// Group a flat item list into one row per seller. Pure and total.
pub fn group_by_seller(items: &[Item]) -> Vec<GroupedItem> {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Vec<&Item>> = HashMap::new();

    for item in items {
        let key = item.seller_ref.as_str();
        buckets
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(item);
    }

    order
        .into_iter()
        .filter_map(|key| buckets.remove(key))
        .filter_map(build_group)
        .collect()
}

/// Inverse of [`group_by_seller`]: primaries followed by their secondaries.
pub fn flatten_groups(groups: &[GroupedItem]) -> Vec<Item> {
    let mut items = Vec::new();
    for group in groups {
        items.push(group.primary.clone());
        if let Some(secondary) = &group.secondary_items {
            items.extend(secondary.iter().cloned());
        }
    }
    items
}

fn build_group(mut bucket: Vec<&Item>) -> Option<GroupedItem> {
    // Stable: equal reference values keep their input order.
    bucket.sort_by(|a, b| by_reference_value_desc(a, b));

    let mut rest = bucket.into_iter();
    let primary = rest.next()?.clone();

    let mut secondary: Vec<Item> = rest.cloned().collect();
    secondary.sort_by(|a, b| a.closes_at.cmp(&b.closes_at));

    let seller_name = seller_for_url(&primary.seller_ref).map(|s| s.name.to_string());

    Some(GroupedItem {
        primary,
        seller_name,
        secondary_items: if secondary.is_empty() {
            None
        } else {
            Some(secondary)
        },
    })
}

fn by_reference_value_desc(a: &Item, b: &Item) -> Ordering {
    b.reference_value.total_cmp(&a.reference_value)
}
