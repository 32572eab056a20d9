//! Ordering shopping-list items for a walk through the store.
//!
//! Everything here is pure and works in place; persisting the new order is
//! the caller's call.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use crate::model::{Category, ShoppingListItem, StoreChain};

/// Direction of a list sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// Item field a list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Category,
    Amount,
    Checked,
}

impl FromStr for SortField {
    type Err = String;

    /// Unknown fields sort by name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "category" => SortField::Category,
            "amount" => SortField::Amount,
            "checked" => SortField::Checked,
            _ => SortField::Name,
        })
    }
}

/// Map each category to the order of the section that holds it.
///
/// When a category is listed in several sections the last one wins.
pub fn section_orders(chain: &StoreChain) -> HashMap<Category, i32> {
    let mut orders = HashMap::new();
    for section in &chain.layout {
        for category in &section.categories {
            orders.insert(*category, section.order);
        }
    }
    orders
}

/// Stable sort of `items` by the store section of their category.
///
/// Categories the layout doesn't mention get order 0, so they land with (or
/// ahead of) the first section rather than at the end.
pub fn organize(items: &mut [ShoppingListItem], chain: &StoreChain) {
    let orders = section_orders(chain);
    items.sort_by_key(|item| orders.get(&item.category).copied().unwrap_or(0));
}

/// Stable sort of `items` by one field.
pub fn sort_items(items: &mut [ShoppingListItem], field: SortField, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &ShoppingListItem, b: &ShoppingListItem, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Category => a.category.as_str().cmp(b.category.as_str()),
        SortField::Amount => a.amount.total_cmp(&b.amount),
        // unchecked first
        SortField::Checked => a.is_checked.cmp(&b.is_checked),
    }
}
