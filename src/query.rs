//! List query helpers
//!
//! Keyword filtering, field sorting and page slicing over in-memory collections.
//! Fields are addressed by their serialized (camelCase) name; dotted paths such as
//! `context.requestId` reach into nested objects.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::models::{Paged, SortOrder, Sorter};

/// Follow a dotted path through nested JSON objects
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(value, |current, key| match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// String form of a field value used for keyword matching and sorting
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_json<T: Serialize>(item: &T) -> Value {
    serde_json::to_value(item).unwrap_or_else(|e| {
        tracing::warn!("Failed to serialize list item for querying: {}", e);
        Value::Null
    })
}

/// Keep items where any of `fields` contains `keyword`, ignoring case
///
/// An empty or absent keyword returns the input unchanged.
pub fn filter_by_keyword<T: Serialize>(items: Vec<T>, keyword: Option<&str>, fields: &[&str]) -> Vec<T> {
    let Some(keyword) = keyword.filter(|k| !k.is_empty()) else {
        return items;
    };
    let lowered = keyword.to_lowercase();

    items
        .into_iter()
        .filter(|item| {
            let json = to_json(item);
            fields.iter().any(|field| match resolve_path(&json, field) {
                None | Some(Value::Null) => false,
                Some(value) => display_string(value).to_lowercase().contains(&lowered),
            })
        })
        .collect()
}

/// Ascending comparison of two optional field values
///
/// Missing or null values sort first, numbers compare numerically,
/// everything else compares by its string form (case-insensitive first).
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) if a == b => Ordering::Equal,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(a), Some(b)) => {
            let a = display_string(a);
            let b = display_string(b);
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(&b))
        }
    }
}

/// Sort items by the sorter's field
///
/// `Descend` reverses the ascending result. Without a field the input is returned unchanged.
pub fn sort_by_field<T: Serialize>(items: Vec<T>, sorter: Option<&Sorter>) -> Vec<T> {
    let Some((field, order)) = sorter.and_then(|s| s.field.as_deref().map(|f| (f, s.order))) else {
        return items;
    };

    let mut keyed: Vec<(Value, T)> = items
        .into_iter()
        .map(|item| {
            let key = resolve_path(&to_json(&item), field)
                .cloned()
                .unwrap_or(Value::Null);
            (key, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_values(Some(a), Some(b)));

    let mut sorted: Vec<T> = keyed.into_iter().map(|(_, item)| item).collect();
    if order == SortOrder::Descend {
        sorted.reverse();
    }
    sorted
}

/// Slice `[(page-1)*page_size, page*page_size)` out of `items`
///
/// Pages are 1-based and never clamped: a page past the end yields no items,
/// while `total` still reports the full collection length.
pub fn paginate_list<T: Clone>(items: &[T], page: u32, page_size: u32) -> Paged<T> {
    let total = items.len();
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    let end = start.saturating_add(page_size as usize).min(total);

    let slice = if start >= total {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };

    Paged {
        items: slice,
        total,
        page,
        page_size,
    }
}

/// Whether an enum-like filter value actually restricts anything
///
/// Absent, empty and the `all` sentinel (any case) mean "no filter".
pub fn is_active_filter(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        name: String,
        score: Option<i64>,
        context: Value,
    }

    fn row(name: &str, score: Option<i64>) -> Row {
        Row {
            name: name.to_string(),
            score,
            context: json!({"requestId": format!("REQ-{}", name.len())}),
        }
    }

    #[test]
    fn test_resolve_path() {
        let value = json!({"a": {"b": {"c": 1}}, "list": [10, 20]});
        assert_eq!(resolve_path(&value, "a.b.c"), Some(&json!(1)));
        assert_eq!(resolve_path(&value, "list.1"), Some(&json!(20)));
        assert_eq!(resolve_path(&value, "a.x"), None);
        assert_eq!(resolve_path(&value, ""), None);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let items = vec![row("Alice", None), row("Bob", None)];
        let filtered = filter_by_keyword(items, Some("ALICE"), &["name"]);
        assert_eq!(filtered, vec![row("Alice", None)]);
    }

    #[test]
    fn test_filter_empty_keyword_is_noop() {
        let items = vec![row("Alice", None), row("Bob", None)];
        assert_eq!(filter_by_keyword(items.clone(), Some(""), &["name"]), items);
        assert_eq!(filter_by_keyword(items.clone(), None, &["name"]), items);
    }

    #[test]
    fn test_filter_nested_and_numeric_fields() {
        let items = vec![row("Al", Some(42)), row("Bobby", Some(7))];
        let by_context = filter_by_keyword(items.clone(), Some("req-5"), &["context.requestId"]);
        assert_eq!(by_context, vec![row("Bobby", Some(7))]);

        let by_score = filter_by_keyword(items, Some("42"), &["score"]);
        assert_eq!(by_score, vec![row("Al", Some(42))]);
    }

    #[test]
    fn test_filter_matches_array_elements() {
        let items = vec![json!({"tags": ["beta", "new"]}), json!({"tags": []})];
        let filtered = filter_by_keyword(items, Some("new"), &["tags"]);
        assert_eq!(filtered, vec![json!({"tags": ["beta", "new"]})]);
    }

    #[test]
    fn test_sort_numeric_with_nulls_first() {
        let items = vec![row("c", Some(10)), row("a", None), row("b", Some(2))];
        let sorted = sort_by_field(items.clone(), Some(&Sorter::ascend("score")));
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let sorted = sort_by_field(items, Some(&Sorter::descend("score")));
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_strings_ignore_case_first() {
        let items = vec![row("bob", None), row("Alice", None), row("carol", None)];
        let sorted = sort_by_field(items, Some(&Sorter::ascend("name")));
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob", "carol"]);
    }

    #[test]
    fn test_sort_without_field_is_noop() {
        let items = vec![row("b", None), row("a", None)];
        assert_eq!(sort_by_field(items.clone(), None), items);
        assert_eq!(sort_by_field(items.clone(), Some(&Sorter::default())), items);
    }

    #[test]
    fn test_paginate_25_items() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate_list(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total, 25);

        let third = paginate_list(&items, 3, 10);
        assert_eq!(third.items, vec![21, 22, 23, 24, 25]);

        let fourth = paginate_list(&items, 4, 10);
        assert!(fourth.items.is_empty());
        assert_eq!(fourth.total, 25);
        assert_eq!(fourth.page, 4);
        assert_eq!(fourth.page_size, 10);
    }

    #[test]
    fn test_active_filter() {
        assert_eq!(is_active_filter(None), None);
        assert_eq!(is_active_filter(Some("")), None);
        assert_eq!(is_active_filter(Some("all")), None);
        assert_eq!(is_active_filter(Some("ALL")), None);
        assert_eq!(is_active_filter(Some("active")), Some("active"));
    }
}
