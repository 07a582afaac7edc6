//! List query types
//!
//! This module provides:
//! - `Sorter` / `SortOrder` for field sorting
//! - `Paged<T>` container for paginated results
//! - Per-resource query objects (`UserQuery`, `LogQuery`, `TaskQuery`)
//! - `QueryPairs` for flattening query objects into a query string

use serde::{Deserialize, Serialize};

/// Default page number (1-indexed)
pub fn default_page() -> u32 {
    1
}

/// Default page size for list views
pub fn default_page_size() -> u32 {
    10
}

/// Default page size for the admin task board
pub fn default_task_page_size() -> u32 {
    8
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Ascend,
    /// Largest first
    Descend,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }
}

/// Sort instruction for list queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sorter {
    /// Field to sort by; dotted paths reach into nested objects
    #[serde(default)]
    pub field: Option<String>,
    /// Sort direction
    #[serde(default, alias = "direction")]
    pub order: SortOrder,
}

impl Sorter {
    pub fn ascend(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            order: SortOrder::Ascend,
        }
    }

    pub fn descend(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            order: SortOrder::Descend,
        }
    }

    /// The backend takes the sorter as one JSON-encoded `sorter` parameter
    fn push_pairs(&self, pairs: &mut Vec<(String, String)>) {
        if let Some(field) = &self.field {
            let encoded = serde_json::json!({ "field": field, "order": self.order.as_str() });
            pairs.push(("sorter".to_string(), encoded.to_string()));
        }
    }
}

/// Paginated result container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: usize,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl<T> Paged<T> {
    /// Calculate the total number of pages, saturating at `u32::MAX`
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = self.total.div_ceil(self.page_size as usize);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Flatten a query object into query-string pairs
pub trait QueryPairs {
    fn query_pairs(&self) -> Vec<(String, String)>;
}

fn push_opt(pairs: &mut Vec<(String, String)>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            pairs.push((key.to_string(), value.clone()));
        }
    }
}

fn push_many(pairs: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    for value in values {
        pairs.push((key.to_string(), value.clone()));
    }
}

/// Filters and paging for the user list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    /// Account status; `"all"` disables the filter
    #[serde(default)]
    pub status: Option<String>,
    /// Role name; `"all"` disables the filter
    #[serde(default)]
    pub role: Option<String>,
    /// Matches users carrying any of these tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Matches users in any of these departments
    #[serde(default)]
    pub department: Vec<String>,
    #[serde(default)]
    pub sorter: Option<Sorter>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            role: None,
            tags: Vec::new(),
            department: Vec::new(),
            sorter: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl QueryPairs for UserQuery {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        push_opt(&mut pairs, "keyword", &self.keyword);
        push_opt(&mut pairs, "status", &self.status);
        push_opt(&mut pairs, "role", &self.role);
        push_many(&mut pairs, "tags", &self.tags);
        push_many(&mut pairs, "department", &self.department);
        if let Some(sorter) = &self.sorter {
            sorter.push_pairs(&mut pairs);
        }
        pairs
    }
}

/// Filters and paging for the system log view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    /// Log level; `"ALL"` disables the filter
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub sorter: Option<Sorter>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            level: None,
            sorter: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl QueryPairs for LogQuery {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        push_opt(&mut pairs, "keyword", &self.keyword);
        push_opt(&mut pairs, "level", &self.level);
        if let Some(sorter) = &self.sorter {
            sorter.push_pairs(&mut pairs);
        }
        pairs
    }
}

/// Filters and paging for the admin task board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sorter: Option<Sorter>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_task_page_size")]
    pub page_size: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            priority: None,
            tags: Vec::new(),
            sorter: None,
            page: default_page(),
            page_size: default_task_page_size(),
        }
    }
}

impl QueryPairs for TaskQuery {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        push_opt(&mut pairs, "keyword", &self.keyword);
        push_opt(&mut pairs, "status", &self.status);
        push_opt(&mut pairs, "priority", &self.priority);
        push_many(&mut pairs, "tags", &self.tags);
        if let Some(sorter) = &self.sorter {
            sorter.push_pairs(&mut pairs);
        }
        pairs
    }
}
