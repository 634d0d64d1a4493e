use serde::{Deserialize, Serialize};

/// Direction of the active sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// The single active sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortDirective {
    #[must_use]
    pub fn ascending(key: &str) -> Self {
        SortDirective {
            key: key.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn descending(key: &str) -> Self {
        SortDirective {
            key: key.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// A 1-based page number plus the page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Half-open index range covered by this page, or `None` for page 0
    #[must_use]
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let start = self.page.checked_sub(1)?.checked_mul(self.page_size)?;
        Some((start, start.saturating_add(self.page_size)))
    }
}

/// Transient view state: free-text filter, sort and current page.
///
/// This is a plain value. The engine reads it and never keeps it; callers
/// mutate their own copy in response to user actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    pub filter: String,
    pub sort: Option<SortDirective>,
    pub page: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        ViewQuery {
            filter: String::new(),
            sort: None,
            page: 1,
        }
    }
}

impl ViewQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ViewQuery::set_filter`]
    #[must_use]
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.set_filter(filter);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortDirective) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Replace the filter text; a new query always starts back on page 1
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.page = 1;
    }

    /// Header click: a second click on an ascending column flips it to
    /// descending, anything else sorts ascending by `key`
    pub fn toggle_sort(&mut self, key: &str) {
        let direction = match &self.sort {
            Some(current) if current.key == key && current.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortDirective {
            key: key.to_string(),
            direction,
        });
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Advance one page, never past `total_pages` (or below page 1)
    pub fn next_page(&mut self, total_pages: usize) {
        self.page = self.page.saturating_add(1).min(total_pages).max(1);
    }

    /// Go back one page, never below page 1
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// How many of {filter text, sort key, page past 1} are active
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        usize::from(!self.filter.trim().is_empty())
            + usize::from(self.sort.is_some())
            + usize::from(self.page > 1)
    }

    /// Reset filter, sort and page in one step
    pub fn clear(&mut self) {
        *self = ViewQuery::default();
    }

    #[must_use]
    pub fn page_request(&self, page_size: usize) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size,
        }
    }
}
