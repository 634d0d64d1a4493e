//! The filter/sort/paginate pipeline.
//!
//! Everything here is a pure function of a dataset snapshot and a
//! [`ViewQuery`]. Equal inputs always give equal output.

use crate::query::{PageRequest, SortDirection, SortDirective, ViewQuery};
use serde::Serialize;
use sheetlens_sheet::{CellValue, Dataset, Record};
use std::cmp::Ordering;

/// Sort key derived from a cell.
///
/// Ordering is `Empty < Number < Text`. Booleans sort as 0/1 numbers and
/// numbers use IEEE total ordering, so the whole thing is a total order.
///
/// Numeric-looking text stays text, so the number `20` sorts before the text
/// `"10"`. Parsing text only when the other side is a number would break
/// transitivity: `9.5 < "10"`, `"10" < "9"` and `"9" < 9.5` form a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparable<'a> {
    Empty,
    Number(f64),
    Text(&'a str),
}

impl Comparable<'_> {
    fn rank(&self) -> u8 {
        match self {
            Comparable::Empty => 0,
            Comparable::Number(_) => 1,
            Comparable::Text(_) => 2,
        }
    }

    /// Compare two keys under the total order described above
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.total_cmp(b),
            (Comparable::Text(a), Comparable::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// The one place cells are coerced for sorting
pub fn to_comparable(value: &CellValue) -> Comparable<'_> {
    match value {
        CellValue::Empty => Comparable::Empty,
        CellValue::String(s) if s.is_empty() => Comparable::Empty,
        CellValue::String(s) => Comparable::Text(s),
        other => other
            .as_number()
            .map_or(Comparable::Empty, Comparable::Number),
    }
}

/// The one place cells are coerced for searching: display text, lower-cased
pub fn to_searchable_string(value: &CellValue) -> String {
    value.to_string().to_lowercase()
}

/// Compare two cells under the sort order
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    to_comparable(a).total_cmp(&to_comparable(b))
}

/// True if any value of `record` contains `needle`.
///
/// `needle` must already be lower-cased; an empty needle matches everything.
pub fn matches_filter(record: &Record, needle: &str) -> bool {
    needle.is_empty()
        || record
            .values()
            .any(|value| to_searchable_string(value).contains(needle))
}

/// Stable sort by one column. A key the records don't have reads as empty
/// everywhere, which leaves the order unchanged.
pub fn sort_records(rows: &mut [&Record], sort: Option<&SortDirective>) {
    let Some(sort) = sort else {
        return;
    };

    let empty = CellValue::Empty;
    rows.sort_by(|a, b| {
        let a = a.get(&sort.key).unwrap_or(&empty);
        let b = b.get(&sort.key).unwrap_or(&empty);
        let ord = compare_values(a, b);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Number of pages needed for `count` rows; zero rows means zero pages
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out one page. Pages outside the data yield an empty slice.
pub fn paginate<T>(rows: &[T], page: PageRequest) -> &[T] {
    let Some((start, end)) = page.bounds() else {
        return &[];
    };
    if start >= rows.len() {
        return &[];
    }
    &rows[start..end.min(rows.len())]
}

/// Every record that passes the filter, in sorted order (not paginated)
pub fn filtered_sorted<'a>(dataset: &'a Dataset, query: &ViewQuery) -> Vec<&'a Record> {
    let needle = query.filter.to_lowercase();

    // Filtering before sorting gives the same sequence: the sort is stable
    // and filtering keeps relative order.
    let mut rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|record| matches_filter(record, &needle))
        .collect();
    sort_records(&mut rows, query.sort.as_ref());
    rows
}

/// One rendered page of the table plus the counts the pager needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View<'a> {
    pub rows: Vec<&'a Record>,
    /// Rows matching the filter, across all pages
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
}

impl View<'_> {
    /// A view with nothing in it
    #[must_use]
    pub fn empty(page: usize) -> Self {
        View {
            rows: Vec::new(),
            total_count: 0,
            total_pages: 0,
            page,
        }
    }
}

/// Run the whole pipeline: filter, sort, then cut out the requested page
pub fn filter_sort_paginate<'a>(dataset: &'a Dataset, query: &ViewQuery, page_size: usize) -> View<'a> {
    let filtered = filtered_sorted(dataset, query);
    let rows = paginate(&filtered, query.page_request(page_size)).to_vec();

    tracing::trace!(
        matched = filtered.len(),
        page = query.page,
        returned = rows.len(),
        "filter_sort_paginate"
    );

    View {
        total_count: filtered.len(),
        total_pages: total_pages(filtered.len(), page_size),
        page: query.page,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Dataset {
        Dataset::from_rows(
            "people.xlsx",
            vec!["Name".to_string(), "Sexe".to_string(), "Age".to_string()],
            vec![
                vec![CellValue::from("A"), CellValue::from("F"), CellValue::Int(40)],
                vec![CellValue::from("B"), CellValue::from("M"), CellValue::Empty],
                vec![CellValue::from("C"), CellValue::from("F"), CellValue::Float(7.5)],
            ],
        )
    }

    fn names(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r["Name"].to_string()).collect()
    }

    #[test]
    fn test_comparable_order() {
        assert_eq!(compare_values(&CellValue::Empty, &CellValue::Int(-5)), Ordering::Less);
        assert_eq!(compare_values(&CellValue::Int(2), &CellValue::Float(10.0)), Ordering::Less);
        assert_eq!(compare_values(&CellValue::Int(99), &CellValue::from("1")), Ordering::Less);
        assert_eq!(compare_values(&CellValue::from("B"), &CellValue::from("a")), Ordering::Less);
        assert_eq!(compare_values(&CellValue::Bool(true), &CellValue::Int(1)), Ordering::Equal);
    }

    #[test]
    fn test_numeric_text_sorts_after_numbers() {
        let dataset = Dataset::from_rows(
            "mixed.xlsx",
            vec!["Name".to_string(), "Code".to_string()],
            vec![
                vec![CellValue::from("ten"), CellValue::from("10")],
                vec![CellValue::from("five"), CellValue::Int(5)],
                vec![CellValue::from("twenty"), CellValue::Int(20)],
                vec![CellValue::from("nine"), CellValue::from("9")],
            ],
        );

        let query = ViewQuery::new().with_sort(SortDirective::ascending("Code"));
        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["five", "twenty", "ten", "nine"]);

        let query = ViewQuery::new().with_sort(SortDirective::descending("Code"));
        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["nine", "ten", "twenty", "five"]);
    }

    #[test]
    fn test_searchable_string() {
        assert_eq!(to_searchable_string(&CellValue::from("HeLLo")), "hello");
        assert_eq!(to_searchable_string(&CellValue::Float(2.0)), "2");
        assert_eq!(to_searchable_string(&CellValue::Bool(false)), "false");
        assert_eq!(to_searchable_string(&CellValue::Empty), "");
    }

    #[test]
    fn test_sort_descending() {
        let dataset = people();
        let query = ViewQuery::new().with_sort(SortDirective::descending("Name"));

        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_mixed_numbers_and_blanks() {
        let dataset = people();
        let query = ViewQuery::new().with_sort(SortDirective::ascending("Age"));

        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_ties_keep_order() {
        let dataset = people();
        let query = ViewQuery::new().with_sort(SortDirective::descending("Sexe"));

        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_unknown_sort_key_is_noop() {
        let dataset = people();
        let query = ViewQuery::new().with_sort(SortDirective::descending("Nope"));

        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(names(&view.rows), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let dataset = people();
        let view = filter_sort_paginate(&dataset, &ViewQuery::new().with_filter("b"), 10);
        assert_eq!(names(&view.rows), vec!["B"]);
        assert_eq!(view.total_count, 1);
    }

    #[test]
    fn test_filter_matches_numbers_not_headers() {
        let dataset = people();

        let view = filter_sort_paginate(&dataset, &ViewQuery::new().with_filter("7.5"), 10);
        assert_eq!(names(&view.rows), vec!["C"]);

        let view = filter_sort_paginate(&dataset, &ViewQuery::new().with_filter("sexe"), 10);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_paginate_bounds() {
        let rows: Vec<usize> = (0..25).collect();

        assert_eq!(paginate(&rows, PageRequest { page: 1, page_size: 10 }).len(), 10);
        assert_eq!(paginate(&rows, PageRequest { page: 3, page_size: 10 }), &[20, 21, 22, 23, 24]);
        assert!(paginate(&rows, PageRequest { page: 4, page_size: 10 }).is_empty());
        assert!(paginate(&rows, PageRequest { page: 0, page_size: 10 }).is_empty());
        assert!(paginate(&rows, PageRequest { page: usize::MAX, page_size: 10 }).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        let query = ViewQuery::new().with_sort(SortDirective::ascending("Name"));

        let view = filter_sort_paginate(&dataset, &query, 10);
        assert_eq!(view, View::empty(1));
    }
}
