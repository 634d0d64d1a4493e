use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheetlens_sheet::{CellValue, Dataset, Record};

/// Bucket label for female values under the default rule
pub const FEMALE: &str = "female";
/// Bucket label for male values under the default rule
pub const MALE: &str = "male";

/// Which column holds the category and how its values map to buckets.
///
/// Column names are tried in order and must match a header exactly; the first
/// non-blank one wins. Bucket values match the cell text exactly unless
/// `ignore_case` is set, in which case both sides are trimmed and lower-cased.
///
/// The default counts `F` and `M` in the `Sexe` column (or its `sexe` and
/// `SEXE` spellings). Anything else only counts toward the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRule {
    pub columns: Vec<String>,
    pub buckets: IndexMap<String, Vec<String>>,
    pub ignore_case: bool,
}

impl Default for CategoryRule {
    fn default() -> Self {
        let mut buckets = IndexMap::new();
        buckets.insert(FEMALE.to_string(), vec!["F".to_string()]);
        buckets.insert(MALE.to_string(), vec!["M".to_string()]);
        CategoryRule {
            columns: vec!["Sexe".to_string(), "sexe".to_string(), "SEXE".to_string()],
            buckets,
            ignore_case: false,
        }
    }
}

impl CategoryRule {
    /// Bucket label for a raw cell value, if any bucket claims it
    #[must_use]
    pub fn bucket_for(&self, value: &CellValue) -> Option<&str> {
        let text = value.to_string();
        if text.is_empty() {
            return None;
        }
        let folded = text.trim().to_lowercase();
        let claims = |candidate: &String| {
            if self.ignore_case {
                candidate.trim().to_lowercase() == folded
            } else {
                *candidate == text
            }
        };
        self.buckets
            .iter()
            .find(|(_, values)| values.iter().any(&claims))
            .map(|(label, _)| label.as_str())
    }
}

/// Find the category value of a record: the first configured column that
/// exists in the record and holds a non-blank value.
pub fn resolve_category<'a>(record: &'a Record, columns: &[String]) -> Option<&'a CellValue> {
    columns
        .iter()
        .filter_map(|column| record.get(column))
        .find(|value| !value.is_blank())
}

/// Aggregate counts derived from a dataset; never stored, always recomputed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub buckets: IndexMap<String, usize>,
    pub total: usize,
}

impl CategoryStats {
    /// Count for one bucket label (zero if the label is unknown)
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.buckets.get(label).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn female(&self) -> usize {
        self.count(FEMALE)
    }

    #[must_use]
    pub fn male(&self) -> usize {
        self.count(MALE)
    }

    /// Records that fell into no bucket
    #[must_use]
    pub fn unclassified(&self) -> usize {
        self.total - self.buckets.values().sum::<usize>()
    }
}

/// Scan every record once and count category buckets
pub fn compute_stats(dataset: &Dataset, rule: &CategoryRule) -> CategoryStats {
    let mut buckets: IndexMap<String, usize> =
        rule.buckets.keys().map(|label| (label.clone(), 0)).collect();

    for record in dataset.records() {
        let label = resolve_category(record, &rule.columns).and_then(|value| rule.bucket_for(value));
        if let Some(count) = label.and_then(|label| buckets.get_mut(label)) {
            *count += 1;
        }
    }

    CategoryStats {
        buckets,
        total: dataset.len(),
    }
}
