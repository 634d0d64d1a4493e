use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single cell value as read from a workbook.
///
/// `Empty` is the blank sentinel: missing, null and empty-string cells all
/// collapse to it, and it serializes as `""`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCell")]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Untagged wire form accepted when deserializing cells.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Null(()),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Null(()) => CellValue::Empty,
            RawCell::Bool(b) => CellValue::Bool(b),
            RawCell::Int(i) => CellValue::Int(i),
            RawCell::Float(f) => CellValue::Float(f),
            RawCell::String(s) if s.is_empty() => CellValue::Empty,
            RawCell::String(s) => CellValue::String(s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl CellValue {
    /// Check if the value is blank (the empty sentinel or an empty string)
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Collapse blank values to `Empty`, leaving everything else as-is
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.is_blank() {
            CellValue::Empty
        } else {
            self
        }
    }

    /// Numeric view of the value; booleans count as 0/1
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(_) | CellValue::Empty => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s).normalized()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string()).normalized()
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::String(String::new()).is_blank());
        assert!(!CellValue::String(" ".to_string()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_empty_string_converts_to_sentinel() {
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from(None::<i64>), CellValue::Empty);
        assert_eq!(CellValue::from("x"), CellValue::String("x".to_string()));
    }

    #[test]
    fn test_display_matches_cell_text() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_serialize_uses_empty_string_sentinel() {
        let json = serde_json::to_string(&vec![
            CellValue::Empty,
            CellValue::Int(7),
            CellValue::String("F".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"["",7,"F"]"#);
    }

    #[test]
    fn test_deserialize_untagged() {
        let cells: Vec<CellValue> = serde_json::from_str(r#"[null, "", true, 3, 2.5, "M"]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Bool(true),
                CellValue::Int(3),
                CellValue::Float(2.5),
                CellValue::String("M".to_string()),
            ]
        );
    }
}
