use serde::{Deserialize, Serialize};

/// A named result table produced by the report catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTable {
    /// Report identifier (e.g., "category_performance")
    pub name: String,
    /// Human readable title
    pub title: String,
    pub columns: Vec<ColumnHeader>,
    /// Row values, positionally aligned with `columns`
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    pub fn new(name: &str, title: &str, columns: Vec<ColumnHeader>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of the column with the given id
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Cell at `row` in the column with the given id
    pub fn cell(&self, row: usize, column_id: &str) -> Option<&CellValue> {
        let idx = self.column_index(column_id)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}

/// Column header information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Column identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Column type
    pub column_type: ColumnType,
}

impl ColumnHeader {
    pub fn grouping(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            column_type: ColumnType::Grouping,
        }
    }

    pub fn measure(id: &str, name: &str, kind: MeasureKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            column_type: ColumnType::Measure(kind),
        }
    }
}

/// Type of column in a report table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Grouping / label column
    Grouping,
    /// Aggregated numeric column
    Measure(MeasureKind),
}

/// How a measure is presented. Money and percentages round to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    Money,
    Percent,
    Ratio,
    Count,
}

/// Value in a report table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Integer value
    Integer(i64),
    /// Undefined value (e.g. a ratio with a zero denominator)
    Null,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(_) | CellValue::Null => None,
        }
    }
}
