//! Decoder-neutral cell grid and the whole-workbook JSON capture

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// A single cell value, independent of the decoding library
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// True for missing cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell rendered as text; blank cells become an empty string
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(f) => f.to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }

    /// Numeric value of the cell, accepting numeric text
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(f) => *f,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::Null,
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Integer(i) => Value::from(*i),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            CellValue::Error(e) => Value::String(e.clone()),
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// One worksheet as a rectangular grid anchored at A1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Sheet {
    /// Build a sheet from rows; short rows are padded to the widest row
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self {
            name: name.into(),
            rows,
            width,
        }
    }

    /// Number of rows from row 1 to the last used row
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns from column A to the last used column
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at an absolute 0-indexed (row, col); out-of-range cells are empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Row records using the first row as column labels.
    ///
    /// Blank labels become `Unnamed: <index>`; repeated labels get `.1`, `.2`
    /// suffixes so every record keeps every column.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        let Some(header) = self.rows.first() else {
            return Vec::new();
        };
        let labels = column_labels(header);

        self.rows
            .iter()
            .skip(1)
            .map(|row| {
                labels
                    .iter()
                    .zip(row.iter())
                    .map(|(label, cell)| (label.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }
}

fn column_labels(header: &[CellValue]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let base = if cell.is_blank() {
            format!("Unnamed: {}", idx)
        } else {
            cell.to_text()
        };
        let mut label = base.clone();
        let mut n = 1;
        while labels.contains(&label) {
            label = format!("{}.{}", base, n);
            n += 1;
        }
        labels.push(label);
    }
    labels
}

/// All sheets of a decoded workbook, in workbook order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedWorkbook {
    pub sheets: Vec<Sheet>,
}

impl LoadedWorkbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Ordered JSON object: sheet name -> array of row records
    pub fn capture(&self) -> Value {
        let mut root = Map::new();
        for sheet in &self.sheets {
            let records = sheet.records().into_iter().map(Value::Object).collect();
            root.insert(sheet.name.clone(), Value::Array(records));
        }
        Value::Object(root)
    }

    /// The capture serialized as JSON text (non-ASCII kept as-is)
    pub fn capture_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.capture())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_sheet_pads_short_rows() {
        let sheet = Sheet::new("s", vec![vec![text("a")], vec![text("b"), text("c"), text("d")]]);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.cell(0, 2), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 9), &CellValue::Empty);
    }

    #[test]
    fn test_blank_and_text() {
        assert!(CellValue::Empty.is_blank());
        assert!(text("  ").is_blank());
        assert!(!text("x").is_blank());
        assert_eq!(CellValue::Integer(3).to_text(), "3");
        assert_eq!(CellValue::Number(1.5).to_text(), "1.5");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(CellValue::Number(1.5).to_number(), Some(1.5));
        assert_eq!(CellValue::Integer(3).to_number(), Some(3.0));
        assert_eq!(text(" 2.25 ").to_number(), Some(2.25));
        assert_eq!(text("abc").to_number(), None);
        assert_eq!(text("NaN").to_number(), None);
        assert_eq!(CellValue::Empty.to_number(), None);
    }

    #[test]
    fn test_records_use_header_labels() {
        let sheet = Sheet::new(
            "schedule",
            vec![
                vec![text("no"), CellValue::Empty, text("no")],
                vec![CellValue::Integer(1), text("4月8日"), CellValue::Empty],
            ],
        );
        let records = sheet.records();
        assert_eq!(records.len(), 1);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["no", "Unnamed: 1", "no.1"]);
        assert_eq!(records[0]["Unnamed: 1"], Value::String("4月8日".into()));
        assert_eq!(records[0]["no.1"], Value::Null);
    }

    #[test]
    fn test_capture_keeps_sheet_order_and_unicode() {
        let workbook = LoadedWorkbook::new(vec![
            Sheet::new("基本情報", vec![vec![text("担当")]]),
            Sheet::new("スケジュール", vec![]),
        ]);
        let json = workbook.capture_json().unwrap();
        assert_eq!(json, r#"{"基本情報":[],"スケジュール":[]}"#);
    }
}
