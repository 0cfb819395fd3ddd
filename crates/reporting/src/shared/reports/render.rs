use anyhow::Context;
use contracts::shared::report::{CellValue, ColumnType, MeasureKind, ReportTable};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::shared::config::OutputFormat;
use crate::shared::format::{format_amount, format_count, round2, DISPLAY_DECIMALS};

/// Placeholder for undefined values in text output
const NULL_MARKER: &str = "—";

fn table_cell(value: &CellValue, column_type: ColumnType) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => match column_type {
            ColumnType::Measure(MeasureKind::Percent) => format!("{}%", format_amount(*n)),
            _ => format_amount(*n),
        },
        CellValue::Integer(i) => format_count(*i),
        CellValue::Null => NULL_MARKER.to_string(),
    }
}

fn csv_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format!("{:.*}", DISPLAY_DECIMALS, round2(*n)),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Null => String::new(),
    }
}

fn json_cell(value: &CellValue) -> Value {
    match value {
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Number(n) => json!(round2(*n)),
        CellValue::Integer(i) => json!(i),
        CellValue::Null => Value::Null,
    }
}

/// Render as an aligned text table. Measures are right-aligned and
/// percentages carry a `%` sign.
pub fn render_text(table: &ReportTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&table.columns)
                .map(|(value, col)| table_cell(value, col.column_type))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |values: &[String]| -> String {
        table
            .columns
            .iter()
            .zip(values)
            .zip(&widths)
            .map(|((col, value), &width)| match col.column_type {
                ColumnType::Grouping => format!("{value:<width$}"),
                ColumnType::Measure(_) => format!("{value:>width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');

    let header: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    out.push_str(&format_line(&header));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &cells {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    if cells.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

/// Write as CSV with a header of column ids
pub fn write_csv<W: Write>(table: &ReportTable, writer: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns.iter().map(|c| c.id.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(csv_cell))?;
    }
    writer.flush()?;
    Ok(())
}

/// JSON document: report metadata plus one object per row keyed by column id
pub fn to_json(table: &ReportTable) -> Value {
    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(col, value)| (col.id.clone(), json_cell(value)))
                .collect();
            Value::Object(object)
        })
        .collect();

    json!({
        "name": table.name,
        "title": table.title,
        "columns": table.columns,
        "rows": rows,
    })
}

/// Write the JSON document, pretty printed
pub fn write_json<W: Write>(table: &ReportTable, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, &to_json(table))?;
    Ok(())
}

/// Emit a report in the requested format.
///
/// Text tables go to stdout; CSV and JSON are written to `<out_dir>/<name>.<ext>`
/// and the written path is returned.
pub fn emit(table: &ReportTable, format: OutputFormat, out_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let write: fn(&ReportTable, std::fs::File) -> anyhow::Result<()> = match format {
        OutputFormat::Table => {
            println!("{}", render_text(table));
            return Ok(None);
        }
        OutputFormat::Csv => write_csv::<std::fs::File>,
        OutputFormat::Json => write_json::<std::fs::File>,
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.{}", table.name, format.extension()));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    write(table, file).with_context(|| format!("cannot write {}", path.display()))?;

    tracing::info!("Report {} written to {}", table.name, path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::report::ColumnHeader;

    fn table() -> ReportTable {
        let mut table = ReportTable::new(
            "category_performance",
            "Category performance",
            vec![
                ColumnHeader::grouping("category", "Category"),
                ColumnHeader::measure("orders", "Orders", MeasureKind::Count),
                ColumnHeader::measure("revenue", "Revenue", MeasureKind::Money),
                ColumnHeader::measure("margin_pct", "Margin %", MeasureKind::Percent),
            ],
        );
        table.rows = vec![
            vec![
                CellValue::text("Coffee"),
                CellValue::Integer(1200),
                CellValue::Number(15234.5),
                CellValue::Number(46.666_666),
            ],
            vec![
                CellValue::text("Promo"),
                CellValue::Integer(3),
                CellValue::Number(0.0),
                CellValue::Null,
            ],
        ];
        table
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&table());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Category performance");
        assert_eq!(lines[1], "Category  Orders    Revenue  Margin %");
        assert_eq!(lines[3], "Coffee     1,200  15,234.50    46.67%");
        assert_eq!(lines[4], "Promo          3       0.00         —");
    }

    #[test]
    fn test_csv_rounds_and_blanks_nulls() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "category,orders,revenue,margin_pct\nCoffee,1200,15234.50,46.67\nPromo,3,0.00,\n"
        );
    }

    #[test]
    fn test_json_keeps_null_distinct_from_zero() {
        let value = to_json(&table());
        assert_eq!(value["rows"][0]["margin_pct"], json!(46.67));
        assert_eq!(value["rows"][1]["revenue"], json!(0.0));
        assert!(value["rows"][1]["margin_pct"].is_null());
        assert_eq!(value["name"], "category_performance");
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = emit(&table(), OutputFormat::Csv, dir.path()).unwrap().unwrap();
        assert_eq!(path, dir.path().join("category_performance.csv"));
        assert!(std::fs::read_to_string(path).unwrap().starts_with("category,"));
    }
}
