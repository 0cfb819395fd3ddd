use chrono::NaiveDate;
use contracts::projections::p900_sales_lines::{LoadStats, SalesLine};
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

use super::raw::{Column, ColumnMap, RawSalesRow};
use crate::shared::config::{get_dataset_path, Config, DatasetConfig};

/// A field that could not be cast to its declared type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row_id}: invalid {field} {value:?}: {reason}")]
pub struct ParseError {
    pub row_id: String,
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// Errors that abort a snapshot load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column {0:?} not found in header")]
    MissingColumn(&'static str),

    #[error("delimiter {0:?} is not an ASCII character")]
    InvalidDelimiter(char),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("duplicate row identifier {0}")]
    DuplicateRowId(String),
}

/// Typed, immutable sales lines of one analysis snapshot
#[derive(Debug, Clone, Default)]
pub struct SalesSnapshot {
    lines: Vec<SalesLine>,
    stats: LoadStats,
}

impl SalesSnapshot {
    /// Build a snapshot from already typed lines
    pub fn from_lines(lines: Vec<SalesLine>) -> Self {
        let stats = LoadStats {
            raw_rows: lines.len(),
            header_artifacts: 0,
            loaded_rows: lines.len(),
        };
        Self { lines, stats }
    }

    pub fn lines(&self) -> &[SalesLine] {
        &self.lines
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Load the snapshot named by the configuration
pub fn load_snapshot(config: &Config) -> Result<SalesSnapshot, LoadError> {
    let path = get_dataset_path(config);
    tracing::info!("Loading sales snapshot from {}", path.display());

    let file = std::fs::File::open(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    load_from_reader(file, &config.dataset)
}

/// Load a snapshot from any CSV source
pub fn load_from_reader<R: Read>(
    reader: R,
    dataset: &DatasetConfig,
) -> Result<SalesSnapshot, LoadError> {
    let delimiter = dataset
        .delimiter_byte()
        .map_err(|_| LoadError::InvalidDelimiter(dataset.delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    tracing::debug!("Sales CSV headers: {:?}", headers.iter().collect::<Vec<_>>());
    let columns = ColumnMap::from_headers(&headers)?;

    let mut stats = LoadStats::default();
    let mut lines = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for result in reader.records() {
        let record = result?;
        stats.raw_rows += 1;

        let line_no = record
            .position()
            .map(|p| p.line())
            .unwrap_or(stats.raw_rows as u64 + 1);
        let raw = columns.read(line_no, &record);

        if record.len() != headers.len() {
            return Err(ParseError {
                row_id: raw.display_id(),
                field: "record",
                value: format!("{} fields", record.len()),
                reason: format!("expected {} fields", headers.len()),
            }
            .into());
        }

        if is_header_artifact(&raw) {
            tracing::debug!("Dropping re-imported header row at line {}", line_no);
            stats.header_artifacts += 1;
            continue;
        }

        let line = parse_row(&raw, dataset)?;
        if !seen_ids.insert(line.row_id.clone()) {
            return Err(LoadError::DuplicateRowId(line.row_id));
        }
        lines.push(line);

        if stats.raw_rows % 10_000 == 0 {
            tracing::debug!("Sales snapshot progress: {} rows read", stats.raw_rows);
        }
    }

    stats.loaded_rows = lines.len();
    tracing::info!(
        "Sales snapshot loaded: {} raw rows, {} header artifacts dropped, {} lines",
        stats.raw_rows,
        stats.header_artifacts,
        stats.loaded_rows
    );

    Ok(SalesSnapshot { lines, stats })
}

/// Header rows that were re-imported as data carry their column names in the
/// numeric fields.
pub fn is_header_artifact(raw: &RawSalesRow) -> bool {
    Column::Quantity.is_own_name(&raw.quantity)
        || Column::UnitPrice.is_own_name(&raw.unit_price)
        || Column::Revenue.is_own_name(&raw.revenue)
}

/// Cast one raw row into a typed sales line
pub fn parse_row(raw: &RawSalesRow, dataset: &DatasetConfig) -> Result<SalesLine, ParseError> {
    let row_id = raw.display_id();
    let err = |field: &'static str, value: &str, reason: String| ParseError {
        row_id: row_id.clone(),
        field,
        value: value.to_string(),
        reason,
    };

    if raw.row_id.is_empty() {
        return Err(err(Column::RowId.name(), "", "row identifier is empty".into()));
    }

    let order_date = NaiveDate::parse_from_str(&raw.order_date, &dataset.date_format)
        .map_err(|e| {
            err(
                Column::OrderDate.name(),
                &raw.order_date,
                format!("expected {}: {e}", dataset.date_format),
            )
        })?;

    let order_hour = raw
        .order_hour
        .parse::<u8>()
        .ok()
        .filter(|h| *h <= 23)
        .ok_or_else(|| {
            err(
                Column::OrderHour.name(),
                &raw.order_hour,
                "expected an hour between 0 and 23".into(),
            )
        })?;

    let quantity = raw
        .quantity
        .parse::<i64>()
        .map_err(|e| err(Column::Quantity.name(), &raw.quantity, e.to_string()))?;
    if quantity <= 0 {
        return Err(err(
            Column::Quantity.name(),
            &raw.quantity,
            "quantity must be positive".into(),
        ));
    }

    let decimal = |column: Column, value: &str| {
        parse_decimal(value).ok_or_else(|| err(column.name(), value, "not a number".into()))
    };
    let unit_price = decimal(Column::UnitPrice, &raw.unit_price)?;
    let revenue = decimal(Column::Revenue, &raw.revenue)?;
    let unit_cost = decimal(Column::UnitCost, &raw.unit_cost)?;
    let total_cost = decimal(Column::TotalCost, &raw.total_cost)?;
    let contribution = decimal(Column::Contribution, &raw.contribution)?;

    let margin = parse_percentage(&raw.margin)
        .map_err(|reason| err(Column::Margin.name(), &raw.margin, reason))?
        .filter(|_| revenue != 0.0);

    Ok(SalesLine {
        row_id: raw.row_id.clone(),
        order_id: raw.order_id.clone(),
        order_date,
        order_hour,
        shift: raw.shift.clone(),
        day_of_week: raw.day_of_week.clone(),
        customer_name: raw.customer_name.clone(),
        channel: raw.channel.clone(),
        item_id: raw.item_id.clone(),
        sku: raw.sku.clone(),
        item_name: raw.item_name.clone(),
        category: raw.category.clone(),
        size: raw.size.clone(),
        quantity,
        unit_price,
        revenue,
        unit_cost,
        total_cost,
        contribution,
        margin,
    })
}

/// Parse decimal number that may use comma as decimal separator
fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// "62.5%" -> 0.625, "" -> None
pub fn parse_percentage(s: &str) -> Result<Option<f64>, String> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if number.is_empty() {
        return Ok(None);
    }
    parse_decimal(number)
        .map(|v| Some(v / 100.0))
        .ok_or_else(|| "not a percentage".to_string())
}
