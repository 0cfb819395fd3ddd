use csv::StringRecord;

use super::loader::LoadError;

/// Untyped columns of the sales export.
///
/// Each field accepts a few header spellings; headers are compared after
/// normalization (see [`normalize_header`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    RowId,
    OrderId,
    OrderDate,
    OrderHour,
    Shift,
    DayOfWeek,
    CustomerName,
    Channel,
    ItemId,
    Sku,
    ItemName,
    Category,
    Size,
    Quantity,
    UnitPrice,
    Revenue,
    UnitCost,
    TotalCost,
    Contribution,
    Margin,
}

const COLUMN_COUNT: usize = 20;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::RowId,
        Column::OrderId,
        Column::OrderDate,
        Column::OrderHour,
        Column::Shift,
        Column::DayOfWeek,
        Column::CustomerName,
        Column::Channel,
        Column::ItemId,
        Column::Sku,
        Column::ItemName,
        Column::Category,
        Column::Size,
        Column::Quantity,
        Column::UnitPrice,
        Column::Revenue,
        Column::UnitCost,
        Column::TotalCost,
        Column::Contribution,
        Column::Margin,
    ];

    /// Canonical column name
    pub fn name(&self) -> &'static str {
        self.header_names()[0]
    }

    /// Accepted (normalized) header names, canonical first
    pub fn header_names(&self) -> &'static [&'static str] {
        match self {
            Column::RowId => &["row_id", "line_id", "id"],
            Column::OrderId => &["order_id"],
            Column::OrderDate => &["order_date", "date"],
            Column::OrderHour => &["order_hour", "hour"],
            Column::Shift => &["shift"],
            Column::DayOfWeek => &["day_of_week", "day_name", "weekday"],
            Column::CustomerName => &["customer_name", "customer"],
            Column::Channel => &["order_type", "channel"],
            Column::ItemId => &["item_id"],
            Column::Sku => &["sku"],
            Column::ItemName => &["item_name", "item"],
            Column::Category => &["category"],
            Column::Size => &["size"],
            Column::Quantity => &["quantity", "qty"],
            Column::UnitPrice => &["unit_price", "price"],
            Column::Revenue => &["revenue", "sales"],
            Column::UnitCost => &["unit_cost"],
            Column::TotalCost => &["total_cost", "cost"],
            Column::Contribution => &["contribution", "profit"],
            Column::Margin => &["margin_pct", "margin", "margin_percent"],
        }
    }

    /// Whether a cell value is this column's own name
    pub fn is_own_name(&self, value: &str) -> bool {
        let normalized = normalize_header(value);
        self.header_names().iter().any(|n| *n == normalized)
    }
}

/// Lowercase, strip a UTF-8 BOM, map spaces/hyphens/dots to `_`.
pub fn normalize_header(s: &str) -> String {
    s.trim_start_matches('\u{FEFF}')
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Position of every column in the source header
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: [usize; COLUMN_COUNT],
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut positions = [0usize; COLUMN_COUNT];
        for (slot, column) in positions.iter_mut().zip(Column::ALL.iter()) {
            *slot = column
                .header_names()
                .iter()
                .find_map(|name| normalized.iter().position(|h| h == name))
                .ok_or(LoadError::MissingColumn(column.name()))?;
        }
        Ok(Self { positions })
    }

    fn position(&self, column: Column) -> usize {
        // Column::ALL is declared in discriminant order
        self.positions[column as usize]
    }

    /// Pick the columns out of a csv record
    pub fn read(&self, line_no: u64, record: &StringRecord) -> RawSalesRow {
        let get = |c: Column| {
            record
                .get(self.position(c))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        RawSalesRow {
            line_no,
            row_id: get(Column::RowId),
            order_id: get(Column::OrderId),
            order_date: get(Column::OrderDate),
            order_hour: get(Column::OrderHour),
            shift: get(Column::Shift),
            day_of_week: get(Column::DayOfWeek),
            customer_name: get(Column::CustomerName),
            channel: get(Column::Channel),
            item_id: get(Column::ItemId),
            sku: get(Column::Sku),
            item_name: get(Column::ItemName),
            category: get(Column::Category),
            size: get(Column::Size),
            quantity: get(Column::Quantity),
            unit_price: get(Column::UnitPrice),
            revenue: get(Column::Revenue),
            unit_cost: get(Column::UnitCost),
            total_cost: get(Column::TotalCost),
            contribution: get(Column::Contribution),
            margin: get(Column::Margin),
        }
    }
}

/// One row of the export with every field still as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSalesRow {
    /// 1-based line in the source, header included
    pub line_no: u64,
    pub row_id: String,
    pub order_id: String,
    pub order_date: String,
    pub order_hour: String,
    pub shift: String,
    pub day_of_week: String,
    pub customer_name: String,
    pub channel: String,
    pub item_id: String,
    pub sku: String,
    pub item_name: String,
    pub category: String,
    pub size: String,
    pub quantity: String,
    pub unit_price: String,
    pub revenue: String,
    pub unit_cost: String,
    pub total_cost: String,
    pub contribution: String,
    pub margin: String,
}

impl RawSalesRow {
    /// Row identifier for error messages; falls back to the source line
    pub fn display_id(&self) -> String {
        if self.row_id.is_empty() {
            format!("line {}", self.line_no)
        } else {
            self.row_id.clone()
        }
    }
}
