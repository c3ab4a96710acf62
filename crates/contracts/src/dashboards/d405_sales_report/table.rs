use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dimension::{Dimension, HIERARCHY_ORDER};
use super::report::{lowest_active_dimension, ReportParams, ReportRequest, ValidationError};
use super::store::SelectionMap;

/// Pages shown without ellipsis grouping.
pub const MAX_PLAIN_PAGES: u32 = 6;

/// Pages shown on each side of the current one when grouping.
const PAGE_WINDOW: u32 = 2;

/// Fixed columns around the dimension column(s).
const LEADING_COLUMNS: [&str; 1] = ["date"];
const TRAILING_COLUMNS: [&str; 2] = ["quantity", "amount"];

/// Display text of `row[column]`: strings as-is, numbers in decimal form,
/// null or missing as empty.
pub fn cell_text(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Plain rendered table: column keys plus text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One page of `POST /api/table`, replaced wholesale on every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePage {
    pub rows: Vec<Value>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_rows: u64,
    pub next_page: bool,
    pub previous_page: bool,
}

impl TablePage {
    /// Reads a page response. Rows come from `data`, falling back to `rows`;
    /// anything missing reads as empty or zero.
    pub fn from_value(value: &Value) -> TablePage {
        let rows = ["data", "rows"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default();
        let number = |key: &str| value.get(key).and_then(Value::as_u64).unwrap_or(0);
        let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
        TablePage {
            rows,
            current_page: number("current_page") as u32,
            total_pages: number("total_pages") as u32,
            total_rows: number("total_rows"),
            next_page: flag("next_page"),
            previous_page: flag("previous_page"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders rows for the given columns.
    pub fn to_table(&self, columns: &[String]) -> DataTable {
        DataTable {
            columns: columns.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| columns.iter().map(|c| cell_text(row, c)).collect())
                .collect(),
        }
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        page_buttons(self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

/// Numbered page buttons for the server-reported position.
///
/// Up to six pages are listed in full. Beyond that: first page, a two-page
/// window around the current one, last page, with an ellipsis for each gap.
pub fn page_buttons(current_page: u32, total_pages: u32) -> Vec<PageButton> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= MAX_PLAIN_PAGES {
        return (1..=total_pages).map(PageButton::Page).collect();
    }
    let current = current_page.clamp(1, total_pages);
    let start = current.saturating_sub(PAGE_WINDOW).max(2);
    let end = (current + PAGE_WINDOW).min(total_pages - 1);

    let mut buttons = vec![PageButton::Page(1)];
    if start > 2 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.extend((start..=end).map(PageButton::Page));
    if end < total_pages - 1 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.push(PageButton::Page(total_pages));
    buttons
}

/// Dimension column(s) of the table for the current selections.
///
/// One column for the lowest active dimension, except for the customer group
/// (Channel Category / Customer Category / Customer), where every selected member
/// of the group contributes its column.
pub fn dynamic_columns(selections: &SelectionMap) -> Vec<String> {
    let Some(lowest) = lowest_active_dimension(selections) else {
        return Vec::new();
    };
    if !lowest.is_customer_group() {
        return vec![lowest.column_key()];
    }
    HIERARCHY_ORDER
        .iter()
        .filter(|dim| dim.is_customer_group())
        .filter(|dim| selections.get(*dim).is_some_and(|ids| !ids.is_empty()))
        .map(|dim| dim.column_key())
        .collect()
}

/// Columns rendered in the on-screen table.
pub fn table_columns(selections: &SelectionMap) -> Vec<String> {
    let mut columns: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(dynamic_columns(selections));
    columns.extend(TRAILING_COLUMNS.iter().map(|c| c.to_string()));
    columns
}

/// Deduplicates rendered columns, keeping first occurrence order.
pub fn export_show_columns(rendered: &[String]) -> Vec<String> {
    let mut show: Vec<String> = Vec::with_capacity(rendered.len());
    for column in rendered {
        if !show.contains(column) {
            show.push(column.clone());
        }
    }
    show
}

/// Aggregation window of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataView {
    #[default]
    Default,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl DataView {
    pub fn all() -> [DataView; 5] {
        [
            DataView::Default,
            DataView::Daily,
            DataView::Weekly,
            DataView::Monthly,
            DataView::Yearly,
        ]
    }

    pub fn code(self) -> &'static str {
        match self {
            DataView::Default => "default",
            DataView::Daily => "daily",
            DataView::Weekly => "weekly",
            DataView::Monthly => "monthly",
            DataView::Yearly => "yearly",
        }
    }

    pub fn from_code(code: &str) -> Option<DataView> {
        Self::all().into_iter().find(|v| v.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            DataView::Default => "As shown",
            DataView::Daily => "Daily",
            DataView::Weekly => "Weekly",
            DataView::Monthly => "Monthly",
            DataView::Yearly => "Yearly",
        }
    }
}

/// Body of `POST /api/export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub request: ReportRequest,
    pub dataview: DataView,
    /// Column keys to export; only sent for the default view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<Vec<String>>,
}

impl ExportRequest {
    /// Same single-dimension scoping as the table request. For the default view the
    /// `show` list mirrors the rendered table columns.
    pub fn build(
        params: &ReportParams,
        selections: &SelectionMap,
        dataview: DataView,
        rendered_columns: &[String],
    ) -> Result<ExportRequest, ValidationError> {
        let request = ReportRequest::table(params, selections)?;
        let show = match dataview {
            DataView::Default => Some(export_show_columns(rendered_columns)),
            _ => None,
        };
        Ok(ExportRequest {
            request,
            dataview,
            show,
        })
    }

    pub fn file_name(&self) -> String {
        export_file_name(self.request.window.from_date, self.request.window.to_date)
    }
}

pub fn export_file_name(from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "sales-report-{}-to-{}.xlsx",
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}

/// Dimension owning a dynamic column key, if any.
pub fn column_dimension(column: &str) -> Option<Dimension> {
    HIERARCHY_ORDER
        .iter()
        .copied()
        .find(|dim| dim.column_key() == column)
}

/// Header text for a column key.
pub fn column_title(column: &str) -> String {
    if let Some(dim) = column_dimension(column) {
        return dim.display_name().to_string();
    }
    match column {
        "date" => "Date".to_string(),
        "quantity" => "Quantity".to_string(),
        "amount" => "Amount".to_string(),
        other => other.replace('_', " "),
    }
}
