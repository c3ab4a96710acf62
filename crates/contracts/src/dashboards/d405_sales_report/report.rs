use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::catalog::{resolve_number, resolve_text};
use super::dimension::{Dimension, DimensionGroup, HIERARCHY_ORDER};
use super::store::SelectionMap;
use super::table::{cell_text, DataTable};

/// Allowed values of the "display quantity" (top-N) selector.
pub const DISPLAY_QUANTITY_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// Measure the report aggregates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Quantity,
    Amount,
}

impl SearchType {
    pub fn all() -> [SearchType; 2] {
        [SearchType::Quantity, SearchType::Amount]
    }

    pub fn code(self) -> &'static str {
        match self {
            SearchType::Quantity => "quantity",
            SearchType::Amount => "amount",
        }
    }

    pub fn from_code(code: &str) -> Option<SearchType> {
        Self::all().into_iter().find(|t| t.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchType::Quantity => "Quantity",
            SearchType::Amount => "Amount",
        }
    }
}

/// Validation failures raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a date range first")]
    MissingDateRange,

    #[error("From date {from} is after to date {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Select a search type first")]
    MissingSearchType,

    #[error("Select a display quantity first")]
    MissingDisplayQuantity,

    #[error("Select at least one filter value")]
    NoSelection,

    #[error("Dashboard view supports Company, Region, Area and Warehouse only; clear: {0}")]
    DashboardScope(String),
}

/// User-editable report inputs. `None` means "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search_type: Option<SearchType>,
    pub display_quantity: Option<u32>,
}

/// Validated report inputs, the common part of every report request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub search_type: SearchType,
    pub display_quantity: u32,
}

impl ReportParams {
    pub fn validate(&self) -> Result<ReportWindow, ValidationError> {
        let (Some(from_date), Some(to_date)) = (self.from_date, self.to_date) else {
            return Err(ValidationError::MissingDateRange);
        };
        if from_date > to_date {
            return Err(ValidationError::InvalidDateRange {
                from: from_date,
                to: to_date,
            });
        }
        let search_type = self.search_type.ok_or(ValidationError::MissingSearchType)?;
        let display_quantity = self
            .display_quantity
            .filter(|q| *q > 0)
            .ok_or(ValidationError::MissingDisplayQuantity)?;
        Ok(ReportWindow {
            from_date,
            to_date,
            search_type,
            display_quantity,
        })
    }
}

/// The most granular dimension with a non-empty selection, `None` if nothing is selected.
/// Independent of the order dimensions were activated in.
pub fn lowest_active_dimension(selections: &SelectionMap) -> Option<Dimension> {
    HIERARCHY_ORDER
        .iter()
        .rev()
        .copied()
        .find(|dim| selections.get(dim).is_some_and(|ids| !ids.is_empty()))
}

/// Report level: the lowest active dimension, `Company` when nothing is selected.
pub fn compute_report_level(selections: &SelectionMap) -> Dimension {
    lowest_active_dimension(selections).unwrap_or(Dimension::Company)
}

/// Selected ids as integers. Ids that are not integers are dropped.
pub fn parse_ids(ids: &[String]) -> Vec<i64> {
    ids.iter()
        .filter_map(|id| id.trim().parse::<i64>().ok())
        .collect()
}

/// Per-dimension id filters of a report request.
///
/// Dashboard requests carry all eleven fields; table and export requests carry
/// exactly the lowest active one. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salesman_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_category_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_category_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ids: Option<Vec<i64>>,
}

impl DimensionFilters {
    pub fn slot(&self, dim: Dimension) -> Option<&Vec<i64>> {
        match dim {
            Dimension::Company => self.company_ids.as_ref(),
            Dimension::Region => self.region_ids.as_ref(),
            Dimension::Area => self.area_ids.as_ref(),
            Dimension::Warehouse => self.warehouse_ids.as_ref(),
            Dimension::Route => self.route_ids.as_ref(),
            Dimension::Salesman => self.salesman_ids.as_ref(),
            Dimension::ItemCategory => self.item_category_ids.as_ref(),
            Dimension::Item => self.item_ids.as_ref(),
            Dimension::ChannelCategory => self.channel_category_ids.as_ref(),
            Dimension::CustomerCategory => self.customer_category_ids.as_ref(),
            Dimension::Customer => self.customer_ids.as_ref(),
        }
    }

    fn slot_mut(&mut self, dim: Dimension) -> &mut Option<Vec<i64>> {
        match dim {
            Dimension::Company => &mut self.company_ids,
            Dimension::Region => &mut self.region_ids,
            Dimension::Area => &mut self.area_ids,
            Dimension::Warehouse => &mut self.warehouse_ids,
            Dimension::Route => &mut self.route_ids,
            Dimension::Salesman => &mut self.salesman_ids,
            Dimension::ItemCategory => &mut self.item_category_ids,
            Dimension::Item => &mut self.item_ids,
            Dimension::ChannelCategory => &mut self.channel_category_ids,
            Dimension::CustomerCategory => &mut self.customer_category_ids,
            Dimension::Customer => &mut self.customer_ids,
        }
    }

    pub fn set(&mut self, dim: Dimension, ids: Vec<i64>) {
        *self.slot_mut(dim) = Some(ids);
    }

    /// Every dimension present, empty where nothing is selected.
    pub fn all_from(selections: &SelectionMap) -> Self {
        let mut filters = Self::default();
        for dim in HIERARCHY_ORDER {
            let ids = selections.get(&dim).map(|ids| parse_ids(ids)).unwrap_or_default();
            filters.set(dim, ids);
        }
        filters
    }

    /// Only the lowest active dimension; ancestors are dropped.
    pub fn lowest_from(selections: &SelectionMap) -> Self {
        let mut filters = Self::default();
        if let Some(dim) = lowest_active_dimension(selections) {
            filters.set(dim, parse_ids(&selections[&dim]));
        }
        filters
    }

    /// Dimensions with a field present, in hierarchy order.
    pub fn present(&self) -> Vec<Dimension> {
        HIERARCHY_ORDER
            .iter()
            .copied()
            .filter(|dim| self.slot(*dim).is_some())
            .collect()
    }
}

/// Body of `POST /api/dashboard` and `POST /api/table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub window: ReportWindow,
    #[serde(flatten)]
    pub filters: DimensionFilters,
}

impl ReportRequest {
    /// Dashboard request: fail-fast validation, then all eleven id arrays.
    pub fn dashboard(
        params: &ReportParams,
        selections: &SelectionMap,
    ) -> Result<ReportRequest, ValidationError> {
        let window = params.validate()?;
        if !selections.values().any(|ids| !ids.is_empty()) {
            return Err(ValidationError::NoSelection);
        }
        let blocked = dashboard_blocked_dimensions(selections);
        if !blocked.is_empty() {
            let names: Vec<&str> = blocked.iter().map(|d| d.display_name()).collect();
            return Err(ValidationError::DashboardScope(names.join(", ")));
        }
        Ok(ReportRequest {
            window,
            filters: DimensionFilters::all_from(selections),
        })
    }

    /// Table request: the lowest active dimension only, zero filters allowed.
    pub fn table(
        params: &ReportParams,
        selections: &SelectionMap,
    ) -> Result<ReportRequest, ValidationError> {
        Ok(ReportRequest {
            window: params.validate()?,
            filters: DimensionFilters::lowest_from(selections),
        })
    }
}

/// Selected dimensions outside the four hierarchy-pinned ones.
pub fn dashboard_blocked_dimensions(selections: &SelectionMap) -> Vec<Dimension> {
    selections
        .iter()
        .filter(|(dim, ids)| dim.group() != DimensionGroup::Hierarchy && !ids.is_empty())
        .map(|(dim, _)| *dim)
        .collect()
}

/// Rendering branch of the dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    Company,
    Region,
    Area,
    Warehouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Donut,
    Column3d,
    TrendArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    /// Key under `charts` in the dashboard payload
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
}

const COMPANY_LAYOUT: [ChartSpec; 3] = [
    ChartSpec { key: "region_sales", title: "Sales by Region", kind: ChartKind::Pie },
    ChartSpec { key: "top_items", title: "Top Items", kind: ChartKind::Column3d },
    ChartSpec { key: "sales_trend", title: "Sales Trend", kind: ChartKind::TrendArea },
];

const REGION_LAYOUT: [ChartSpec; 3] = [
    ChartSpec { key: "area_sales", title: "Sales by Area", kind: ChartKind::Donut },
    ChartSpec { key: "top_items", title: "Top Items", kind: ChartKind::Column3d },
    ChartSpec { key: "sales_trend", title: "Sales Trend", kind: ChartKind::TrendArea },
];

const AREA_LAYOUT: [ChartSpec; 3] = [
    ChartSpec { key: "warehouse_sales", title: "Sales by Warehouse", kind: ChartKind::Donut },
    ChartSpec { key: "top_salesmen", title: "Top Salesmen", kind: ChartKind::Column3d },
    ChartSpec { key: "sales_trend", title: "Sales Trend", kind: ChartKind::TrendArea },
];

const WAREHOUSE_LAYOUT: [ChartSpec; 3] = [
    ChartSpec { key: "salesman_sales", title: "Sales by Salesman", kind: ChartKind::Pie },
    ChartSpec { key: "top_customers", title: "Top Customers", kind: ChartKind::Column3d },
    ChartSpec { key: "sales_trend", title: "Sales Trend", kind: ChartKind::TrendArea },
];

impl ReportLevel {
    /// Branch for a report level; non-hierarchy dimensions have none.
    pub fn from_dimension(dim: Dimension) -> Option<ReportLevel> {
        match dim {
            Dimension::Company => Some(ReportLevel::Company),
            Dimension::Region => Some(ReportLevel::Region),
            Dimension::Area => Some(ReportLevel::Area),
            Dimension::Warehouse => Some(ReportLevel::Warehouse),
            _ => None,
        }
    }

    pub fn for_selections(selections: &SelectionMap) -> Option<ReportLevel> {
        Self::from_dimension(compute_report_level(selections))
    }

    pub fn from_code(code: &str) -> Option<ReportLevel> {
        Dimension::from_slug(code).and_then(Self::from_dimension)
    }

    pub fn layout(self) -> &'static [ChartSpec] {
        match self {
            ReportLevel::Company => &COMPANY_LAYOUT,
            ReportLevel::Region => &REGION_LAYOUT,
            ReportLevel::Area => &AREA_LAYOUT,
            ReportLevel::Warehouse => &WAREHOUSE_LAYOUT,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportLevel::Company => "Company overview",
            ReportLevel::Region => "Region overview",
            ReportLevel::Area => "Area overview",
            ReportLevel::Warehouse => "Warehouse overview",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

const POINT_LABEL_FIELDS: [&str; 4] = ["label", "name", "title", "period"];
const POINT_VALUE_FIELDS: [&str; 4] = ["value", "total", "amount", "quantity"];

/// Response of `POST /api/dashboard`.
///
/// Sections are kept as raw JSON and read through tolerant accessors: a missing
/// or malformed section reads as empty instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    #[serde(default)]
    pub level: Value,
    #[serde(default)]
    pub charts: Value,
    #[serde(default)]
    pub tables: Value,
    #[serde(default)]
    pub summary: Value,
}

impl DashboardPayload {
    /// Level reported by the server, if it names one of the four branches.
    pub fn level(&self) -> Option<ReportLevel> {
        self.level.as_str().and_then(ReportLevel::from_code)
    }

    pub fn series(&self, key: &str) -> Vec<ChartPoint> {
        let Some(points) = self.charts.get(key).and_then(Value::as_array) else {
            return Vec::new();
        };
        points
            .iter()
            .filter_map(|point| {
                let label = resolve_text(point, &POINT_LABEL_FIELDS)?;
                let value = resolve_number(point, &POINT_VALUE_FIELDS).unwrap_or(0.0);
                Some(ChartPoint { label, value })
            })
            .collect()
    }

    /// Table keys in payload order.
    pub fn table_keys(&self) -> Vec<String> {
        self.tables
            .as_object()
            .map(|tables| tables.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Columns come from the first row's keys.
    pub fn table(&self, key: &str) -> DataTable {
        let rows = self
            .tables
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let columns: Vec<String> = rows
            .first()
            .and_then(Value::as_object)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        let cells = rows
            .iter()
            .map(|row| columns.iter().map(|c| cell_text(row, c)).collect())
            .collect();
        DataTable {
            columns,
            rows: cells,
        }
    }

    pub fn total_amount(&self) -> f64 {
        resolve_number(&self.summary, &["total_amount"]).unwrap_or(0.0)
    }

    pub fn total_quantity(&self) -> f64 {
        resolve_number(&self.summary, &["total_quantity"]).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn params() -> ReportParams {
        ReportParams {
            from_date: Some(date("2024-01-01")),
            to_date: Some(date("2024-01-31")),
            search_type: Some(SearchType::Amount),
            display_quantity: Some(10),
        }
    }

    fn selections(entries: &[(Dimension, &[&str])]) -> SelectionMap {
        entries
            .iter()
            .map(|(dim, ids)| (*dim, ids.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_report_level_defaults_to_company() {
        assert_eq!(compute_report_level(&SelectionMap::new()), Dimension::Company);
        let empty = selections(&[(Dimension::Region, &[]), (Dimension::Customer, &[])]);
        assert_eq!(compute_report_level(&empty), Dimension::Company);
        assert_eq!(lowest_active_dimension(&empty), None);
    }

    #[test]
    fn test_report_level_picks_most_granular() {
        let sel = selections(&[
            (Dimension::Warehouse, &["5"]),
            (Dimension::Company, &["1"]),
            (Dimension::Region, &[]),
        ]);
        assert_eq!(compute_report_level(&sel), Dimension::Warehouse);
        assert_eq!(ReportLevel::for_selections(&sel), Some(ReportLevel::Warehouse));

        let sel = selections(&[(Dimension::Customer, &["9"]), (Dimension::Area, &["2"])]);
        assert_eq!(compute_report_level(&sel), Dimension::Customer);
        assert_eq!(ReportLevel::for_selections(&sel), None);
    }

    #[test]
    fn test_validation_order() {
        let mut p = params();
        p.to_date = None;
        assert_eq!(p.validate(), Err(ValidationError::MissingDateRange));

        let mut p = params();
        p.from_date = Some(date("2024-02-01"));
        assert!(matches!(
            p.validate(),
            Err(ValidationError::InvalidDateRange { .. })
        ));

        let mut p = params();
        p.search_type = None;
        assert_eq!(p.validate(), Err(ValidationError::MissingSearchType));

        let mut p = params();
        p.display_quantity = Some(0);
        assert_eq!(p.validate(), Err(ValidationError::MissingDisplayQuantity));
    }

    #[test]
    fn test_dashboard_requires_selection() {
        let err = ReportRequest::dashboard(&params(), &SelectionMap::new()).unwrap_err();
        assert_eq!(err, ValidationError::NoSelection);
    }

    #[test]
    fn test_dashboard_body_carries_all_dimensions() {
        let sel = selections(&[(Dimension::Region, &["3"])]);
        let request = ReportRequest::dashboard(&params(), &sel).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["region_ids"], json!([3]));
        assert_eq!(body["from_date"], json!("2024-01-01"));
        assert_eq!(body["search_type"], json!("amount"));
        assert_eq!(body["display_quantity"], json!(10));
        for dim in Dimension::all() {
            if *dim != Dimension::Region {
                assert_eq!(body[dim.filter_field()], json!([]), "{dim}");
            }
        }
    }

    #[test]
    fn test_dashboard_refuses_non_hierarchy_selection() {
        let sel = selections(&[(Dimension::Region, &["3"]), (Dimension::Salesman, &["4"])]);
        let err = ReportRequest::dashboard(&params(), &sel).unwrap_err();
        assert_eq!(err, ValidationError::DashboardScope("Salesman".to_string()));

        // Table requests are not restricted.
        let request = ReportRequest::table(&params(), &sel).unwrap();
        assert_eq!(request.filters.present(), vec![Dimension::Salesman]);
    }

    #[test]
    fn test_table_body_uses_lowest_dimension_only() {
        let sel = selections(&[(Dimension::Company, &["1"]), (Dimension::Warehouse, &["5", "6"])]);
        let request = ReportRequest::table(&params(), &sel).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["warehouse_ids"], json!([5, 6]));
        assert!(body.get("company_ids").is_none());

        let request = ReportRequest::table(&params(), &SelectionMap::new()).unwrap();
        assert!(request.filters.present().is_empty());
    }

    #[test]
    fn test_request_deserializes_back() {
        let sel = selections(&[(Dimension::Area, &["7"])]);
        let request = ReportRequest::table(&params(), &sel).unwrap();
        let text = serde_json::to_string(&request).unwrap();
        let parsed: ReportRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_parse_ids_skips_non_numeric() {
        let ids = vec!["1".to_string(), " 2 ".to_string(), "x".to_string()];
        assert_eq!(parse_ids(&ids), vec![1, 2]);
    }

    #[test]
    fn test_payload_tolerates_missing_sections() {
        let payload: DashboardPayload = serde_json::from_value(json!({
            "level": "region",
            "charts": {
                "area_sales": [{"name": "North", "total": 10}, {"label": "South", "value": "2.5"}],
                "top_items": null,
            },
            "summary": {"total_amount": 1200.5},
        }))
        .unwrap();

        assert_eq!(payload.level(), Some(ReportLevel::Region));
        assert_eq!(
            payload.series("area_sales"),
            vec![
                ChartPoint { label: "North".into(), value: 10.0 },
                ChartPoint { label: "South".into(), value: 2.5 },
            ]
        );
        assert!(payload.series("top_items").is_empty());
        assert!(payload.series("sales_trend").is_empty());
        assert!(payload.table_keys().is_empty());
        assert_eq!(payload.total_amount(), 1200.5);
        assert_eq!(payload.total_quantity(), 0.0);
    }

    #[test]
    fn test_payload_table() {
        let payload: DashboardPayload = serde_json::from_value(json!({
            "tables": {"regions": [{"name": "North", "amount": 5}, {"name": "South"}]}
        }))
        .unwrap();
        let table = payload.table("regions");
        assert_eq!(table.columns.len(), 2);
        let name_col = table.columns.iter().position(|c| c == "name").unwrap();
        let amount_col = table.columns.iter().position(|c| c == "amount").unwrap();
        assert_eq!(table.rows[0][amount_col], "5");
        assert_eq!(table.rows[1][name_col], "South");
        assert_eq!(table.rows[1][amount_col], "");
        assert!(payload.table("missing").rows.is_empty());
    }

    #[test]
    fn test_every_level_has_a_layout() {
        for level in [
            ReportLevel::Company,
            ReportLevel::Region,
            ReportLevel::Area,
            ReportLevel::Warehouse,
        ] {
            assert_eq!(level.layout().len(), 3);
            assert!(level.layout().iter().any(|c| c.kind == ChartKind::TrendArea));
        }
    }
}
