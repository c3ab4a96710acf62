//! D405 Sales Report: hierarchical filter panel state, catalog scoping and the
//! request/response model of the dashboard, table and export views.

pub mod catalog;
pub mod debounce;
pub mod dimension;
pub mod report;
pub mod store;
pub mod table;

pub use catalog::{fan_out_catalogs, resolve_field, CatalogItem, CatalogMap, FilterQuery};
pub use debounce::{Debouncer, CATALOG_DEBOUNCE_MS};
pub use dimension::{Dimension, DimensionGroup, HIERARCHY_ORDER};
pub use report::{
    compute_report_level, lowest_active_dimension, ChartKind, ChartPoint, ChartSpec,
    DashboardPayload, DimensionFilters, ReportLevel, ReportParams, ReportRequest, ReportWindow,
    SearchType, ValidationError, DISPLAY_QUANTITY_OPTIONS,
};
pub use store::{FilterHierarchyStore, RefreshScope, SelectionMap};
pub use table::{
    column_title, export_file_name, page_buttons, table_columns, DataTable, DataView,
    ExportRequest, PageButton, TablePage,
};
