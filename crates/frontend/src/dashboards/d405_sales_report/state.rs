use chrono::Utc;
use contracts::dashboards::d405_sales_report::{
    table_columns, DashboardPayload, DataView, Dimension, ExportRequest, FilterHierarchyStore,
    RefreshScope, ReportParams, ReportRequest, SearchType, TablePage,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api;
use super::loader::CatalogLoader;
use crate::shared::date_utils::{current_month_range, parse_iso_date, to_iso_date};
use crate::shared::export::{download_bytes, XLSX_MIME};

const TOAST_TIMEOUT_MS: u32 = 6_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Dashboard,
    Table,
}

/// Page state of the sales report. Every field is a signal, so the struct is `Copy`
/// and can be moved into event handlers.
#[derive(Clone, Copy)]
pub struct SalesReportState {
    pub store: RwSignal<FilterHierarchyStore>,
    pub loader: CatalogLoader,

    // Report inputs
    pub from_date: RwSignal<String>,
    pub to_date: RwSignal<String>,
    pub search_type: RwSignal<Option<SearchType>>,
    pub display_quantity: RwSignal<Option<u32>>,
    pub dataview: RwSignal<DataView>,
    pub view_mode: RwSignal<ViewMode>,

    // Dashboard
    pub dashboard: RwSignal<Option<DashboardPayload>>,
    pub dashboard_error: RwSignal<Option<String>>,
    pub is_loading_dashboard: RwSignal<bool>,

    // Table
    pub table: RwSignal<Option<TablePage>>,
    /// Columns the table is currently rendered with
    pub table_columns: RwSignal<Vec<String>>,
    pub table_error: RwSignal<Option<String>>,
    pub is_loading_table: RwSignal<bool>,
    pub is_exporting: RwSignal<bool>,

    pub toast: RwSignal<Option<Toast>>,
    toast_seq: StoredValue<u64>,
}

impl SalesReportState {
    pub fn new() -> Self {
        let (from, to) = current_month_range(Utc::now().date_naive());
        let store = RwSignal::new(FilterHierarchyStore::new());
        Self {
            store,
            loader: CatalogLoader::new(store),
            from_date: RwSignal::new(to_iso_date(from)),
            to_date: RwSignal::new(to_iso_date(to)),
            search_type: RwSignal::new(None),
            display_quantity: RwSignal::new(Some(10)),
            dataview: RwSignal::new(DataView::Default),
            view_mode: RwSignal::new(ViewMode::Dashboard),
            dashboard: RwSignal::new(None),
            dashboard_error: RwSignal::new(None),
            is_loading_dashboard: RwSignal::new(false),
            table: RwSignal::new(None),
            table_columns: RwSignal::new(Vec::new()),
            table_error: RwSignal::new(None),
            is_loading_table: RwSignal::new(false),
            is_exporting: RwSignal::new(false),
            toast: RwSignal::new(None),
            toast_seq: StoredValue::new(0),
        }
    }

    // ---- Filter store -------------------------------------------------------

    fn apply(&self, mutation: impl FnOnce(&mut FilterHierarchyStore) -> RefreshScope) {
        let scope = self
            .store
            .try_update(mutation)
            .unwrap_or(RefreshScope::None);
        self.loader.schedule(scope);
    }

    pub fn activate(&self, dim: Dimension) {
        self.apply(|store| store.activate(dim));
    }

    pub fn deactivate(&self, dim: Dimension) {
        self.loader.forget(dim);
        self.apply(|store| store.deactivate(dim));
    }

    pub fn toggle_value(&self, dim: Dimension, value_id: String) {
        self.apply(|store| store.toggle_value(dim, &value_id));
    }

    /// Select-all over the currently visible (search-filtered) catalog entries
    pub fn select_all_visible(&self, dim: Dimension) {
        let catalog = self.loader.catalog(dim).unwrap_or_default();
        let visible: Vec<String> = self.store.with_untracked(|store| {
            store
                .visible_catalog(dim, &catalog)
                .into_iter()
                .map(|item| item.id.clone())
                .collect()
        });
        self.apply(|store| store.select_all(dim, &visible));
    }

    pub fn set_search_term(&self, dim: Dimension, term: String) {
        self.store.update(|store| store.set_search_term(dim, term));
    }

    pub fn clear_all(&self) {
        self.apply(|store| store.clear_all());
    }

    // ---- Report inputs ------------------------------------------------------

    pub fn params(&self) -> ReportParams {
        ReportParams {
            from_date: parse_iso_date(&self.from_date.get_untracked()),
            to_date: parse_iso_date(&self.to_date.get_untracked()),
            search_type: self.search_type.get_untracked(),
            display_quantity: self.display_quantity.get_untracked(),
        }
    }

    // ---- Toasts -------------------------------------------------------------

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self
            .toast_seq
            .try_update_value(|s| {
                *s += 1;
                *s
            })
            .unwrap_or_default();
        self.toast.set(Some(Toast {
            id,
            kind,
            message: message.into(),
        }));
        let toast = self.toast;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_TIMEOUT_MS).await;
            // A newer toast keeps its own timer
            if toast.get_untracked().is_some_and(|t| t.id == id) {
                toast.set(None);
            }
        });
    }

    pub fn dismiss_toast(&self) {
        self.toast.set(None);
    }

    // ---- Dashboard ----------------------------------------------------------

    /// Fail-fast validation, then one POST. Previous data stays on failure.
    pub fn fetch_dashboard(&self) {
        let request = self
            .store
            .with_untracked(|store| ReportRequest::dashboard(&self.params(), store.selections()));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.notify(ToastKind::Warning, e.to_string());
                return;
            }
        };

        let state = *self;
        self.view_mode.set(ViewMode::Dashboard);
        self.is_loading_dashboard.set(true);
        spawn_local(async move {
            match api::fetch_dashboard(&request).await {
                Ok(payload) => {
                    state.dashboard.set(Some(payload));
                    state.dashboard_error.set(None);
                }
                Err(e) => {
                    log::error!("D405: dashboard request failed: {}", e);
                    state.dashboard_error.set(Some(e.clone()));
                    state.notify(ToastKind::Error, e);
                }
            }
            state.is_loading_dashboard.set(false);
        });
    }

    // ---- Table / export -----------------------------------------------------

    /// Requests one table page; the stored page is replaced wholesale.
    pub fn fetch_table_page(&self, page: u32) {
        let built = self.store.with_untracked(|store| {
            let selections = store.selections();
            ReportRequest::table(&self.params(), selections)
                .map(|request| (request, table_columns(selections)))
        });
        let (request, columns) = match built {
            Ok(built) => built,
            Err(e) => {
                self.notify(ToastKind::Warning, e.to_string());
                return;
            }
        };

        let state = *self;
        self.view_mode.set(ViewMode::Table);
        self.is_loading_table.set(true);
        spawn_local(async move {
            match api::fetch_table_page(page.max(1), &request).await {
                Ok(table_page) => {
                    state.table_columns.set(columns);
                    state.table.set(Some(table_page));
                    state.table_error.set(None);
                }
                Err(e) => {
                    log::error!("D405: table request failed: {}", e);
                    state.table_error.set(Some(e.clone()));
                    state.notify(ToastKind::Error, e);
                }
            }
            state.is_loading_table.set(false);
        });
    }

    /// Columns the export mirrors: the rendered table, or the current
    /// selection's column set before any table was loaded.
    fn rendered_columns(&self) -> Vec<String> {
        let rendered = self.table_columns.get_untracked();
        if !rendered.is_empty() {
            return rendered;
        }
        self.store
            .with_untracked(|store| table_columns(store.selections()))
    }

    pub fn export(&self) {
        let columns = self.rendered_columns();
        let request = self.store.with_untracked(|store| {
            ExportRequest::build(
                &self.params(),
                store.selections(),
                self.dataview.get_untracked(),
                &columns,
            )
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.notify(ToastKind::Warning, e.to_string());
                return;
            }
        };

        let state = *self;
        self.is_exporting.set(true);
        spawn_local(async move {
            let file_name = request.file_name();
            let result = api::export_file(&request)
                .await
                .and_then(|bytes| download_bytes(&bytes, &file_name, XLSX_MIME));
            match result {
                Ok(()) => state.notify(ToastKind::Success, format!("Downloaded {}", file_name)),
                Err(e) => {
                    log::error!("D405: export failed: {}", e);
                    state.notify(ToastKind::Error, e);
                }
            }
            state.is_exporting.set(false);
        });
    }
}

impl Default for SalesReportState {
    fn default() -> Self {
        Self::new()
    }
}
