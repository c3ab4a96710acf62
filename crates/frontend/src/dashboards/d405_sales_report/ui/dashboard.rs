use contracts::dashboards::d405_sales_report::{
    RefreshScope, SearchType, DISPLAY_QUANTITY_OPTIONS,
};
use leptos::prelude::*;
use thaw::{Button, ButtonAppearance, MessageBar, MessageBarIntent};

use super::filter_panel::HierarchyFilterPanel;
use super::report_view::ReportView;
use super::table_view::SalesTableView;
use crate::dashboards::d405_sales_report::state::{SalesReportState, ToastKind, ViewMode};
use crate::shared::components::date_input::DateInput;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;

fn toast_intent(kind: ToastKind) -> MessageBarIntent {
    match kind {
        ToastKind::Success => MessageBarIntent::Success,
        ToastKind::Warning => MessageBarIntent::Warning,
        ToastKind::Error => MessageBarIntent::Error,
    }
}

/// Date range, measure and top-N inputs plus the two report actions
#[component]
fn ReportToolbar(state: SalesReportState) -> impl IntoView {
    view! {
        <div class="report-toolbar">
            <DateInput
                label="From"
                value=state.from_date
                max=state.to_date
                on_change=move |v| state.from_date.set(v)
            />
            <DateInput
                label="To"
                value=state.to_date
                on_change=move |v| state.to_date.set(v)
            />

            <label class="form__field">
                <span class="form__label">"Search type"</span>
                <select
                    class="form__select"
                    on:change=move |ev| {
                        state.search_type.set(SearchType::from_code(&event_target_value(&ev)));
                    }
                >
                    <option value="" selected=move || state.search_type.get().is_none()>
                        "Select..."
                    </option>
                    {SearchType::all()
                        .into_iter()
                        .map(|t| view! {
                            <option value=t.code() selected=move || state.search_type.get() == Some(t)>
                                {t.label()}
                            </option>
                        })
                        .collect_view()}
                </select>
            </label>

            <label class="form__field">
                <span class="form__label">"Display quantity"</span>
                <select
                    class="form__select"
                    on:change=move |ev| {
                        state.display_quantity.set(event_target_value(&ev).parse().ok());
                    }
                >
                    {DISPLAY_QUANTITY_OPTIONS
                        .into_iter()
                        .map(|q| view! {
                            <option
                                value=q.to_string()
                                selected=move || state.display_quantity.get() == Some(q)
                            >
                                {format!("Top {}", q)}
                            </option>
                        })
                        .collect_view()}
                </select>
            </label>

            <div class="report-toolbar__actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || state.is_loading_dashboard.get())
                    on_click=move |_| state.fetch_dashboard()
                >
                    {icon("bar-chart")}
                    " Show dashboard"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=Signal::derive(move || state.is_loading_table.get())
                    on_click=move |_| state.fetch_table_page(1)
                >
                    {icon("table")}
                    " Show table"
                </Button>
            </div>
        </div>
    }
}

/// Sales report: hierarchical filters, dashboard by level, paged table, export
#[component]
pub fn SalesReportDashboard() -> impl IntoView {
    let state = SalesReportState::new();

    // Initial catalogs, no filters applied
    Effect::new(move |_| {
        state.loader.refresh(RefreshScope::All);
    });

    view! {
        <PageFrame page_id="d405_sales_report--dashboard" class="sales-report">
            <div class="page__header">
                <h2 class="page__title">"Sales Report"</h2>
            </div>

            {move || state.toast.get().map(|toast| view! {
                <div class="toast">
                    <MessageBar intent=toast_intent(toast.kind)>
                        <span class="toast__message">{toast.message}</span>
                        <button class="toast__close" on:click=move |_| state.dismiss_toast()>
                            {icon("x")}
                        </button>
                    </MessageBar>
                </div>
            })}

            <ReportToolbar state=state/>
            <HierarchyFilterPanel state=state/>

            {move || match state.view_mode.get() {
                ViewMode::Dashboard => view! { <ReportView state=state/> }.into_any(),
                ViewMode::Table => view! { <SalesTableView state=state/> }.into_any(),
            }}
        </PageFrame>
    }
}
