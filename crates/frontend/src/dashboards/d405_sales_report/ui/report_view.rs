use contracts::dashboards::d405_sales_report::{column_title, DashboardPayload, ReportLevel};
use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent, Spinner};

use super::charts::ChartCard;
use crate::dashboards::d405_sales_report::state::SalesReportState;
use crate::shared::number_format::{format_money, format_number_int};

/// Plain table of one `tables.<key>` section
#[component]
fn PayloadTable(title: String, payload: DashboardPayload, key: String) -> impl IntoView {
    let table = payload.table(&key);
    if table.rows.is_empty() {
        return view! { <></> }.into_any();
    }
    let header = table
        .columns
        .iter()
        .map(|c| view! { <th>{column_title(c)}</th> })
        .collect_view();
    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let cells = row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view();
    view! {
        <div class="report-table">
            <div class="report-table__title">{title}</div>
            <table class="data-table">
                <thead><tr>{header}</tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
    .into_any()
}

fn render_payload(payload: DashboardPayload, fallback_level: ReportLevel) -> AnyView {
    let level = payload.level().unwrap_or(fallback_level);
    let charts = level
        .layout()
        .iter()
        .copied()
        .map(|spec| view! { <ChartCard spec=spec points=payload.series(spec.key)/> })
        .collect_view();
    let tables = payload
        .table_keys()
        .into_iter()
        .map(|key| {
            view! {
                <PayloadTable title=key.replace('_', " ") payload=payload.clone() key=key/>
            }
        })
        .collect_view();

    view! {
        <div class=format!("report report--{:?}", level).to_lowercase()>
            <div class="report__header">
                <h3 class="report__title">{level.title()}</h3>
                <div class="report__summary">
                    <span class="stat">
                        <span class="stat__label">"Total amount"</span>
                        <span class="stat__value">{format_money(payload.total_amount())}</span>
                    </span>
                    <span class="stat">
                        <span class="stat__label">"Total quantity"</span>
                        <span class="stat__value">{format_number_int(payload.total_quantity())}</span>
                    </span>
                </div>
            </div>
            <div class="report__charts">{charts}</div>
            <div class="report__tables">{tables}</div>
        </div>
    }
    .into_any()
}

/// Dashboard branch for the current report level
#[component]
pub fn ReportView(state: SalesReportState) -> impl IntoView {
    // Layout follows the server-reported level, falling back to the selections
    let fallback_level = Memo::new(move |_| {
        state
            .store
            .with(|store| ReportLevel::for_selections(store.selections()))
            .unwrap_or(ReportLevel::Company)
    });

    view! {
        <div class="report-view">
            <Show when=move || state.is_loading_dashboard.get()>
                <div class="report-view__loading"><Spinner/></div>
            </Show>
            {move || state.dashboard_error.get().map(|err| view! {
                <MessageBar intent=MessageBarIntent::Error>{err}</MessageBar>
            })}
            {move || match state.dashboard.get() {
                Some(payload) => render_payload(payload, fallback_level.get_untracked()),
                None => view! {
                    <div class="report-view__placeholder">
                        "Select filters and press \"Show dashboard\""
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
