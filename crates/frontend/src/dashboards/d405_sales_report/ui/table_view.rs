use contracts::dashboards::d405_sales_report::{column_title, DataView, TablePage};
use leptos::prelude::*;
use thaw::{Button, ButtonAppearance, MessageBar, MessageBarIntent, Spinner};

use crate::dashboards::d405_sales_report::state::SalesReportState;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::number_format::{format_money, format_number_int};

/// Cell text for display: dates as DD.MM.YYYY, measures with separators
fn display_cell(column: &str, raw: String) -> String {
    match column {
        "date" => format_date(&raw),
        "amount" => raw.parse::<f64>().map(format_money).unwrap_or(raw),
        "quantity" => raw.parse::<f64>().map(format_number_int).unwrap_or(raw),
        _ => raw,
    }
}

fn render_rows(page: &TablePage, columns: &[String]) -> AnyView {
    if page.is_empty() {
        let span = columns.len().max(1);
        return view! {
            <tr><td class="data-table__empty" colspan=span>"No rows"</td></tr>
        }
        .into_any();
    }
    let table = page.to_table(columns);
    table
        .rows
        .into_iter()
        .map(|row| {
            let cells = columns
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    let numeric = column == "amount" || column == "quantity";
                    view! {
                        <td class={if numeric { "data-table__num" } else { "" }}>
                            {display_cell(column, cell)}
                        </td>
                    }
                })
                .collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view()
        .into_any()
}

/// Paged sales table with export
#[component]
pub fn SalesTableView(state: SalesReportState) -> impl IntoView {
    let current_page =
        Signal::derive(move || state.table.with(|t| t.as_ref().map_or(1, |p| p.current_page)));
    let total_pages =
        Signal::derive(move || state.table.with(|t| t.as_ref().map_or(0, |p| p.total_pages)));
    let total_rows =
        Signal::derive(move || state.table.with(|t| t.as_ref().map_or(0, |p| p.total_rows)));
    let has_previous =
        Signal::derive(move || state.table.with(|t| t.as_ref().is_some_and(|p| p.previous_page)));
    let has_next =
        Signal::derive(move || state.table.with(|t| t.as_ref().is_some_and(|p| p.next_page)));
    let disabled = Signal::derive(move || state.is_loading_table.get());

    view! {
        <div class="table-view">
            <div class="table-view__toolbar">
                <label class="form__field">
                    <span class="form__label">"Export view"</span>
                    <select
                        class="form__select"
                        on:change=move |ev| {
                            if let Some(view) = DataView::from_code(&event_target_value(&ev)) {
                                state.dataview.set(view);
                            }
                        }
                    >
                        {DataView::all()
                            .into_iter()
                            .map(|view| view! {
                                <option
                                    value=view.code()
                                    selected=move || state.dataview.get() == view
                                >
                                    {view.label()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </label>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || state.is_exporting.get())
                    on_click=move |_| state.export()
                >
                    {icon("download")}
                    {move || if state.is_exporting.get() { " Exporting..." } else { " Export" }}
                </Button>
            </div>

            {move || state.table_error.get().map(|err| view! {
                <MessageBar intent=MessageBarIntent::Error>{err}</MessageBar>
            })}

            <Show when=move || state.is_loading_table.get()>
                <div class="table-view__loading"><Spinner/></div>
            </Show>

            {move || {
                let columns = state.table_columns.get();
                state.table.with(|page| match page {
                    Some(page) => {
                        let header = columns
                            .iter()
                            .map(|c| view! { <th>{column_title(c)}</th> })
                            .collect_view();
                        view! {
                            <table class="data-table">
                                <thead><tr>{header}</tr></thead>
                                <tbody>{render_rows(page, &columns)}</tbody>
                            </table>
                        }
                        .into_any()
                    }
                    None => view! {
                        <div class="table-view__placeholder">"Press \"Show table\" to load rows"</div>
                    }
                    .into_any(),
                })
            }}

            <PaginationControls
                current_page=current_page
                total_pages=total_pages
                total_rows=total_rows
                has_previous=has_previous
                has_next=has_next
                disabled=disabled
                on_page_change=Callback::new(move |page| state.fetch_table_page(page))
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell("date", "2024-03-01".into()), "01.03.2024");
        assert_eq!(display_cell("amount", "1234.5".into()), "1 234.50");
        assert_eq!(display_cell("quantity", "12000".into()), "12 000");
        assert_eq!(display_cell("amount", "n/a".into()), "n/a");
        assert_eq!(display_cell("customer_name", "Acme".into()), "Acme");
    }
}
