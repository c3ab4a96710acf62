use crate::shared::icons::icon;
use contracts::dashboards::d405_sales_report::{page_buttons, PageButton};
use leptos::prelude::*;

/// Prev / numbered / Next controls driven by the server-reported position.
/// Pages are 1-based.
#[component]
pub fn PaginationControls(
    #[prop(into)] current_page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] total_rows: Signal<u64>,
    #[prop(into)] has_previous: Signal<bool>,
    #[prop(into)] has_next: Signal<bool>,
    /// Disables every button while a page is loading
    #[prop(into)]
    disabled: Signal<bool>,
    on_page_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get().saturating_sub(1).max(1))
                disabled=move || disabled.get() || !has_previous.get()
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            {move || {
                let current = current_page.get();
                page_buttons(current, total_pages.get())
                    .into_iter()
                    .map(|button| match button {
                        PageButton::Page(page) => view! {
                            <button
                                class={if page == current {
                                    "pagination-btn pagination-btn--active"
                                } else {
                                    "pagination-btn"
                                }}
                                disabled=move || disabled.get()
                                on:click=move |_| {
                                    if page != current {
                                        on_page_change.run(page);
                                    }
                                }
                            >
                                {page}
                            </button>
                        }
                        .into_any(),
                        PageButton::Ellipsis => view! {
                            <span class="pagination-ellipsis">"..."</span>
                        }
                        .into_any(),
                    })
                    .collect_view()
            }}
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get() + 1)
                disabled=move || disabled.get() || !has_next.get()
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <span class="pagination-info">
                {move || format!("{} rows", total_rows.get())}
            </span>
        </div>
    }
}
