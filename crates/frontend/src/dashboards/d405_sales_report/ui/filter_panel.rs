use contracts::dashboards::d405_sales_report::{Dimension, DimensionGroup};
use leptos::prelude::*;
use thaw::{
    Badge, BadgeAppearance, BadgeColor, Button, ButtonAppearance, MessageBar, MessageBarIntent,
    Spinner,
};

use crate::dashboards::d405_sales_report::state::SalesReportState;
use crate::shared::icons::icon;

const DRAG_FORMAT: &str = "text/plain";

/// Draggable chip of an inactive dimension
#[component]
fn AvailableChip(state: SalesReportState, dim: Dimension) -> impl IntoView {
    view! {
        <div
            class="filter-chip"
            draggable="true"
            title="Drag into active filters or double-click"
            on:dragstart=move |ev| {
                if let Some(transfer) = ev.data_transfer() {
                    let _ = transfer.set_data(DRAG_FORMAT, dim.slug());
                }
            }
            on:dblclick=move |_| state.activate(dim)
        >
            <span class="filter-chip__grip">{icon("grip")}</span>
            {icon(dim.icon())}
            <span>{dim.display_name()}</span>
        </div>
    }
}

/// Inactive dimensions grouped by panel section
#[component]
fn AvailablePool(state: SalesReportState) -> impl IntoView {
    view! {
        <div class="filter-pool">
            {move || {
                let available = state.store.with(|store| store.available());
                DimensionGroup::all()
                    .into_iter()
                    .filter_map(|group| {
                        let dims: Vec<Dimension> = available
                            .iter()
                            .copied()
                            .filter(|d| d.group() == group)
                            .collect();
                        if dims.is_empty() {
                            return None;
                        }
                        Some(view! {
                            <div class="filter-pool__group">
                                <div class="filter-pool__title">{group.label()}</div>
                                <div class="filter-pool__chips">
                                    {dims
                                        .into_iter()
                                        .map(|dim| view! { <AvailableChip state=state dim=dim/> })
                                        .collect_view()}
                                </div>
                            </div>
                        })
                    })
                    .collect_view()
            }}
        </div>
    }
}

/// Dropdown card of an active dimension: search, select all, value checkboxes
#[component]
fn ActiveFilterCard(state: SalesReportState, dim: Dimension) -> impl IntoView {
    let selected_count = move || state.store.with(|store| store.selection(dim).len());
    let search_term = move || state.store.with(|store| store.search_term(dim).to_string());

    let values = move || {
        let Some(catalog) = state.loader.catalog(dim) else {
            return view! { <div class="filter-card__loading"><Spinner/></div> }.into_any();
        };
        state.store.with(|store| {
            let visible = store.visible_catalog(dim, &catalog);
            if visible.is_empty() {
                return view! { <div class="filter-card__empty">"No values"</div> }.into_any();
            }
            visible
                .into_iter()
                .map(|item| {
                    let id = item.id.clone();
                    let checked = store.is_selected(dim, &item.id);
                    view! {
                        <label class="filter-card__value">
                            <input
                                type="checkbox"
                                prop:checked=checked
                                on:change=move |_| state.toggle_value(dim, id.clone())
                            />
                            <span>{item.name.clone()}</span>
                        </label>
                    }
                })
                .collect_view()
                .into_any()
        })
    };

    view! {
        <div class="filter-card" data-dimension=dim.slug()>
            <div class="filter-card__header">
                {icon(dim.icon())}
                <span class="filter-card__title">{dim.display_name()}</span>
                {move || {
                    let count = selected_count();
                    (count > 0).then(|| view! {
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>{count}</Badge>
                    })
                }}
                <button
                    class="filter-card__remove"
                    title="Remove filter"
                    on:click=move |_| state.deactivate(dim)
                >
                    {icon("x")}
                </button>
            </div>
            <div class="filter-card__search">
                {icon("search")}
                <input
                    type="text"
                    class="form__input"
                    placeholder="Search..."
                    prop:value=search_term
                    on:input=move |ev| state.set_search_term(dim, event_target_value(&ev))
                />
            </div>
            <button class="filter-card__select-all" on:click=move |_| state.select_all_visible(dim)>
                "Select all"
            </button>
            <div class="filter-card__values">{values}</div>
        </div>
    }
}

/// Drag-and-drop filter panel: available pool on the left, active filters on the right
#[component]
pub fn HierarchyFilterPanel(state: SalesReportState) -> impl IntoView {
    let is_drag_over = RwSignal::new(false);
    let active_count = move || state.store.with(|store| store.active().len());

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left">
                    {icon("filter")}
                    <span class="filter-panel__title">"Filters"</span>
                    {move || {
                        let count = active_count();
                        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
                    }}
                    <Show when=move || state.loader.loading.get()>
                        <Spinner/>
                    </Show>
                </div>
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| state.clear_all()
                >
                    "Clear all"
                </Button>
            </div>

            {move || state.loader.error.get().map(|err| view! {
                <MessageBar intent=MessageBarIntent::Error>
                    <span>{format!("Could not load filter values: {}", err)}</span>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| state.loader.retry()>
                        {icon("refresh")}
                        " Retry"
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| state.loader.dismiss_error()>
                        {icon("x")}
                    </Button>
                </MessageBar>
            })}

            <div class="filter-panel-content">
                <AvailablePool state=state/>
                <div
                    class=move || {
                        if is_drag_over.get() {
                            "filter-dropzone filter-dropzone--over"
                        } else {
                            "filter-dropzone"
                        }
                    }
                    on:dragover=move |ev| {
                        ev.prevent_default();
                        is_drag_over.set(true);
                    }
                    on:dragleave=move |_| is_drag_over.set(false)
                    on:drop=move |ev| {
                        ev.prevent_default();
                        is_drag_over.set(false);
                        let slug = ev
                            .data_transfer()
                            .and_then(|transfer| transfer.get_data(DRAG_FORMAT).ok());
                        match slug.as_deref().and_then(Dimension::from_slug) {
                            Some(dim) => state.activate(dim),
                            None => log::warn!("D405: unknown dimension dropped: {:?}", slug),
                        }
                    }
                >
                    <Show
                        when=move || { active_count() > 0 }
                        fallback=|| view! {
                            <div class="filter-dropzone__hint">"Drag filters here"</div>
                        }
                    >
                        <For
                            each=move || state.store.with(|store| store.active().to_vec())
                            key=|dim| *dim
                            children=move |dim| view! { <ActiveFilterCard state=state dim=dim/> }
                        />
                    </Show>
                </div>
            </div>
        </div>
    }
}
