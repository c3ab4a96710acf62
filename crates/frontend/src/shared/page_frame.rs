//! PageFrame: root wrapper for a page.
//!
//! Sets `id` (`"{entity}--{category}"`) and `data-page-category` on the root element.

use leptos::prelude::*;

/// Analytical dashboard / chart view.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`, e.g. `"d405_sales_report--dashboard"`.
    page_id: &'static str,
    /// Additional CSS classes appended after the base class.
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    let full_class = if class.is_empty() {
        "page page--dashboard".to_string()
    } else {
        format!("page page--dashboard {class}")
    };

    view! {
        <div id=page_id class=full_class data-page-category=PAGE_CAT_DASHBOARD>
            {children()}
        </div>
    }
}
