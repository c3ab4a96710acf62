use crate::dashboards::SalesReportDashboard;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <SalesReportDashboard />
    }
}
