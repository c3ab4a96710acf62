use leptos::prelude::*;

/// Labelled native date picker
/// Value and callback use yyyy-mm-dd; the browser shows the locale format
#[component]
pub fn DateInput(
    #[prop(into)] label: String,
    /// The date value in yyyy-mm-dd format
    #[prop(into)]
    value: Signal<String>,
    /// Upper bound for the picker (yyyy-mm-dd)
    #[prop(optional, into)]
    max: Option<Signal<String>>,
    /// Callback when the date changes (receives yyyy-mm-dd format)
    on_change: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <label class="form__field">
            <span class="form__label">{label}</span>
            <input
                type="date"
                class="form__input form__input--date"
                prop:value=value
                max=move || max.map(|m| m.get()).unwrap_or_default()
                on:input=move |ev| {
                    on_change(event_target_value(&ev));
                }
            />
        </label>
    }
}
