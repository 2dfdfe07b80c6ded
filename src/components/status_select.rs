//! Status Select Component
//!
//! Dropdown of the known billing statuses. A stored value outside that set
//! is offered as an extra option so editing a row never rewrites it.

use leptos::prelude::*;

use inventory_core::ItemStatus;

/// CSS class of the status badge
pub fn status_class(status: &ItemStatus) -> &'static str {
    match status {
        ItemStatus::Billed => "status-badge billed",
        ItemStatus::NotBilled => "status-badge not-billed",
        _ => "status-badge other",
    }
}

#[component]
pub fn StatusSelect(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let extra = move || {
        let current = value.get();
        let unknown = !current.is_empty() && !ItemStatus::from(current.as_str()).is_known();
        unknown.then(|| {
            let label = current.clone();
            view! { <option value=current>{label}</option> }
        })
    };

    view! {
        <select
            class="status-select"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="">"Select status"</option>
            {ItemStatus::KNOWN
                .into_iter()
                .map(|status| {
                    let wire = status.as_str().to_string();
                    let label = status.label().to_string();
                    view! { <option value=wire>{label}</option> }
                })
                .collect_view()}
            {extra}
        </select>
    }
}
