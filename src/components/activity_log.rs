//! Activity Log Component
//!
//! Collapsible footer listing the most recent log lines, newest first.

use leptos::prelude::*;

use crate::context::use_app_context;

const VISIBLE_LINES: usize = 50;

#[component]
pub fn ActivityLog() -> impl IntoView {
    let ctx = use_app_context();
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let refresh = move || {
        let snapshot = ctx.logs().tail(VISIBLE_LINES);
        set_lines.set(snapshot.iter().rev().map(ToString::to_string).collect());
    };

    let toggle = move |_| {
        if !open.get_untracked() {
            refresh();
        }
        set_open.update(|o| *o = !*o);
    };

    view! {
        <footer class="activity-log">
            <div class="activity-log-bar">
                <button class="activity-log-toggle" on:click=toggle>
                    {move || if open.get() { "Hide activity" } else { "Show activity" }}
                </button>
                <Show when=move || open.get()>
                    <button on:click=move |_| refresh()>"Refresh"</button>
                    <button on:click=move |_| {
                        ctx.logs().clear();
                        set_lines.set(Vec::new());
                    }>"Clear"</button>
                </Show>
            </div>
            <Show when=move || open.get()>
                <ol class="activity-log-lines">
                    {move || lines.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ol>
            </Show>
        </footer>
    }
}
