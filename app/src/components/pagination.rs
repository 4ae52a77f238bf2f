use leptos::prelude::*;

const ACTIVE: &str = "py-1 px-3 text-sm text-white rounded-lg transition-all duration-300 cursor-pointer bg-primary";
const IDLE: &str = "py-1 px-3 text-sm text-gray-300 rounded-lg transition-all duration-300 cursor-pointer bg-card hover:bg-white hover:text-black disabled:opacity-50 disabled:cursor-not-allowed";

/// Only call from event handlers; there is no window while rendering on the
/// server.
pub fn scroll_to_top() {
    window().scroll_to_with_x_and_y(0.0, 0.0);
}

/// Previous/next buttons around a strip of page numbers. Renders nothing for
/// a single page.
pub fn component(
    current: usize,
    total_pages: usize,
    numbers: Vec<usize>,
    on_select: Callback<usize>,
) -> impl IntoView {
    (total_pages > 1).then(|| {
        view! {
            <nav class="flex flex-row gap-2 justify-center items-center mt-8" aria-label="Pagination">
                <button
                    class=IDLE
                    disabled={current <= 1}
                    on:click=move |_| on_select.run(current.saturating_sub(1))
                >
                    "Previous"
                </button>
                {numbers
                    .into_iter()
                    .map(|number| {
                        view! {
                            <button
                                class={if number == current { ACTIVE } else { IDLE }}
                                on:click=move |_| on_select.run(number)
                            >
                                {number}
                            </button>
                        }
                    })
                    .collect_view()}
                <button
                    class=IDLE
                    disabled={current >= total_pages}
                    on:click=move |_| on_select.run(current + 1)
                >
                    "Next"
                </button>
            </nav>
        }
    })
}
