use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

/// Shown when a project or post lookup matched nothing. `on_reload` clears
/// the server-side cache and asks again.
pub fn component(
    title: &'static str,
    message: String,
    back_href: &'static str,
    back_label: &'static str,
    on_reload: Callback<()>,
) -> impl IntoView {
    view! {
        <Title text=title/>
        <div class="flex flex-col gap-4 items-center py-16 text-center">
            <h1 class="text-3xl font-bold">{title}</h1>
            <p class="text-gray-400">{message}</p>
            <div class="flex flex-row gap-3 mt-4">
                <A href=back_href attr:class="py-2 px-4 text-white rounded-lg transition-all duration-300 bg-primary hover:opacity-80">
                    {back_label}
                </A>
                <button
                    class="py-2 px-4 text-gray-300 rounded-lg transition-all duration-300 cursor-pointer bg-card hover:bg-white hover:text-black"
                    on:click=move |_| on_reload.run(())
                >
                    "Reload"
                </button>
            </div>
        </div>
    }
}

/// Logs a failed cache refresh. The page refetches either way, so a failure
/// only means the reload may be served from cache.
pub fn report_refresh(result: Result<(), ServerFnError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            leptos::logging::warn!("Failed to refresh content: {err}");
            false
        }
    }
}
