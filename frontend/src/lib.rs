//! WebAssembly entry point that hydrates the server-rendered portfolio pages.
//!
//! It initializes client-side logging and the panic hook, then mounts
//! `app::component` over the existing DOM.

#[wasm_bindgen::prelude::wasm_bindgen]
/// Hydrates the Leptos application on the client side.
pub fn hydrate() {
    use app::component;
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    log::debug!("Hydrating portfolio");
    leptos::mount::hydrate_body(component);
}
