//! Spinner shown while a section's content is loading.

use leptos::{
    html::{div, p},
    prelude::*,
};

pub fn component() -> impl IntoView {
    div()
        .class("flex flex-col gap-2 justify-center items-center py-16")
        .child((
            div().class("rounded-full border-4 animate-spin size-8 border-primary border-t-transparent"),
            p().class("text-sm italic text-muted-foreground")
                .child("Loading..."),
        ))
}
