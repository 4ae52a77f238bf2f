//! Category buttons and search box above a listing.
//!
//! Both controls write into the page's [`Listing`] signal, which resets the
//! listing to its first page.

extern crate alloc;
use alloc::collections::BTreeMap;

use leptos::{
    ev,
    html::{button, div, input},
    prelude::*,
};

use crate::listing::{Category, Listing};

const SELECTED: &str = "py-1 px-3 text-white rounded-full transition-all duration-300 cursor-pointer bg-primary";
const UNSELECTED: &str = "py-1 px-3 text-gray-300 rounded-full transition-all duration-300 cursor-pointer bg-card hover:text-black hover:bg-white";

pub fn component(
    categories: BTreeMap<String, usize>,
    total: usize,
    listing: RwSignal<Listing>,
    placeholder: &'static str,
) -> impl IntoView {
    let category_button = move |category: Category, label: String| {
        let selected = {
            let category = category.clone();
            move || listing.with(|listing| *listing.category() == category)
        };
        button()
            .class(move || if selected() { SELECTED } else { UNSELECTED })
            .on(ev::click, move |_| {
                listing.update(|listing| listing.set_category(category.clone()));
            })
            .child(label)
    };

    div().class("flex flex-col gap-4 mb-8").child((
        div().class("flex flex-row flex-wrap gap-2 text-xs").child((
            category_button(Category::All, format!("All ({total})")),
            categories
                .into_iter()
                .map(|(name, count)| category_button(Category::Named(name.clone()), format!("{name} ({count})")))
                .collect_view(),
        )),
        div().class("flex relative flex-row").child((
            input()
                .r#type("search")
                .placeholder(placeholder)
                .class("py-3 px-4 w-full placeholder-gray-400 text-white rounded-lg border border-gray-700 transition-colors duration-300 focus:outline-none bg-card focus:border-primary")
                .prop("value", move || listing.with(|listing| listing.search().to_owned()))
                .on(ev::input, move |event| {
                    let term = event_target_value(&event);
                    listing.update(|listing| listing.set_search(term));
                }),
            Show(
                ShowProps::builder()
                    .when(move || listing.with(|listing| !listing.search().is_empty()))
                    .fallback(|| ())
                    .children(ToChildren::to_children(move || {
                        button()
                            .class("absolute right-3 top-1/2 text-gray-400 -translate-y-1/2 hover:text-gray-200")
                            .aria_label("Clear search")
                            .on(ev::click, move |_| listing.update(|listing| listing.set_search("")))
                            .child("\u{2715}")
                    }))
                    .build(),
            ),
        )),
    ))
}
