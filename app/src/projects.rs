//! Project listing with category buttons, text search and pagination.

use leptos::prelude::*;
use leptos_meta::Title;

use crate::{
    api::select_projects,
    components::{cards, filter_bar, loader, pagination},
    listing::{Listing, PROJECTS_PER_PAGE, project_categories},
    types::Project,
};

fn listing_view(projects: Vec<Project>, listing: RwSignal<Listing>) -> impl IntoView {
    let categories = project_categories(&projects);
    let total = projects.len();
    let page = Memo::new(move |_| listing.with(|listing| listing.apply(&projects)));
    let on_select = Callback::new(move |number: usize| {
        let total_pages = page.with_untracked(|page| page.total_pages);
        if listing.try_update(|listing| listing.go_to_page(number, total_pages)) == Some(true) {
            pagination::scroll_to_top();
        }
    });

    view! {
        {filter_bar::component(categories, total, listing, "Search projects...")}
        {move || {
            let page = page.get();
            if page.items.is_empty() {
                view! {
                    <div class="flex flex-col gap-3 items-center py-16 text-center text-gray-400">
                        <p>"No projects match your filters."</p>
                        <button
                            class="py-2 px-4 rounded-lg cursor-pointer bg-card hover:bg-white hover:text-black"
                            on:click=move |_| listing.update(|listing| *listing = Listing::new(PROJECTS_PER_PAGE))
                        >
                            "Clear filters"
                        </button>
                    </div>
                }
                .into_any()
            } else {
                let summary = listing.with(|listing| listing.summary(&page, "projects"));
                view! {
                    <div class="grid grid-cols-1 gap-6 md:grid-cols-2 lg:grid-cols-3">
                        {page.items.into_iter().map(cards::project_card).collect_view()}
                    </div>
                    {pagination::component(page.page, page.total_pages, page.page_numbers, on_select)}
                    <p class="mt-4 text-sm text-center text-gray-400">{summary}</p>
                }
                .into_any()
            }
        }}
    }
}

pub fn component() -> impl IntoView {
    let listing = RwSignal::new(Listing::new(PROJECTS_PER_PAGE));
    let projects = Resource::new(
        || (),
        move |()| async move { select_projects().await.unwrap_or_default() },
    );

    view! {
        <Title text="Projects"/>
        <section class="mb-10 text-center">
            <h1 class="mb-4 text-4xl font-bold md:text-5xl">"Projects"</h1>
            <p class="text-lg text-gray-300">"Things I have built, from side projects to production systems."</p>
        </section>
        <Suspense fallback=loader::component>
            {move || Suspend::new(async move { listing_view(projects.await, listing) })}
        </Suspense>
    }
}
