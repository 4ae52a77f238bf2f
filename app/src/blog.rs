//! Blog listing: tag buttons, text search and pagination over published posts.
//!
//! All published posts are loaded once; filtering and paging happen in the
//! page itself so switching tags never waits on the server.

use leptos::prelude::*;
use leptos_meta::Title;

use crate::{
    api::select_posts,
    components::{cards, filter_bar, loader, pagination},
    listing::{Listing, POSTS_PER_PAGE, tag_counts},
    types::BlogPost,
};

fn listing_view(posts: Vec<BlogPost>, listing: RwSignal<Listing>) -> impl IntoView {
    let tags = tag_counts(&posts);
    let total = posts.len();
    let page = Memo::new(move |_| listing.with(|listing| listing.apply(&posts)));
    let on_select = Callback::new(move |number: usize| {
        let total_pages = page.with_untracked(|page| page.total_pages);
        if listing.try_update(|listing| listing.go_to_page(number, total_pages)) == Some(true) {
            pagination::scroll_to_top();
        }
    });

    view! {
        {filter_bar::component(tags, total, listing, "Search posts...")}
        {move || {
            let page = page.get();
            if page.items.is_empty() {
                view! {
                    <div class="flex flex-col gap-3 items-center py-16 text-center text-gray-400">
                        <p>"No posts match your filters."</p>
                        <button
                            class="py-2 px-4 rounded-lg cursor-pointer bg-card hover:bg-white hover:text-black"
                            on:click=move |_| listing.update(|listing| *listing = Listing::new(POSTS_PER_PAGE))
                        >
                            "Clear filters"
                        </button>
                    </div>
                }
                .into_any()
            } else {
                let summary = listing.with(|listing| listing.summary(&page, "posts"));
                view! {
                    <div class="grid grid-cols-1 gap-8 lg:grid-cols-2">
                        {page.items.into_iter().map(cards::post_card).collect_view()}
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
    let listing = RwSignal::new(Listing::new(POSTS_PER_PAGE));
    let posts = Resource::new(
        || (),
        move |()| async move { select_posts(Vec::new()).await.unwrap_or_default() },
    );

    view! {
        <Title text="Blog"/>
        <section class="mb-10 text-center">
            <h1 class="mb-4 text-4xl font-bold md:text-5xl">"Blog"</h1>
            <p class="text-lg text-gray-300">"Notes on building software, from the frontend to the database."</p>
        </section>
        <Suspense fallback=loader::component>
            {move || Suspend::new(async move { listing_view(posts.await, listing) })}
        </Suspense>
    }
}
