//! This module defines the `post` component, which renders one blog post.
//!
//! It fetches the post by URL slug, records a view once the post is loaded,
//! and displays the content with its tags, date, read time and view count.
//! A slug that matches no published post renders the not-found view.

use icondata::{BsCalendar, BsClock, BsEye};
use leptos::html::{article, div, img, p, span};
use leptos::prelude::*;
use leptos_meta::{Title, TitleProps};
use leptos_router::{components::A, hooks::use_params_map};
use shared_utils::format_date;

use crate::{
    api::{increment_views, refresh_content, select_post},
    components::{icons, loader, not_found},
    types::BlogPost,
};

const PROSE: &str = "my-6 mx-auto max-w-3xl prose prose-invert prose-h1:text-3xl prose-h2:text-2xl prose-code:before:content-none prose-code:after:content-none prose-pre:bg-transparent prose-pre:rounded-lg prose-pre:p-0 prose-code:text-primary prose-a:text-primary";

fn children(post: BlogPost) -> impl IntoView {
    let meta = div()
        .class("flex flex-wrap gap-3 justify-start items-center text-sm text-gray-400")
        .child((
            p().class("flex gap-1 items-center").child((
                icons::glyph(BsCalendar),
                format_date(&post.display_date()),
            )),
            p().class("flex gap-1 items-center").child((
                icons::glyph(BsClock),
                format!("{} min read", post.read_time.unwrap_or(1)),
            )),
            p().class("flex gap-1 items-center").child((
                icons::glyph(BsEye),
                format!("{} views", post.view_count),
            )),
        ));
    let tags = div().class("flex flex-row flex-wrap gap-2 text-xs").child(
        post.tags
            .iter()
            .map(|tag| {
                span()
                    .class("py-1 px-2 text-white rounded-full bg-primary")
                    .child(tag.clone())
            })
            .collect_view(),
    );

    div().class("flex flex-col items-center").child((
        Title(TitleProps::builder().text(post.title.clone()).build()),
        post.image_url.clone().map(|src| {
            img()
                .alt(post.title.clone())
                .class("object-contain self-center mb-6 h-full rounded-lg w-fit aspect-auto")
                .src(src)
        }),
        article().class("w-full").child((
            div().class("flex flex-col gap-4 mx-auto max-w-3xl").child((
                view! {
                    <A href="/blog" attr:class="text-sm text-gray-400 hover:text-primary">"\u{2190} Back to blog"</A>
                },
                tags,
                p().class("text-4xl font-semibold").child(post.title.clone()),
                meta,
            )),
            // `content` is trusted HTML from the owner's own tables.
            div().class(PROSE).inner_html(post.content),
        )),
    ))
}

/// Renders an individual blog post page.
///
/// Views are only recorded in release builds so local development does not
/// inflate the counts.
pub fn component() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.with(|params| params.get("slug").unwrap_or_default());

    let post = Resource::new_blocking(slug, move |slug| async move { select_post(slug).await });

    let _increment_view = Action::new(move |id: &String| {
        let id = id.clone();
        async move {
            let _ = increment_views(id).await;
        }
    });

    Effect::new(move |_| {
        #[cfg(not(debug_assertions))]
        if let Some(id) = post.with(|post| match post {
            Some(Ok(Some(post))) => Some(post.id.clone()),
            _ => None,
        }) {
            _increment_view.dispatch(id);
        }
    });

    let reload = Action::new(move |(): &()| async move {
        not_found::report_refresh(refresh_content().await);
        post.refetch();
    });
    let on_reload = Callback::new(move |()| {
        reload.dispatch(());
    });

    view! {
        <Suspense fallback=loader::component>
            {move || Suspend::new(async move {
                let requested = slug();
                match post.await {
                    Ok(Some(post)) => children(post).into_any(),
                    Ok(None) => not_found::component(
                        "Post not found",
                        format!("There is no published post at \"{requested}\"."),
                        "/blog",
                        "Back to blog",
                        on_reload,
                    )
                    .into_any(),
                    Err(err) => not_found::component(
                        "Post unavailable",
                        err.to_string(),
                        "/blog",
                        "Back to blog",
                        on_reload,
                    )
                    .into_any(),
                }
            })}
        </Suspense>
    }
}
