//! Summary cards linking to a project or post detail page.

use icondata::{BsCalendar, BsClock};
use leptos::prelude::*;
use shared_utils::format_date;

use crate::components::icons;
use crate::types::{BlogPost, Project};

/// Technologies listed on a project card before the rest are summarized.
const CARD_TECHNOLOGIES: usize = 4;

pub fn project_card(project: Project) -> impl IntoView {
    let href = format!("/projects/{}", project.id);
    let hidden = project.technologies.len().saturating_sub(CARD_TECHNOLOGIES);

    view! {
        <article class="flex flex-col overflow-hidden rounded-lg transition-all duration-500 bg-card hover:shadow-lg">
            {project.cover_image.clone().map(|src| view! {
                <a href=href.clone()>
                    <img src=src alt=project.title.clone() class="object-cover w-full h-48 transition-transform duration-300 hover:scale-105"/>
                </a>
            })}
            <div class="flex flex-col flex-grow gap-3 p-5">
                <div class="flex flex-row justify-between items-center text-xs">
                    <span class="py-1 px-2 rounded-full bg-gray-700">{project.category.clone()}</span>
                    <span class={format!("py-1 px-2 text-white rounded-full {}", project.status.badge_class())}>
                        {project.status.label()}
                    </span>
                </div>
                <h3 class="text-xl font-bold transition-colors hover:text-primary">
                    <a href=href.clone()>{project.title.clone()}</a>
                </h3>
                <p class="flex-grow text-sm text-gray-400 line-clamp-3">{project.description.clone()}</p>
                <div class="flex flex-row flex-wrap gap-2 text-xs">
                    {project
                        .technologies
                        .iter()
                        .take(CARD_TECHNOLOGIES)
                        .map(|tech| view! { <span class="py-1 px-2 text-gray-300 rounded bg-gray-700">{tech.clone()}</span> })
                        .collect_view()}
                    {(hidden > 0).then(|| view! { <span class="py-1 px-2 text-gray-400">{format!("+{hidden}")}</span> })}
                </div>
                <a href=href class="text-sm font-medium text-primary hover:underline">"View details \u{2192}"</a>
            </div>
        </article>
    }
}

pub fn post_card(post: BlogPost) -> impl IntoView {
    let href = format!("/blog/{}", post.slug);
    let date = format_date(&post.display_date());
    let read_time = format!("{} min read", post.read_time.unwrap_or(1));

    view! {
        <article class="flex flex-col overflow-hidden rounded-lg transition-all duration-500 bg-card hover:shadow-lg">
            {post.image_url.clone().map(|src| view! {
                <a href=href.clone()>
                    <img src=src alt=post.title.clone() class="object-cover w-full h-48 transition-transform duration-300 hover:scale-105"/>
                </a>
            })}
            <div class="flex flex-col flex-grow gap-3 p-5">
                <div class="flex flex-row justify-between items-center text-xs">
                    <span class="py-1 px-2 text-white rounded-full bg-primary">{post.primary_tag().to_owned()}</span>
                    <span class="flex gap-1 items-center text-gray-400">
                        {icons::glyph(BsCalendar)}{date}
                        {icons::glyph(BsClock)}{read_time}
                    </span>
                </div>
                <h3 class="text-xl font-bold transition-colors hover:text-primary">
                    <a href=href.clone()>{post.title.clone()}</a>
                </h3>
                <p class="flex-grow text-sm text-gray-400 line-clamp-3">{post.excerpt().to_owned()}</p>
                <div class="flex flex-row flex-wrap gap-2 text-xs">
                    {post
                        .tags
                        .iter()
                        .map(|tag| view! { <span class="py-1 px-2 text-gray-300 rounded bg-gray-700">{format!("#{tag}")}</span> })
                        .collect_view()}
                </div>
                <a href=href class="text-sm font-medium text-primary hover:underline">"Read more \u{2192}"</a>
            </div>
        </article>
    }
}
