//! This module defines the `home` component, the landing page.
//!
//! It introduces the site owner (avatar, name, bio and skills) and previews
//! the newest featured projects and the latest published posts. Each section
//! loads independently, so a slow query only delays its own section.

use leptos::prelude::*;
use leptos_meta::{Title, TitleProps};
use leptos_router::components::A;

use crate::{
    api::{select_featured_projects, select_latest_posts, select_profile},
    components::{cards, loader},
    types::Profile,
};

fn hero(profile: Profile) -> impl IntoView {
    let name = profile.display_name().to_owned();

    view! {
        <section class="flex flex-col gap-6 items-center py-12 text-center">
            {profile.avatar_url.clone().map(|src| view! {
                <img src=src alt=name.clone() class="object-cover rounded-full border-4 size-32 border-primary"/>
            })}
            <h1 class="text-4xl font-bold md:text-6xl">{format!("Hi, I'm {name}")}</h1>
            {profile.bio.clone().map(|bio| view! {
                <p class="max-w-2xl text-lg text-gray-300">{bio}</p>
            })}
            <div class="flex flex-row gap-3">
                <A href="/projects" attr:class="py-2 px-5 text-white rounded-lg transition-all duration-300 bg-primary hover:opacity-80">
                    "View projects"
                </A>
                <A href="/blog" attr:class="py-2 px-5 text-gray-200 rounded-lg border border-gray-600 transition-all duration-300 hover:bg-white hover:text-black">
                    "Read the blog"
                </A>
            </div>
            {(!profile.skills.is_empty()).then(|| view! {
                <div class="flex flex-row flex-wrap gap-2 justify-center mt-4 text-sm">
                    {profile
                        .skills
                        .iter()
                        .map(|skill| view! { <span class="py-1 px-3 rounded-full bg-card">{skill.clone()}</span> })
                        .collect_view()}
                </div>
            })}
        </section>
    }
}

fn section_heading(title: &'static str, href: &'static str, link: &'static str) -> impl IntoView {
    view! {
        <div class="flex flex-row justify-between items-end mb-6">
            <h2 class="text-3xl font-bold">{title}</h2>
            <A href=href attr:class="text-sm text-primary hover:underline">{link}</A>
        </div>
    }
}

/// Renders the landing page.
///
/// The profile resource is blocking so the hero is part of the first HTML
/// response; the project and post previews stream in behind it.
pub fn component() -> impl IntoView {
    let profile = Resource::new_blocking(
        || (),
        move |()| async move { select_profile().await.ok() },
    );
    let featured = Resource::new(
        || (),
        move |()| async move { select_featured_projects().await.unwrap_or_default() },
    );
    let latest = Resource::new(
        || (),
        move |()| async move { select_latest_posts().await.unwrap_or_default() },
    );

    view! {
        {Title(TitleProps::builder().text("Portfolio \u{2013} Projects & Writing").build())}
        <Suspense fallback=loader::component>
            {move || Suspend::new(async move { profile.await.map(hero) })}
        </Suspense>
        <section class="mt-8">
            {section_heading("Featured projects", "/projects", "All projects \u{2192}")}
            <Suspense fallback=loader::component>
                {move || Suspend::new(async move {
                    let projects = featured.await;
                    view! {
                        <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
                            {projects.into_iter().map(cards::project_card).collect_view()}
                        </div>
                    }
                })}
            </Suspense>
        </section>
        <section class="mt-12">
            {section_heading("Latest posts", "/blog", "All posts \u{2192}")}
            <Suspense fallback=loader::component>
                {move || Suspend::new(async move {
                    let posts = latest.await;
                    view! {
                        <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
                            {posts.into_iter().map(cards::post_card).collect_view()}
                        </div>
                    }
                })}
            </Suspense>
        </section>
    }
}
