//! This module defines the `project` component, the detail page of one project.
//!
//! It looks the project up by the `id` route parameter and shows its status,
//! period, links, technologies, image gallery and long-form description. An
//! unknown id renders a not-found view with a reload action that clears the
//! server-side cache before asking again.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::{components::A, hooks::use_params_map};

use crate::{
    api::{refresh_content, select_project},
    components::{loader, not_found},
    types::Project,
};

const LINK: &str = "py-2 px-4 text-sm text-white rounded-lg transition-all duration-300 bg-primary hover:opacity-80";

fn links(project: &Project) -> impl IntoView + use<> {
    [
        ("GitHub", project.github_url.clone()),
        ("Live demo", project.demo_url.clone()),
        ("Website", project.project_url.clone()),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.map(|url| {
            view! {
                <a href=url target="_blank" rel="noopener noreferrer" class=LINK>{label}</a>
            }
        })
    })
    .collect_view()
}

fn detail(project: Project) -> impl IntoView {
    let period = project.period();

    view! {
        <Title text=project.title.clone()/>
        <article class="flex flex-col gap-6">
            <A href="/projects" attr:class="text-sm text-gray-400 hover:text-primary">"\u{2190} Back to projects"</A>
            {project.cover_image.clone().map(|src| view! {
                <img src=src alt=project.title.clone() class="object-cover w-full rounded-lg max-h-96"/>
            })}
            <header class="flex flex-col gap-3">
                <div class="flex flex-row flex-wrap gap-2 items-center text-xs">
                    <span class={format!("py-1 px-2 text-white rounded-full {}", project.status.badge_class())}>
                        {project.status.label()}
                    </span>
                    <span class="py-1 px-2 rounded-full bg-gray-700">{project.category.clone()}</span>
                    {period.map(|period| view! { <span class="text-gray-400">{period}</span> })}
                </div>
                <h1 class="text-4xl font-semibold">{project.title.clone()}</h1>
                <p class="text-lg text-gray-300">{project.description.clone()}</p>
                <div class="flex flex-row flex-wrap gap-3">{links(&project)}</div>
            </header>
            {(!project.technologies.is_empty()).then(|| view! {
                <section>
                    <h2 class="mb-3 text-xl font-bold">"Technologies"</h2>
                    <div class="flex flex-row flex-wrap gap-2 text-sm">
                        {project
                            .technologies
                            .iter()
                            .map(|tech| view! { <span class="py-1 px-3 rounded-full bg-card">{tech.clone()}</span> })
                            .collect_view()}
                    </div>
                </section>
            })}
            {project.detailed_description.clone().map(|html| view! {
                <div class="max-w-3xl prose prose-invert prose-a:text-primary" inner_html=html></div>
            })}
            {(!project.images.is_empty()).then(|| view! {
                <section>
                    <h2 class="mb-3 text-xl font-bold">"Gallery"</h2>
                    <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                        {project
                            .images
                            .iter()
                            .enumerate()
                            .map(|(index, src)| view! {
                                <img
                                    src=src.clone()
                                    alt=format!("{} screenshot {}", project.title, index + 1)
                                    class="object-cover w-full rounded-lg"
                                />
                            })
                            .collect_view()}
                    </div>
                </section>
            })}
        </article>
    }
}

pub fn component() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.with(|params| params.get("id").unwrap_or_default());

    let project = Resource::new_blocking(id, move |id| async move { select_project(id).await });

    let reload = Action::new(move |(): &()| async move {
        not_found::report_refresh(refresh_content().await);
        project.refetch();
    });
    let on_reload = Callback::new(move |()| {
        reload.dispatch(());
    });

    view! {
        <Suspense fallback=loader::component>
            {move || Suspend::new(async move {
                let requested = id();
                match project.await {
                    Ok(Some(project)) => detail(project).into_any(),
                    Ok(None) => not_found::component(
                        "Project not found",
                        format!("There is no project with id \"{requested}\"."),
                        "/projects",
                        "Back to projects",
                        on_reload,
                    )
                    .into_any(),
                    Err(err) => not_found::component(
                        "Project unavailable",
                        err.to_string(),
                        "/projects",
                        "Back to projects",
                        on_reload,
                    )
                    .into_any(),
                }
            })}
        </Suspense>
    }
}
