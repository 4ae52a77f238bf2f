use leptos::{
    html::{a, div, span},
    prelude::*,
    svg::svg,
};

/// Label, link and glyph of each social profile shown in the header and footer.
pub const SOCIAL_LINKS: &[(&str, &str, &str)] = &[
    ("GitHub", "https://github.com/", "GH"),
    ("LinkedIn", "https://www.linkedin.com/", "in"),
    ("Email", "mailto:hello@example.com", "@"),
];

pub fn component() -> impl IntoView {
    div().class("flex flex-row gap-3 items-center h-10").child(
        SOCIAL_LINKS
            .iter()
            .map(|(label, href, glyph)| {
                a().href(*href)
                    .rel("noopener noreferrer")
                    .target("_blank")
                    .aria_label(*label)
                    .class("transition-all text-white duration-500 size-6 hover:text-primary")
                    .child(span().class("text-white size-6").child(*glyph))
            })
            .collect_view(),
    )
}

/// Small white inline icon for metadata rows.
pub fn glyph(icon: icondata::Icon) -> impl IntoView {
    svg()
        .attr("viewBox", icon.view_box)
        .attr("innerHTML", icon.data)
        .attr("style", "filter: brightness(0) invert(1);")
        .class("size-4")
}
