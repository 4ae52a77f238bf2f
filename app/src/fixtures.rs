//! Built-in content served when the data service is unreachable.
//!
//! The JSON files use the same row shape the service returns and are decoded
//! once on first use. Lookups take the same filter envelopes as the remote
//! queries so both paths return comparable results.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::types::{BlogPost, BlogPostFilters, Profile, Project, ProjectFilters};

struct Fixtures {
    profile: Option<Profile>,
    projects: Vec<Project>,
    blog_posts: Vec<BlogPost>,
}

fn decode<T: DeserializeOwned>(name: &str, raw: &str) -> Option<T> {
    serde_json::from_str(raw)
        .inspect_err(|err| error!(fixture = name, error = %err, "Failed to decode fixture"))
        .ok()
}

static FIXTURES: Lazy<Fixtures> = Lazy::new(|| {
    let mut projects: Vec<Project> =
        decode("projects", include_str!("../fixtures/projects.json")).unwrap_or_default();
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut blog_posts: Vec<BlogPost> =
        decode("blog_posts", include_str!("../fixtures/blog_posts.json")).unwrap_or_default();
    // Newest first, undated last.
    blog_posts.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => b.is_some().cmp(&a.is_some()),
    });

    Fixtures {
        profile: decode("profile", include_str!("../fixtures/profile.json")),
        projects,
        blog_posts,
    }
});

#[must_use]
pub fn profile() -> Option<Profile> {
    FIXTURES.profile.clone()
}

#[must_use]
pub fn projects(filters: &ProjectFilters) -> Vec<Project> {
    FIXTURES
        .projects
        .iter()
        .filter(|project| filters.matches(project))
        .take(filters.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[must_use]
pub fn project(id: &str) -> Option<Project> {
    FIXTURES
        .projects
        .iter()
        .find(|project| project.id == id)
        .cloned()
}

#[must_use]
pub fn blog_posts(filters: &BlogPostFilters) -> Vec<BlogPost> {
    FIXTURES
        .blog_posts
        .iter()
        .filter(|post| filters.matches(post))
        .take(filters.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// Published posts only.
#[must_use]
pub fn blog_post(slug: &str) -> Option<BlogPost> {
    FIXTURES
        .blog_posts
        .iter()
        .find(|post| post.published && post.slug == slug)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_file_decodes() {
        assert!(profile().is_some());
        assert!(!projects(&ProjectFilters::default()).is_empty());
        assert!(!blog_posts(&BlogPostFilters::default()).is_empty());
    }

    #[test]
    fn published_posts_are_newest_first() {
        let posts = blog_posts(&BlogPostFilters::published());
        assert_eq!(posts.len(), 6);
        assert!(
            posts
                .windows(2)
                .all(|pair| pair[0].published_at >= pair[1].published_at)
        );
    }

    #[test]
    fn drafts_never_match_published_filters() {
        assert!(
            blog_posts(&BlogPostFilters::published())
                .iter()
                .all(|post| post.published)
        );
        assert!(blog_post("notes-on-edge-caching").is_none());
        // The draft exists, it is only hidden.
        assert!(
            blog_posts(&BlogPostFilters::default())
                .iter()
                .any(|post| !post.published)
        );
    }

    #[test]
    fn latest_is_prefix_of_all_published() {
        let all = blog_posts(&BlogPostFilters::published());
        let latest = blog_posts(&BlogPostFilters::latest(3));
        assert_eq!(latest, all[..3]);
    }

    #[test]
    fn featured_is_prefix_of_featured_subset() {
        let all = projects(&ProjectFilters::default());
        let featured = projects(&ProjectFilters::featured(3));

        assert_eq!(featured.len(), 3);
        assert!(featured.iter().all(|project| project.featured));
        let expected: Vec<_> = all.into_iter().filter(|p| p.featured).take(3).collect();
        assert_eq!(featured, expected);
    }

    #[test]
    fn projects_are_newest_first() {
        let all = projects(&ProjectFilters::default());
        assert!(all.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[test]
    fn tag_filter_uses_overlap() {
        let filters = BlogPostFilters {
            tags: vec!["Backend".to_owned(), "Docker".to_owned()],
            ..BlogPostFilters::published()
        };
        let slugs: Vec<_> = blog_posts(&filters).into_iter().map(|p| p.slug).collect();
        assert_eq!(
            slugs,
            [
                "nodejs-performance-guide",
                "postgresql-schema-design-patterns",
                "shipping-with-docker"
            ]
        );
    }

    #[test]
    fn lookups_by_key() {
        assert_eq!(project("4").map(|p| p.title).as_deref(), Some("Realtime Team Dashboard"));
        assert!(project("404").is_none());
        assert_eq!(
            blog_post("shipping-with-docker").map(|p| p.id).as_deref(),
            Some("5")
        );
        assert!(blog_post("missing").is_none());
    }
}
