//! Server functions the pages call to load portfolio and blog content.
//!
//! Each function is a thin wrapper over [`crate::hooks::ContentHooks`], which
//! owns caching, the retry budget and the fixture fallback. Detail lookups
//! answer `Ok(None)` when nothing matches so pages can render a not-found
//! view instead of an error.

#![allow(deprecated)]

use leptos::prelude::{ServerFnError, server};

use crate::types::{BlogPost, Profile, Project};

#[cfg(feature = "ssr")]
use leptos::server_fn::error::NoCustomError;

/// Longest id or slug accepted from a URL.
#[cfg(any(feature = "ssr", test))]
const MAX_KEY_LEN: usize = 200;

/// Route parameters are passed to the data service unchanged; this only
/// rejects values no record could have.
#[cfg(any(feature = "ssr", test))]
fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
        && key.chars().count() <= MAX_KEY_LEN
        && !key.chars().any(char::is_control)
}

#[cfg(feature = "ssr")]
fn found<T>(result: Result<T, crate::hooks::FetchError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(crate::hooks::FetchError::NotFound(key)) => {
            tracing::debug!(query = %key, "Lookup matched nothing");
            None
        }
    }
}

#[cfg(feature = "ssr")]
fn server_error(err: &crate::hooks::FetchError) -> ServerFnError {
    ServerFnError::<NoCustomError>::ServerError(err.to_string())
}

/// Fetches the site owner's profile.
#[server(endpoint = "/profile")]
pub async fn select_profile() -> Result<Profile, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    hooks.profile().await.map_err(|e| server_error(&e))
}

/// Fetches every project, newest first.
#[server(endpoint = "/projects")]
pub async fn select_projects() -> Result<Vec<Project>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    hooks.projects().await.map_err(|e| server_error(&e))
}

/// Fetches the newest featured projects for the home page.
#[server(endpoint = "/featured_projects")]
pub async fn select_featured_projects() -> Result<Vec<Project>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    hooks.featured_projects().await.map_err(|e| server_error(&e))
}

/// Fetches one project by id, or `None` if no project has that id.
#[server(endpoint = "/project")]
pub async fn select_project(id: String) -> Result<Option<Project>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    if !is_valid_key(&id) {
        return Ok(None);
    }
    let AppState { hooks, .. } = expect_context::<AppState>();
    Ok(found(hooks.project(&id).await))
}

/// Fetches published posts, newest first.
///
/// With `tags`, only posts sharing at least one of them are returned.
#[server(endpoint = "/posts")]
pub async fn select_posts(
    #[server(default)] tags: Vec<String>,
) -> Result<Vec<BlogPost>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    let posts = if tags.is_empty() {
        hooks.blog_posts().await
    } else {
        hooks.blog_posts_tagged(tags).await
    };
    posts.map_err(|e| server_error(&e))
}

/// Fetches the newest published posts for the home page.
#[server(endpoint = "/latest_posts")]
pub async fn select_latest_posts() -> Result<Vec<BlogPost>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    hooks.latest_blog_posts().await.map_err(|e| server_error(&e))
}

/// Fetches a published post by slug, or `None` if no published post has it.
#[server(endpoint = "/post")]
pub async fn select_post(slug: String) -> Result<Option<BlogPost>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    if !is_valid_key(&slug) {
        return Ok(None);
    }
    let AppState { hooks, .. } = expect_context::<AppState>();
    Ok(found(hooks.blog_post(&slug).await))
}

/// Adds one view to a post.
///
/// Without a configured data service there is no counter to update and the
/// call succeeds without doing anything.
#[server(endpoint = "/increment_views")]
pub async fn increment_views(id: String) -> Result<(), ServerFnError> {
    use crate::client::QueryError;
    use crate::types::AppState;
    use leptos::prelude::expect_context;
    use tracing::{debug, warn};

    if !is_valid_key(&id) {
        return Err(ServerFnError::<NoCustomError>::ServerError(format!(
            "Invalid post id: '{}'",
            id.chars().take(50).collect::<String>()
        )));
    }

    let AppState { hooks, .. } = expect_context::<AppState>();
    match hooks.record_view(&id).await {
        Ok(post) => {
            debug!(post_id = %id, views = post.view_count, "Recorded post view");
            Ok(())
        }
        Err(QueryError::NotConfigured) => Ok(()),
        Err(err) => {
            warn!(post_id = %id, error = %err, "Failed to record post view");
            Err(ServerFnError::<NoCustomError>::ServerError(format!(
                "Failed to record view: {err}"
            )))
        }
    }
}

/// Drops every cached query so the next load goes back to the data service.
#[server(endpoint = "/refresh_content")]
pub async fn refresh_content() -> Result<(), ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { hooks, .. } = expect_context::<AppState>();
    hooks.refetch_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_pass_through_unless_unusable() {
        assert!(is_valid_key("react-hooks-best-practices"));
        assert!(is_valid_key("react-hooks-最佳实践"));
        assert!(is_valid_key("42"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
        assert!(!is_valid_key("bad\nslug"));
        assert!(!is_valid_key(&"x".repeat(MAX_KEY_LEN + 1)));
    }

    #[test]
    fn test_server_fn_signatures() {
        let _profile_fn: fn() -> _ = select_profile;
        let _projects_fn: fn() -> _ = select_projects;
        let _featured_fn: fn() -> _ = select_featured_projects;
        let _project_fn: fn(String) -> _ = select_project;
        let _posts_fn: fn(Vec<String>) -> _ = select_posts;
        let _latest_fn: fn() -> _ = select_latest_posts;
        let _post_fn: fn(String) -> _ = select_post;
        let _views_fn: fn(String) -> _ = increment_views;
        let _refresh_fn: fn() -> _ = refresh_content;
    }

    #[cfg(feature = "ssr")]
    mod with_context {
        use super::*;
        use crate::hooks::ContentHooks;
        use crate::types::AppState;
        use leptos::config::LeptosOptions;
        use leptos::prelude::{Owner, provide_context};
        use shared_utils::RetryConfig;
        use std::sync::Arc;

        fn fallback_owner() -> Owner {
            let owner = Owner::new();
            owner.set();
            provide_context(AppState {
                hooks: Arc::new(ContentHooks::new(None, RetryConfig::no_retry(), "1")),
                leptos_options: Arc::new(LeptosOptions::builder().output_name("portfolio").build()),
            });
            owner
        }

        #[tokio::test]
        async fn detail_lookups_answer_none_when_missing() {
            let _owner = fallback_owner();

            assert_eq!(select_post("no-such-post".to_owned()).await.unwrap(), None);
            assert_eq!(select_project("404".to_owned()).await.unwrap(), None);
            assert_eq!(select_post(String::new()).await.unwrap(), None);
        }

        #[tokio::test]
        async fn lists_are_served_from_fixtures() {
            let _owner = fallback_owner();

            assert_eq!(select_latest_posts().await.unwrap().len(), 3);
            assert_eq!(select_featured_projects().await.unwrap().len(), 3);
            let tagged = select_posts(vec!["Backend".to_owned()]).await.unwrap();
            assert!(tagged.iter().all(|post| post.tags.contains(&"Backend".to_owned())));
            assert!(select_profile().await.is_ok());
        }

        #[test]
        fn view_increment_is_a_no_op_without_a_service() {
            let _owner = fallback_owner();

            tokio_test::block_on(async {
                assert!(increment_views("1".to_owned()).await.is_ok());
                assert!(increment_views(String::new()).await.is_err());
                assert!(refresh_content().await.is_ok());
            });
        }
    }
}
