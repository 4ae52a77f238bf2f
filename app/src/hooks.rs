//! Content queries with caching, a bounded retry and fixture fallback.
//!
//! Every hook tries the data service first. When no service is configured,
//! or the query still fails after the retry budget, the hook logs a warning
//! and serves the matching fixture data instead, so pages always have
//! something to render. Only a lookup that matches nothing in either place
//! comes back as [`FetchError::NotFound`].

use core::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use shared_utils::{RetryConfig, estimate_read_time, retry_async_if};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::client::{DataSource, QueryError};
use crate::fixtures;
use crate::types::{BlogPost, BlogPostFilters, Profile, Project, ProjectFilters};

pub const FEATURED_PROJECTS: usize = 3;
pub const LATEST_POSTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(QueryKey),
}

/// Where content is coming from, as reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Remote,
    Fallback,
}

pub struct ContentHooks {
    source: Option<Arc<dyn DataSource>>,
    retry: RetryConfig,
    owner_id: String,
    profiles: QueryCache<Profile, FetchError>,
    project_lists: QueryCache<Vec<Project>, FetchError>,
    projects: QueryCache<Project, FetchError>,
    post_lists: QueryCache<Vec<BlogPost>, FetchError>,
    posts: QueryCache<BlogPost, FetchError>,
}

impl fmt::Debug for ContentHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHooks")
            .field("data_mode", &self.data_mode())
            .field("retry", &self.retry)
            .field("owner_id", &self.owner_id)
            .finish_non_exhaustive()
    }
}

impl ContentHooks {
    /// `source: None` runs entirely on fixture data.
    pub fn new(
        source: Option<Arc<dyn DataSource>>,
        retry: RetryConfig,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            retry,
            owner_id: owner_id.into(),
            profiles: QueryCache::new(),
            project_lists: QueryCache::new(),
            projects: QueryCache::new(),
            post_lists: QueryCache::new(),
            posts: QueryCache::new(),
        }
    }

    #[must_use]
    pub fn data_mode(&self) -> DataMode {
        if self.source.is_some() {
            DataMode::Remote
        } else {
            DataMode::Fallback
        }
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    async fn remote<T, F, Fut>(&self, key: &QueryKey, mut query: F) -> Result<T, QueryError>
    where
        F: FnMut(Arc<dyn DataSource>) -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let source = self.source.as_ref().ok_or(QueryError::NotConfigured)?;
        retry_async_if(
            &key.to_string(),
            self.retry,
            || query(Arc::clone(source)),
            QueryError::is_transient,
        )
        .await
    }

    pub async fn profile(&self) -> Result<Profile, FetchError> {
        let key = &QueryKey::Profile(self.owner_id.clone());
        let id = self.owner_id.as_str();

        self.profiles
            .fetch(key, || async move {
                match self
                    .remote(key, move |source| async move { source.fetch_profile(id).await })
                    .await
                {
                    Ok(profile) => Ok(profile),
                    Err(err) => {
                        log_fallback(key, &err);
                        fixtures::profile().ok_or_else(|| FetchError::NotFound(key.clone()))
                    }
                }
            })
            .await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, FetchError> {
        self.project_list(ProjectFilters::default()).await
    }

    pub async fn featured_projects(&self) -> Result<Vec<Project>, FetchError> {
        self.project_list(ProjectFilters::featured(FEATURED_PROJECTS))
            .await
    }

    async fn project_list(&self, filters: ProjectFilters) -> Result<Vec<Project>, FetchError> {
        let key = &QueryKey::Projects(filters.clone());
        let filters = &filters;

        self.project_lists
            .fetch(key, || async move {
                let projects = self
                    .remote(key, move |source| async move {
                        source.list_projects(filters).await
                    })
                    .await
                    .unwrap_or_else(|err| {
                        log_fallback(key, &err);
                        fixtures::projects(filters)
                    });
                Ok(projects)
            })
            .await
    }

    pub async fn project(&self, id: &str) -> Result<Project, FetchError> {
        let key = &QueryKey::Project(id.to_owned());

        self.projects
            .fetch(key, || async move {
                match self
                    .remote(key, move |source| async move { source.get_project(id).await })
                    .await
                {
                    Ok(project) => Ok(project),
                    Err(err) => {
                        log_fallback(key, &err);
                        fixtures::project(id).ok_or_else(|| FetchError::NotFound(key.clone()))
                    }
                }
            })
            .await
    }

    pub async fn blog_posts(&self) -> Result<Vec<BlogPost>, FetchError> {
        self.post_list(BlogPostFilters::published()).await
    }

    pub async fn latest_blog_posts(&self) -> Result<Vec<BlogPost>, FetchError> {
        self.post_list(BlogPostFilters::latest(LATEST_POSTS)).await
    }

    /// Published posts carrying at least one of `tags`, newest first.
    pub async fn blog_posts_tagged(&self, tags: Vec<String>) -> Result<Vec<BlogPost>, FetchError> {
        self.post_list(BlogPostFilters {
            tags,
            ..BlogPostFilters::published()
        })
        .await
    }

    async fn post_list(&self, filters: BlogPostFilters) -> Result<Vec<BlogPost>, FetchError> {
        // Drafts are never served, whatever the caller asked for.
        let filters = BlogPostFilters {
            published: Some(true),
            ..filters
        };
        let key = &QueryKey::BlogPosts(filters.clone());
        let filters = &filters;

        self.post_lists
            .fetch(key, || async move {
                let posts = self
                    .remote(key, move |source| async move {
                        source.list_blog_posts(filters).await
                    })
                    .await
                    .unwrap_or_else(|err| {
                        log_fallback(key, &err);
                        fixtures::blog_posts(filters)
                    });
                Ok(posts
                    .into_iter()
                    .filter(|post| post.published)
                    .map(with_read_time)
                    .collect())
            })
            .await
    }

    pub async fn blog_post(&self, slug: &str) -> Result<BlogPost, FetchError> {
        let key = &QueryKey::BlogPost(slug.to_owned());

        self.posts
            .fetch(key, || async move {
                let remote = self
                    .remote(key, move |source| async move {
                        source.get_blog_post_by_slug(slug).await
                    })
                    .await
                    .and_then(|post| {
                        if post.published {
                            Ok(post)
                        } else {
                            Err(QueryError::NotFound(crate::client::Table::BlogPosts))
                        }
                    });

                match remote {
                    Ok(post) => Ok(with_read_time(post)),
                    Err(err) => {
                        log_fallback(key, &err);
                        fixtures::blog_post(slug)
                            .map(with_read_time)
                            .ok_or_else(|| FetchError::NotFound(key.clone()))
                    }
                }
            })
            .await
    }

    /// Bumps the view counter of a post. Not cached and not retried; the
    /// caller decides what to do with a failure.
    pub async fn record_view(&self, post_id: &str) -> Result<BlogPost, QueryError> {
        let source = self.source.as_ref().ok_or(QueryError::NotConfigured)?;
        source.increment_view_count(post_id).await
    }

    pub fn invalidate(&self, key: &QueryKey) {
        match key {
            QueryKey::Profile(_) => self.profiles.invalidate(key),
            QueryKey::Projects(_) => self.project_lists.invalidate(key),
            QueryKey::Project(_) => self.projects.invalidate(key),
            QueryKey::BlogPosts(_) => self.post_lists.invalidate(key),
            QueryKey::BlogPost(_) => self.posts.invalidate(key),
        }
    }

    /// Forgets every cached result so the next request of each query goes
    /// back to the data service.
    pub fn refetch_all(&self) {
        self.profiles.clear();
        self.project_lists.clear();
        self.projects.clear();
        self.post_lists.clear();
        self.posts.clear();
        debug!("Content cache cleared");
    }
}

fn with_read_time(mut post: BlogPost) -> BlogPost {
    if post.read_time.is_none() {
        post.read_time = Some(estimate_read_time(&post.content));
    }
    post
}

fn log_fallback(key: &QueryKey, err: &QueryError) {
    warn!(query = %key, error = %err, "Failed to fetch from the data service, using fixture data");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockDataSource, Table};
    use assert_matches::assert_matches;

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(1, 1, 1)
    }

    fn hooks(mock: MockDataSource) -> ContentHooks {
        ContentHooks::new(Some(Arc::new(mock)), fast_retry(), "1")
    }

    fn unavailable() -> QueryError {
        QueryError::Rejected {
            table: Table::Projects,
            status: 503,
            message: "service unavailable".to_owned(),
        }
    }

    fn remote_post(slug: &str, published: bool) -> BlogPost {
        let mut post = fixtures::blog_post("shipping-with-docker").unwrap();
        post.slug = slug.to_owned();
        post.title = format!("Remote {slug}");
        post.published = published;
        post.read_time = None;
        post
    }

    #[tokio::test]
    async fn remote_results_pass_through_and_are_cached() {
        let mut mock = MockDataSource::new();
        let mut remote = fixtures::project("1").unwrap();
        remote.title = "From the service".to_owned();
        let expected = vec![remote.clone()];
        mock.expect_list_projects()
            .withf(|filters| *filters == ProjectFilters::default())
            .times(1)
            .returning(move |_| Ok(vec![remote.clone()]));

        let hooks = hooks(mock);
        assert_eq!(hooks.projects().await, Ok(expected.clone()));
        assert_eq!(hooks.projects().await, Ok(expected));
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once_then_falls_back() {
        let mut mock = MockDataSource::new();
        mock.expect_list_projects()
            .times(2)
            .returning(|_| Err(unavailable()));

        let featured = hooks(mock).featured_projects().await.unwrap();
        assert_eq!(featured, fixtures::projects(&ProjectFilters::featured(3)));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let mut mock = MockDataSource::new();
        mock.expect_fetch_profile().times(1).returning(|_| {
            Err(QueryError::Rejected {
                table: Table::Profiles,
                status: 401,
                message: "invalid api key".to_owned(),
            })
        });

        let profile = hooks(mock).profile().await.unwrap();
        assert_eq!(Some(profile), fixtures::profile());
    }

    #[tokio::test]
    async fn profile_is_requested_for_the_owner() {
        let mut mock = MockDataSource::new();
        let fixture = fixtures::profile().unwrap();
        mock.expect_fetch_profile()
            .withf(|id| id == "42")
            .times(1)
            .returning(move |_| Ok(fixture.clone()));

        let hooks = ContentHooks::new(Some(Arc::new(mock)), fast_retry(), "42");
        assert!(hooks.profile().await.is_ok());
    }

    #[tokio::test]
    async fn unconfigured_hooks_serve_fixtures() {
        let hooks = ContentHooks::new(None, fast_retry(), "1");

        assert_eq!(hooks.data_mode(), DataMode::Fallback);
        assert_eq!(hooks.latest_blog_posts().await.unwrap().len(), LATEST_POSTS);
        assert_eq!(
            hooks.blog_posts().await.unwrap().len(),
            fixtures::blog_posts(&BlogPostFilters::published()).len()
        );
        assert!(hooks.project("2").await.is_ok());
        assert_matches!(
            hooks.record_view("1").await,
            Err(QueryError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn slug_missing_everywhere_is_not_found() {
        let mut mock = MockDataSource::new();
        mock.expect_get_blog_post_by_slug()
            .times(1)
            .returning(|_| Err(QueryError::NotFound(Table::BlogPosts)));

        let result = hooks(mock).blog_post("no-such-post").await;
        assert_matches!(result, Err(FetchError::NotFound(QueryKey::BlogPost(slug))) if slug == "no-such-post");
    }

    #[tokio::test]
    async fn remote_miss_falls_through_to_fixture_post() {
        let mut mock = MockDataSource::new();
        mock.expect_get_blog_post_by_slug()
            .returning(|_| Err(QueryError::NotFound(Table::BlogPosts)));

        let post = hooks(mock).blog_post("shipping-with-docker").await.unwrap();
        assert_eq!(post.id, "5");
    }

    /// Counts `WARN` events emitted by this module.
    #[derive(Clone, Default)]
    struct Warnings(Arc<std::sync::atomic::AtomicUsize>);

    impl Warnings {
        fn count(&self) -> usize {
            self.0.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Warnings {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let meta = event.metadata();
            if *meta.level() == tracing::Level::WARN && meta.target() == "app::hooks" {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn detail_misses_warn_before_using_fixtures() {
        use tracing_subscriber::layer::SubscriberExt as _;

        let warnings = Warnings::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(warnings.clone()),
        );

        let mut mock = MockDataSource::new();
        mock.expect_get_blog_post_by_slug()
            .returning(|_| Err(QueryError::NotFound(Table::BlogPosts)));
        mock.expect_get_project()
            .returning(|_| Err(QueryError::NotFound(Table::Projects)));
        let hooks = hooks(mock);

        assert_eq!(hooks.blog_post("shipping-with-docker").await.unwrap().id, "5");
        assert_eq!(warnings.count(), 1);
        assert_eq!(hooks.project("3").await.unwrap().id, "3");
        assert_eq!(warnings.count(), 2);
    }

    #[tokio::test]
    async fn unpublished_remote_rows_are_dropped() {
        let mut mock = MockDataSource::new();
        mock.expect_list_blog_posts()
            .withf(|filters| filters.published == Some(true))
            .returning(|_| Ok(vec![remote_post("live", true), remote_post("draft", false)]));
        mock.expect_get_blog_post_by_slug()
            .returning(|slug| Ok(remote_post(slug, false)));

        let hooks = hooks(mock);
        let slugs: Vec<_> = hooks
            .blog_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.slug)
            .collect();
        assert_eq!(slugs, ["live"]);
        assert_matches!(hooks.blog_post("draft").await, Err(FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_read_time_is_estimated() {
        let mut mock = MockDataSource::new();
        mock.expect_get_blog_post_by_slug()
            .returning(|slug| Ok(remote_post(slug, true)));

        let post = hooks(mock).blog_post("live").await.unwrap();
        assert_eq!(post.read_time, Some(estimate_read_time(&post.content)));
    }

    #[tokio::test]
    async fn refetch_all_reloads_from_the_service() {
        let mut mock = MockDataSource::new();
        mock.expect_list_blog_posts()
            .times(2)
            .returning(|_| Ok(vec![remote_post("live", true)]));

        let hooks = hooks(mock);
        hooks.latest_blog_posts().await.unwrap();
        hooks.latest_blog_posts().await.unwrap();
        hooks.refetch_all();
        hooks.latest_blog_posts().await.unwrap();
    }

    #[tokio::test]
    async fn invalidate_targets_one_query() {
        let mut mock = MockDataSource::new();
        mock.expect_get_project()
            .withf(|id| id == "1")
            .times(2)
            .returning(|id| Ok(fixtures::project(id).unwrap()));
        mock.expect_get_project()
            .withf(|id| id == "2")
            .times(1)
            .returning(|id| Ok(fixtures::project(id).unwrap()));

        let hooks = hooks(mock);
        hooks.project("1").await.unwrap();
        hooks.project("2").await.unwrap();
        hooks.invalidate(&QueryKey::Project("1".to_owned()));
        hooks.project("1").await.unwrap();
        hooks.project("2").await.unwrap();
    }

    #[tokio::test]
    async fn record_view_returns_updated_post() {
        let mut mock = MockDataSource::new();
        mock.expect_increment_view_count()
            .withf(|id| id == "5")
            .times(1)
            .returning(|_| {
                let mut post = fixtures::blog_post("shipping-with-docker").unwrap();
                post.view_count += 1;
                Ok(post)
            });

        let post = hooks(mock).record_view("5").await.unwrap();
        assert_eq!(post.view_count, 211);
    }
}
