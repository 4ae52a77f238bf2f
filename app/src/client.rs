//! Client for the hosted data service (a PostgREST endpoint).
//!
//! The service exposes three tables. [`DataSource`] is the seam the hooks
//! depend on, so tests can swap in a fake; [`SupabaseClient`] is the HTTP
//! implementation. The client never retries: retry and fallback policy lives
//! in [`crate::hooks`].

use core::fmt;
use std::env;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::types::{BlogPost, BlogPostFilters, Profile, Project, ProjectFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profiles,
    Projects,
    BlogPosts,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Projects => "projects",
            Self::BlogPosts => "blog_posts",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("remote data service is not configured")]
    NotConfigured,
    #[error("invalid data service configuration: {0}")]
    InvalidConfig(String),
    #[error("request to `{table}` failed: {source}")]
    Transport {
        table: Table,
        #[source]
        source: reqwest::Error,
    },
    #[error("`{table}` query rejected with status {status}: {message}")]
    Rejected {
        table: Table,
        status: u16,
        message: String,
    },
    #[error("no matching row in `{0}`")]
    NotFound(Table),
}

impl QueryError {
    /// Whether repeating the same request could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => !source.is_decode(),
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::NotConfigured | Self::InvalidConfig(_) | Self::NotFound(_) => false,
        }
    }
}

/// Connection settings for the hosted service.
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl SupabaseConfig {
    /// Reads `SUPABASE_URL` / `SUPABASE_ANON_KEY`, falling back to the
    /// `VITE_`-prefixed names. Returns `None` unless both are set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&format!("VITE_{name}")))
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        Some(Self {
            url: read("SUPABASE_URL")?,
            anon_key: read("SUPABASE_ANON_KEY")?,
        })
    }
}

/// Read access to the portfolio tables, plus the view counter update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_profile(&self, id: &str) -> Result<Profile, QueryError>;

    /// Newest first by `created_at`.
    async fn list_projects(&self, filters: &ProjectFilters) -> Result<Vec<Project>, QueryError>;

    async fn get_project(&self, id: &str) -> Result<Project, QueryError>;

    /// Newest first by `published_at`, undated posts last.
    async fn list_blog_posts(&self, filters: &BlogPostFilters)
    -> Result<Vec<BlogPost>, QueryError>;

    /// Only published posts match.
    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, QueryError>;

    /// Reads the current count and writes count + 1. Not atomic: concurrent
    /// viewers can overwrite each other's increment.
    async fn increment_view_count(&self, post_id: &str) -> Result<BlogPost, QueryError>;
}

/// Query string for one table, in PostgREST's filter dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: Table,
    params: Vec<(String, String)>,
}

impl TableQuery {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            table,
            params: vec![("select".to_owned(), "*".to_owned())],
        }
    }

    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(key, _)| key != "select");
        self.params.push(("select".to_owned(), columns.to_owned()));
        self
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.params.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Array column shares at least one element with `values`.
    #[must_use]
    pub fn overlaps(mut self, column: &str, values: &[String]) -> Self {
        let quoted = values
            .iter()
            .map(|value| format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.to_owned(), format!("ov.{{{quoted}}}")));
        self
    }

    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_owned(), format!("{column}.desc.nullslast")));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.params.retain(|(key, _)| key != "limit");
        self.params.push(("limit".to_owned(), limit.to_string()));
        self
    }

    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    #[must_use]
    pub fn projects(filters: &ProjectFilters) -> Self {
        let mut query = Self::new(Table::Projects).order_desc("created_at");
        if let Some(featured) = filters.featured {
            query = query.eq("featured", featured);
        }
        if let Some(status) = filters.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(owner) = &filters.owner {
            query = query.eq("user_id", owner);
        }
        if let Some(limit) = filters.limit {
            query = query.limit(limit);
        }
        query
    }

    #[must_use]
    pub fn blog_posts(filters: &BlogPostFilters) -> Self {
        let mut query = Self::new(Table::BlogPosts).order_desc("published_at");
        if let Some(published) = filters.published {
            query = query.eq("published", published);
        }
        if let Some(owner) = &filters.owner {
            query = query.eq("user_id", owner);
        }
        if !filters.tags.is_empty() {
            query = query.overlaps("tags", &filters.tags);
        }
        if let Some(limit) = filters.limit {
            query = query.limit(limit);
        }
        query
    }
}

/// [`DataSource`] over the hosted PostgREST API.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, QueryError> {
        let invalid = |err: &dyn fmt::Display| QueryError::InvalidConfig(err.to_string());

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&config.anon_key).map_err(|e| invalid(&e))?;
        api_key.set_sensitive(true);
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", config.anon_key)).map_err(|e| invalid(&e))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| invalid(&e))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    fn url(&self, table: Table) -> String {
        format!("{}/{}", self.rest_url, table.name())
    }

    async fn read_rows<T: DeserializeOwned>(
        table: Table,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<Vec<T>, QueryError> {
        let transport = |source| QueryError::Transport { table, source };
        let response = response.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::Rejected {
                table,
                status: status.as_u16(),
                message,
            });
        }
        response.json::<Vec<T>>().await.map_err(transport)
    }

    async fn rows<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>, QueryError> {
        let response = self
            .http
            .get(self.url(query.table()))
            .query(query.params())
            .send()
            .await;
        Self::read_rows(query.table(), response).await
    }

    async fn first<T: DeserializeOwned>(&self, query: TableQuery) -> Result<T, QueryError> {
        let table = query.table();
        self.rows(&query.limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or(QueryError::NotFound(table))
    }

    async fn update<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        changes: &serde_json::Value,
    ) -> Result<Vec<T>, QueryError> {
        let response = self
            .http
            .patch(self.url(query.table()))
            .query(query.params())
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await;
        Self::read_rows(query.table(), response).await
    }
}

#[derive(Deserialize)]
struct ViewCount {
    #[serde(default)]
    view_count: Option<u64>,
}

#[async_trait]
impl DataSource for SupabaseClient {
    async fn fetch_profile(&self, id: &str) -> Result<Profile, QueryError> {
        self.first(TableQuery::new(Table::Profiles).eq("id", id))
            .await
    }

    async fn list_projects(&self, filters: &ProjectFilters) -> Result<Vec<Project>, QueryError> {
        self.rows(&TableQuery::projects(filters)).await
    }

    async fn get_project(&self, id: &str) -> Result<Project, QueryError> {
        self.first(TableQuery::new(Table::Projects).eq("id", id))
            .await
    }

    async fn list_blog_posts(
        &self,
        filters: &BlogPostFilters,
    ) -> Result<Vec<BlogPost>, QueryError> {
        self.rows(&TableQuery::blog_posts(filters)).await
    }

    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, QueryError> {
        self.first(
            TableQuery::new(Table::BlogPosts)
                .eq("slug", slug)
                .eq("published", true),
        )
        .await
    }

    async fn increment_view_count(&self, post_id: &str) -> Result<BlogPost, QueryError> {
        let current: ViewCount = self
            .first(
                TableQuery::new(Table::BlogPosts)
                    .select("view_count")
                    .eq("id", post_id),
            )
            .await?;
        let next = current.view_count.unwrap_or(0) + 1;

        self.update::<BlogPost>(
            &TableQuery::new(Table::BlogPosts).eq("id", post_id),
            &json!({ "view_count": next }),
        )
        .await?
        .into_iter()
        .next()
        .ok_or(QueryError::NotFound(Table::BlogPosts))
    }
}
