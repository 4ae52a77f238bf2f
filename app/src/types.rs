use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "ssr")]
use axum::extract::FromRef;
#[cfg(feature = "ssr")]
use leptos::config::LeptosOptions;

#[cfg(feature = "ssr")]
use crate::hooks::ContentHooks;

#[cfg(feature = "ssr")]
#[derive(FromRef, Debug, Clone)]
pub struct AppState {
    pub hooks: std::sync::Arc<ContentHooks>,
    pub leptos_options: std::sync::Arc<LeptosOptions>,
}

#[cfg(feature = "ssr")]
impl FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.as_ref().clone()
    }
}

/// Accepts both text and numeric primary keys; the hosted tables use either.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Array columns come back as `null` when unset.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_category() -> String {
    "Other".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Full name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[serde(alias = "planned")]
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Wire value used in equality filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::OnHold => "On hold",
        }
    }

    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Completed => "bg-green-600",
            Self::InProgress => "bg-yellow-600",
            Self::Planning | Self::OnHold => "bg-gray-600",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// Trusted HTML, rendered without sanitization.
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// `start - end`, with an open end shown as "present".
    #[must_use]
    pub fn period(&self) -> Option<String> {
        let start = self.start_date?;
        let end = self
            .end_date
            .map_or_else(|| "present".to_owned(), |end| end.format("%b %Y").to_string());
        Some(format!("{} - {end}", start.format("%b %Y")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Trusted HTML, rendered without sanitization.
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published: bool,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub read_time: Option<usize>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Publication date, or creation date for posts that never recorded one.
    #[must_use]
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    #[must_use]
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map_or("Article", String::as_str)
    }

    #[must_use]
    pub fn excerpt(&self) -> &str {
        self.excerpt.as_deref().unwrap_or_default()
    }
}

/// Filter envelope for project queries. `None` leaves a column unfiltered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProjectFilters {
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub owner: Option<String>,
    pub limit: Option<usize>,
}

impl ProjectFilters {
    #[must_use]
    pub fn featured(limit: usize) -> Self {
        Self {
            featured: Some(true),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Row predicate equivalent to the equality filters (limit excluded).
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        self.featured.is_none_or(|featured| project.featured == featured)
            && self.status.is_none_or(|status| project.status == status)
            && self
                .owner
                .as_ref()
                .is_none_or(|owner| &project.user_id == owner)
    }
}

/// Filter envelope for blog post queries. `tags` matches posts sharing at
/// least one tag; an empty list leaves tags unfiltered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BlogPostFilters {
    pub published: Option<bool>,
    pub owner: Option<String>,
    pub limit: Option<usize>,
    pub tags: Vec<String>,
}

impl BlogPostFilters {
    #[must_use]
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn latest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::published()
        }
    }

    #[must_use]
    pub fn matches(&self, post: &BlogPost) -> bool {
        self.published.is_none_or(|published| post.published == published)
            && self.owner.as_ref().is_none_or(|owner| &post.user_id == owner)
            && (self.tags.is_empty() || post.tags.iter().any(|tag| self.tags.contains(tag)))
    }
}

/// One page of a filtered collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub page_numbers: Vec<usize>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 0,
            total_pages: 0,
            page_numbers: Vec::new(),
        }
    }
}
