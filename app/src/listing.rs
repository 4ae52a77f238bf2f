//! Category filter, text search and pagination over a loaded collection.
//!
//! Everything here is synchronous and allocation-light so the same code runs
//! during server rendering and in the hydrated page.

extern crate alloc;
use alloc::collections::BTreeMap;
use core::fmt;

use crate::types::{BlogPost, Paginated, Project};

pub const POSTS_PER_PAGE: usize = 4;
pub const PROJECTS_PER_PAGE: usize = 6;

/// Width of the page-number strip under a listing.
const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    /// `"all"`, `"All"` and `"全部"` select everything; anything else names a
    /// category.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" | "All" | "全部" => Self::All,
            name => Self::Named(name.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// A record that can be shown in a filtered, paginated listing.
pub trait Listable {
    fn in_category(&self, category: &str) -> bool;

    /// Title, summary text and labels, in that order.
    fn search_fields(&self) -> impl Iterator<Item = &str>;

    /// `needle` must already be lowercase.
    fn contains_text(&self, needle: &str) -> bool {
        self.search_fields()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Listable for BlogPost {
    fn in_category(&self, category: &str) -> bool {
        self.tags.iter().any(|tag| tag == category)
    }

    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.excerpt()]
            .into_iter()
            .chain(self.tags.iter().map(String::as_str))
    }
}

impl Listable for Project {
    fn in_category(&self, category: &str) -> bool {
        self.category == category
    }

    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.technologies.iter().map(String::as_str))
    }
}

/// Records passing both the category and the search filter, in input order.
/// An empty search term disables text filtering; any other term, spaces
/// included, must appear as typed.
pub fn filter_items<'a, T: Listable>(
    items: &'a [T],
    category: &Category,
    search: &str,
) -> Vec<&'a T> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| match category {
            Category::All => true,
            Category::Named(name) => item.in_category(name),
        })
        .filter(|item| needle.is_empty() || item.contains_text(&needle))
        .collect()
}

#[must_use]
pub const fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Up to five consecutive page numbers around `current`, shifted to stay
/// inside `1..=total`.
#[must_use]
pub fn page_numbers(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total);
    if end + 1 - start < PAGE_WINDOW {
        start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    }
    (start..=end).collect()
}

/// Cuts page `page` (1-based) out of `items`. Out-of-range pages are clamped.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Paginated<T> {
    let total = items.len();
    let total_pages = total_pages(total, page_size);
    let page = page.clamp(1, total_pages.max(1));
    let items = items
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Paginated {
        items,
        total,
        page,
        page_size,
        total_pages,
        page_numbers: page_numbers(page, total_pages),
    }
}

/// Filter and paging state of one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    category: Category,
    search: String,
    page: usize,
    page_size: usize,
}

impl Listing {
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            category: Category::All,
            search: String::new(),
            page: 1,
            page_size,
        }
    }

    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether a category or search term narrows the listing.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.category.is_all() || !self.search.is_empty()
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Moves to `page` if it lies in `1..=total_pages`. Returns whether the
    /// page changed.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// "Page 1 of 2, showing 4 posts (category: Rust) (search: "x")".
    #[must_use]
    pub fn summary<T>(&self, page: &Paginated<T>, noun: &str) -> String {
        let mut line = format!(
            "Page {} of {}, showing {} {noun}",
            page.page,
            page.total_pages.max(1),
            page.items.len()
        );
        if let Category::Named(name) = &self.category {
            line.push_str(&format!(" (category: {name})"));
        }
        if !self.search.is_empty() {
            line.push_str(&format!(" (search: \"{}\")", self.search));
        }
        line
    }

    #[must_use]
    pub fn apply<T: Listable + Clone>(&self, items: &[T]) -> Paginated<T> {
        let visible: Vec<T> = filter_items(items, &self.category, &self.search)
            .into_iter()
            .cloned()
            .collect();
        paginate(&visible, self.page, self.page_size)
    }
}

/// Post count per tag, for the blog category buttons.
#[must_use]
pub fn tag_counts(posts: &[BlogPost]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in posts.iter().flat_map(|post| &post.tags) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

/// Project count per category, for the project category buttons.
#[must_use]
pub fn project_categories(projects: &[Project]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for project in projects {
        *counts.entry(project.category.clone()).or_insert(0) += 1;
    }
    counts
}
