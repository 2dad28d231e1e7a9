// ABOUTME: Course search combining keyword matching with pg_trgm-style trigram similarity
// ABOUTME: Sorts, paginates and flags results (new, bestseller, discounted) for /api/search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Course search
//!
//! A course matches a non-empty query when any of these hold:
//! - every query word appears as a word of its title, description or category
//! - trigram similarity between its title and the query exceeds 0.3
//! - the whole query is a substring of its title or category name
//!
//! Trigrams follow `pg_trgm`: text is lower-cased and split into words on
//! non-alphanumeric characters, each word is padded with two leading spaces
//! and one trailing space, and similarity is `|A ∩ B| / |A ∪ B|`.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{catalog, search};
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::CourseCard;

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    /// Highest star first
    #[default]
    RatingDesc,
    /// Cheapest first
    PriceAsc,
    /// Most recently created first
    Newest,
    /// Most students first
    Bestseller,
}

impl SearchSort {
    /// Parse a query-string value; unknown values fall back to rating
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "price_asc" => Self::PriceAsc,
            "newest" => Self::Newest,
            "bestseller" => Self::Bestseller,
            _ => Self::RatingDesc,
        }
    }

    /// Query-string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RatingDesc => "rating_desc",
            Self::PriceAsc => "price_asc",
            Self::Newest => "newest",
            Self::Bestseller => "bestseller",
        }
    }

    /// Label for the sort dropdown
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RatingDesc => "Highest rated",
            Self::PriceAsc => "Lowest price",
            Self::Newest => "Newest",
            Self::Bestseller => "Best selling",
        }
    }

    /// Every option, in dropdown order
    pub const ALL: [Self; 4] = [Self::RatingDesc, Self::PriceAsc, Self::Newest, Self::Bestseller];
}

/// Normalized search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Trimmed query text (may be empty)
    pub q: String,
    /// 1-based page
    pub page: i64,
    /// Ordering
    pub sort: SearchSort,
}

impl SearchQuery {
    /// Build from raw query-string values
    #[must_use]
    pub fn new(q: Option<&str>, page: Option<i64>, sort: Option<&str>) -> Self {
        let q: String = q
            .unwrap_or_default()
            .trim()
            .chars()
            .take(search::MAX_QUERY_LENGTH)
            .collect();
        Self {
            q,
            page: page.unwrap_or(1).max(1),
            sort: sort.map(SearchSort::parse).unwrap_or_default(),
        }
    }
}

/// One search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Course card; `is_bestseller` also covers courses above the student threshold
    #[serde(flatten)]
    pub course: CourseCard,
    /// Created within the last two weeks
    pub is_new: bool,
    /// Selling below list price
    pub is_discounted: bool,
    /// Title similarity to the query
    pub relevance: f64,
}

/// `/api/search` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Results on this page
    pub courses: Vec<SearchHit>,
    /// Number of pages
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    /// Current page
    pub page: i64,
    /// Number of matching courses
    pub total: i64,
}

/// Set of `pg_trgm` trigrams for a text
#[must_use]
pub fn trigrams(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let mut set = HashSet::new();
    for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert(window.iter().collect());
        }
    }
    set
}

/// `pg_trgm` similarity between two texts, in `0.0..=1.0`
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    shared as f64 / union as f64
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Relevance of a course for a query, `None` when it does not match
#[must_use]
pub fn match_course(course: &CourseCard, query: &str) -> Option<f64> {
    let query = query.trim();
    if query.is_empty() {
        return Some(0.0);
    }

    let score = similarity(&course.title, query);
    let category = course.category_name.as_deref().unwrap_or_default();

    let haystack: HashSet<String> = words(&course.title)
        .chain(words(&course.description))
        .chain(words(category))
        .collect();
    let mut keywords = words(query).peekable();
    let all_keywords = keywords.peek().is_some() && keywords.all(|k| haystack.contains(&k));

    let needle = query.to_lowercase();
    let substring = course.title.to_lowercase().contains(&needle)
        || category.to_lowercase().contains(&needle);

    (all_keywords || score > search::SIMILARITY_THRESHOLD || substring).then_some(score)
}

fn compare(sort: SearchSort, a: &SearchHit, b: &SearchHit) -> Ordering {
    let primary = match sort {
        SearchSort::RatingDesc => b.course.star.total_cmp(&a.course.star),
        SearchSort::PriceAsc => a.course.current_price.cmp(&b.course.current_price),
        SearchSort::Newest => b.course.created_at.cmp(&a.course.created_at),
        SearchSort::Bestseller => b.course.student_count.cmp(&a.course.student_count),
    };
    primary
        .then_with(|| b.relevance.total_cmp(&a.relevance))
        .then_with(|| b.course.course_id.cmp(&a.course.course_id))
}

/// Filter, flag, sort and paginate a set of courses
#[must_use]
pub fn rank(courses: Vec<CourseCard>, query: &SearchQuery, now: DateTime<Utc>) -> SearchResponse {
    let new_cutoff = now - Duration::days(catalog::NEW_COURSE_DAYS);

    let mut hits: Vec<SearchHit> = courses
        .into_iter()
        .filter_map(|mut course| {
            let relevance = match_course(&course, &query.q)?;
            course.is_bestseller =
                course.is_bestseller || course.student_count > catalog::BESTSELLER_STUDENTS;
            Some(SearchHit {
                is_new: course.created_at > new_cutoff,
                is_discounted: course.is_discounted(),
                relevance,
                course,
            })
        })
        .collect();

    hits.sort_by(|a, b| compare(query.sort, a, b));

    let total = hits.len() as i64;
    let page_size = catalog::SEARCH_PAGE_SIZE;
    let total_pages = (total + page_size - 1) / page_size;
    let page = query.page.max(1);
    let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);

    let courses = hits
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    SearchResponse {
        courses,
        total_pages,
        page,
        total,
    }
}

/// Run a search against the listed catalog
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded
#[tracing::instrument(skip(db), fields(q = %query.q, page = query.page, sort = query.sort.as_str()))]
pub async fn search_courses(db: &Database, query: &SearchQuery) -> AppResult<SearchResponse> {
    let courses = db.listed_courses().await?;
    let response = rank(courses, query, Utc::now());
    debug!(total = response.total, "Search complete");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;

    fn card(id: i64, title: &str, category: &str) -> CourseCard {
        CourseCard {
            course_id: id,
            title: title.to_owned(),
            description: String::new(),
            image_url: None,
            current_price: 100_000,
            original_price: 100_000,
            student_count: 0,
            view_count: 0,
            star: 0.0,
            is_bestseller: false,
            status: CourseStatus::Active,
            total_hours: 0.0,
            total_lectures: 0,
            instructor_name: None,
            category_name: Some(category.to_owned()),
            created_at: Utc::now() - Duration::days(30),
        }
    }

    #[test]
    fn test_trigrams_follow_pg_trgm_padding() {
        let set = trigrams("Cat");
        let expected: HashSet<String> = ["  c", " ca", "cat", "at "]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_similarity_reference_values() {
        // pg_trgm: similarity('word', 'words') = 4 / 7
        assert!((similarity("word", "words") - 4.0 / 7.0).abs() < 1e-9);
        assert!((similarity("Rust", "rust") - 1.0).abs() < 1e-9);
        assert!(similarity("abc", "xyz").abs() < 1e-9);
        assert!(similarity("", "xyz").abs() < 1e-9);
    }

    #[test]
    fn test_match_rules() {
        let course = card(1, "Complete JavaScript Bootcamp", "Web Development");
        assert!(match_course(&course, "javascript bootcamp").is_some());
        assert!(match_course(&card(2, "JavaScript Basics", "Web"), "javascrpt").is_some());
        assert!(match_course(&course, "web dev").is_some());
        assert!(match_course(&course, "python").is_none());
    }

    #[test]
    fn test_pagination_and_flags() {
        let mut courses: Vec<CourseCard> = (1..=10).map(|i| card(i, "Rust course", "Programming")).collect();
        courses[0].student_count = 2500;
        courses[1].created_at = Utc::now();
        courses[2].current_price = 50_000;

        let query = SearchQuery::new(Some("rust"), Some(1), Some("bestseller"));
        let first = rank(courses.clone(), &query, Utc::now());
        assert_eq!(first.total, 10);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.courses.len(), 8);
        assert_eq!(first.courses[0].course.course_id, 1);
        assert!(first.courses[0].course.is_bestseller);

        let second = rank(courses, &SearchQuery::new(Some("rust"), Some(2), None), Utc::now());
        assert_eq!(second.courses.len(), 2);
        assert_eq!(second.page, 2);
    }

    #[test]
    fn test_page_far_past_the_end_is_empty() {
        let courses: Vec<CourseCard> = (1..=3).map(|i| card(i, "Rust course", "Programming")).collect();
        let query = SearchQuery::new(Some("rust"), Some(i64::MAX), None);
        let result = rank(courses, &query, Utc::now());
        assert!(result.courses.is_empty());
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.page, i64::MAX);
    }

    #[test]
    fn test_query_normalization() {
        let query = SearchQuery::new(Some("  go  "), Some(-3), Some("bogus"));
        assert_eq!(query.q, "go");
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SearchSort::RatingDesc);
    }

    #[test]
    fn test_price_sort_ties_broken_by_relevance() {
        let courses = vec![
            card(1, "Advanced data science with Python", "Data"),
            card(2, "Python", "Data"),
        ];
        let query = SearchQuery::new(Some("python"), None, Some("price_asc"));
        let result = rank(courses, &query, Utc::now());
        assert_eq!(result.courses[0].course.course_id, 2);
    }
}
