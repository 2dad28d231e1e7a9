// ABOUTME: Catalog pages: home, all-courses listing, category page and search results
// ABOUTME: Renders course cards with price, discount, rating and badges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use super::helpers::{
    attr, discount_percent, esc, format_count, format_hours, format_rating, format_vnd, options,
    path_segment, stars, truncate,
};
use super::layout::{page, pagination};
use crate::auth::session::SessionUser;
use crate::models::{CategoryStats, CategoryTree, CourseCard};
use crate::search::{SearchQuery, SearchResponse, SearchSort};

/// Everything shown on the home page
#[derive(Debug, Default)]
pub struct HomeSections {
    /// Most viewed in the last week
    pub weekly: Vec<CourseCard>,
    /// Most viewed overall
    pub top_viewed: Vec<CourseCard>,
    /// Latest additions
    pub newest: Vec<CourseCard>,
    /// Bestsellers and most enrolled
    pub popular: Vec<CourseCard>,
    /// Categories with the most students
    pub top_categories: Vec<CategoryStats>,
    /// Categories with the most enrollments this week
    pub trending_categories: Vec<CategoryStats>,
}

fn price_block(course: &CourseCard) -> String {
    let mut html = format!(
        r#"<span class="fw-bold text-primary">{}</span>"#,
        format_vnd(course.current_price)
    );
    if let Some(percent) = discount_percent(course.current_price, course.original_price) {
        let _ = write!(
            html,
            r#" <del class="text-muted small">{}</del> <span class="badge bg-danger">-{percent}%</span>"#,
            format_vnd(course.original_price)
        );
    }
    html
}

/// One course card; clicking it opens the detail modal
#[must_use]
pub fn course_card(course: &CourseCard) -> String {
    let category = course.category_name.as_deref().unwrap_or("Uncategorized");
    let image = course.image_url.as_deref().unwrap_or("/static/placeholder.svg");
    let bestseller = if course.is_bestseller {
        r#"<span class="badge bg-warning text-dark ms-1">Bestseller</span>"#
    } else {
        ""
    };
    format!(
        r#"<div class="col-12 col-sm-6 col-lg-3 d-flex">
<div class="card shadow-sm border-0 rounded-4 h-100 w-100 hover-shadow course-card" data-id="{id}" data-category="{category_attr}">
<img src="{image}" alt="{title_attr}" class="card-img-top" style="height:180px;object-fit:cover">
<div class="card-body d-flex flex-column justify-content-between">
<div>
<span class="badge bg-light text-primary mb-2">{category}</span>{bestseller}
<h6 class="fw-semibold mb-1"><a class="text-dark text-decoration-none" href="/courses/{id}">{title}</a></h6>
<p class="text-muted small mb-2">{description}</p>
<div class="small text-secondary mb-2">{instructor}</div>
</div>
<div>
<div class="small mb-1">{rating_value} {stars} <span class="text-muted">({students} students)</span></div>
<div>{price}</div>
</div>
</div>
</div>
</div>"#,
        id = course.course_id,
        category_attr = attr(category),
        image = attr(image),
        title_attr = attr(&course.title),
        category = esc(category),
        title = esc(&course.title),
        description = esc(&truncate(&course.description, 110)),
        instructor = esc(course.instructor_name.as_deref().unwrap_or("Unknown instructor")),
        rating_value = format_rating(course.star),
        stars = stars(course.star),
        students = format_count(course.student_count),
        price = price_block(course),
    )
}

/// Grid of course cards, or an empty-state message
#[must_use]
pub fn course_grid(courses: &[CourseCard], empty_message: &str) -> String {
    if courses.is_empty() {
        return format!(
            r#"<div class="col-12 text-center text-muted py-5"><p>{}</p></div>"#,
            esc(empty_message)
        );
    }
    courses.iter().map(course_card).collect()
}

fn section(title: &str, id: &str, courses: &[CourseCard]) -> String {
    format!(
        r#"<section class="mb-5"><h2 class="h4 fw-bold mb-3">{}</h2><div class="row g-4" id="{}">{}</div></section>"#,
        esc(title),
        attr(id),
        course_grid(courses, "No courses yet.")
    )
}

fn category_chips(categories: &[CategoryStats]) -> String {
    let mut html = String::new();
    for stats in categories {
        let _ = write!(
            html,
            r#"<div class="col-6 col-md-4 col-lg-2"><div class="card category-card h-100 text-center p-3" data-category="{attr_name}">
<div class="fw-semibold">{name}</div>
<div class="small text-muted">{courses} courses · {students} students</div>
<a class="stretched-link" href="/category/{segment}"></a>
</div></div>"#,
            attr_name = attr(&stats.category_name),
            name = esc(&stats.category_name),
            courses = stats.course_count,
            students = format_count(stats.total_students),
            segment = path_segment(&stats.category_name),
        );
    }
    html
}

/// Filter buttons for the popular grid
fn filter_buttons(categories: &[CategoryStats]) -> String {
    let mut html = String::from(
        r#"<button class="btn btn-sm btn-outline-primary active filter-btn me-2 mb-2" data-category="all">All</button>"#,
    );
    for stats in categories {
        let _ = write!(
            html,
            r#"<button class="btn btn-sm btn-outline-secondary filter-btn me-2 mb-2" data-category="{}">{}</button>"#,
            attr(&stats.category_name),
            esc(&stats.category_name)
        );
    }
    html
}

/// Home page
#[must_use]
pub fn home_page(user: Option<&SessionUser>, sections: &HomeSections) -> String {
    let body = format!(
        r#"<div class="p-5 mb-5 bg-light rounded-4">
<h1 class="fw-bold">Learn without limits</h1>
<p class="lead text-muted">Courses in programming, design, business and more, taught by practitioners.</p>
<a class="btn btn-primary btn-lg" href="/courses">Browse all courses</a>
</div>
<section class="mb-5"><h2 class="h4 fw-bold mb-3">Top categories</h2><div class="row g-3" id="categoryList">{top}</div></section>
{weekly}
{viewed}
{newest}
<section class="mb-5">
<h2 class="h4 fw-bold mb-3">Popular courses</h2>
<div class="mb-3">{filters}</div>
<div class="row g-4" id="popularCoursesGrid">{popular}</div>
</section>
<section class="mb-5"><h2 class="h4 fw-bold mb-3">Trending this week</h2><div class="row g-3">{trending}</div></section>"#,
        top = category_chips(&sections.top_categories),
        weekly = section("Highlights of the week", "weeklyGrid", &sections.weekly),
        viewed = section("Most viewed", "viewedGrid", &sections.top_viewed),
        newest = section("New courses", "newestGrid", &sections.newest),
        filters = filter_buttons(&sections.top_categories),
        popular = course_grid(&sections.popular, "No courses yet."),
        trending = category_chips(&sections.trending_categories),
    );
    page("Home", user, &body)
}

fn category_sidebar(tree: &[CategoryTree], active: Option<&str>) -> String {
    let mut html = String::from(r#"<div class="list-group mb-4">"#);
    for node in tree {
        let is_active = active.is_some_and(|a| a.eq_ignore_ascii_case(&node.category.name));
        let _ = write!(
            html,
            r#"<a class="list-group-item list-group-item-action fw-semibold{}" href="/category/{}">{}</a>"#,
            if is_active { " active" } else { "" },
            path_segment(&node.category.name),
            esc(&node.category.name)
        );
        for child in &node.children {
            let is_active = active.is_some_and(|a| a.eq_ignore_ascii_case(&child.name));
            let _ = write!(
                html,
                r#"<a class="list-group-item list-group-item-action ps-4 small{}" href="/category/{}">{}</a>"#,
                if is_active { " active" } else { "" },
                path_segment(&child.name),
                esc(&child.name)
            );
        }
    }
    html.push_str("</div>");
    html
}

/// All-courses listing
#[must_use]
pub fn course_list_page(
    user: Option<&SessionUser>,
    courses: &[CourseCard],
    page_number: i64,
    total_pages: i64,
    tree: &[CategoryTree],
) -> String {
    let body = format!(
        r#"<div class="row">
<aside class="col-lg-3">{sidebar}</aside>
<div class="col-lg-9">
<h1 class="h3 fw-bold mb-4">All courses</h1>
<div class="row g-4 mb-4">{grid}</div>
{pager}
</div>
</div>"#,
        sidebar = category_sidebar(tree, None),
        grid = course_grid(courses, "No courses yet."),
        pager = pagination(page_number, total_pages, |n| format!("/courses?page={n}")),
    );
    page("All courses", user, &body)
}

/// Courses of one category (including its subcategories)
#[must_use]
pub fn category_page(
    user: Option<&SessionUser>,
    name: &str,
    courses: &[CourseCard],
    tree: &[CategoryTree],
) -> String {
    let body = format!(
        r#"<div class="row">
<aside class="col-lg-3">{sidebar}</aside>
<div class="col-lg-9">
<h1 class="h3 fw-bold mb-1">{name}</h1>
<p class="text-muted mb-4">{count} courses</p>
<div class="row g-4">{grid}</div>
</div>
</div>"#,
        sidebar = category_sidebar(tree, Some(name)),
        name = esc(name),
        count = courses.len(),
        grid = course_grid(courses, &format!("No courses in \"{name}\" yet.")),
    );
    page(name, user, &body)
}

fn search_card(hit: &crate::search::SearchHit) -> String {
    let mut card = course_card(&hit.course);
    if hit.is_new {
        card = card.replacen(
            r#"<h6 class="fw-semibold mb-1">"#,
            r#"<span class="badge bg-success mb-1">New</span><h6 class="fw-semibold mb-1">"#,
            1,
        );
    }
    card
}

/// Search results; `app.js` swaps pages in place through `/api/search`
#[must_use]
pub fn search_page(
    user: Option<&SessionUser>,
    query: &SearchQuery,
    results: &SearchResponse,
) -> String {
    let sort_options = options(
        SearchSort::ALL.iter().map(|s| (s.as_str(), s.label())),
        query.sort.as_str(),
    );
    let grid = if results.courses.is_empty() {
        r#"<div class="col-12 text-center text-muted py-5"><p>No courses match your search.</p></div>"#
            .to_owned()
    } else {
        results.courses.iter().map(search_card).collect()
    };
    let q_param = urlencoding::encode(&query.q).into_owned();
    let sort = query.sort.as_str();

    let body = format!(
        r#"<form class="row g-2 mb-4" action="/search" method="get" id="searchForm">
<div class="col-md-7"><input class="form-control" type="search" name="q" value="{q_attr}" placeholder="Search courses"></div>
<div class="col-md-3"><select class="form-select" name="sort">{sort_options}</select></div>
<div class="col-md-2"><button class="btn btn-primary w-100" type="submit">Search</button></div>
</form>
<p class="text-muted" id="searchSummary">{total} results{for_query}</p>
<div class="row g-4 mb-4" id="searchResults" data-q="{q_attr}" data-sort="{sort}" data-page="{page_number}" data-total-pages="{total_pages}">{grid}</div>
<div id="searchPagination">{pager}</div>"#,
        q_attr = attr(&query.q),
        total = results.total,
        for_query = if query.q.is_empty() {
            String::new()
        } else {
            format!(" for \"{}\"", esc(&query.q))
        },
        page_number = results.page,
        total_pages = results.total_pages,
        pager = pagination(results.page, results.total_pages, |n| {
            format!("/search?q={q_param}&sort={sort}&page={n}")
        }),
    );
    page("Search", user, &body)
}

/// Course length and lecture count, used under titles
#[must_use]
pub fn course_meta(course: &CourseCard) -> String {
    format!(
        "{} · {} lectures",
        format_hours(course.total_hours),
        course.total_lectures
    )
}
