//! Splits the sorted post list into index pages

use serde::Serialize;

use crate::helpers::index_page_path;

/// Navigation metadata for one index page. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
    pub is_first: bool,
    pub is_last: bool,
    /// Root-relative link to the next page
    pub next_url: Option<String>,
    /// Root-relative link to the previous page; page 1 is the site root
    pub prev_url: Option<String>,
}

impl Pagination {
    pub fn new(current: usize, total: usize) -> Self {
        let next_page = (current < total).then_some(current + 1);
        let prev_page = (current > 1).then_some(current - 1);
        Self {
            current,
            total,
            has_next: next_page.is_some(),
            has_prev: prev_page.is_some(),
            next_page,
            prev_page,
            is_first: current == 1,
            is_last: current == total,
            next_url: next_page.map(page_url),
            prev_url: prev_page.map(page_url),
        }
    }
}

/// One index page: a contiguous run of posts plus its navigation
#[derive(Debug)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub pagination: Pagination,
}

/// Root-relative URL of index page `number`
pub fn page_url(number: usize) -> String {
    if number <= 1 {
        "/".to_string()
    } else {
        format!("/{}", index_page_path(number))
    }
}

/// Number of index pages for `count` items; always at least one
pub fn total_pages(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1)).max(1)
}

/// Split `items` into pages of `per_page`. An empty list still yields one empty page.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<PageSlice<'_, T>> {
    let per_page = per_page.max(1);
    let total = total_pages(items.len(), per_page);

    (1..=total)
        .map(|number| {
            let start = ((number - 1) * per_page).min(items.len());
            let end = (start + per_page).min(items.len());
            PageSlice {
                items: &items[start..end],
                pagination: Pagination::new(number, total),
            }
        })
        .collect()
}
