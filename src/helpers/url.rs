//! URL helpers for generated links

/// Join a site-relative path onto the canonical base URL
///
/// # Examples
/// ```ignore
/// full_url("https://example.com", "tag/rust.html") // -> "https://example.com/tag/rust.html"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Output name of an item page
pub fn item_path(slug: &str) -> String {
    format!("{}.html", slug)
}

/// Output name of a tag page
pub fn tag_path(slug: &str) -> String {
    format!("tag/{}.html", slug)
}

/// Output name of a category page
pub fn category_path(slug: &str) -> String {
    format!("category/{}.html", slug)
}

/// Output name of a numbered index page
pub fn index_page_path(number: usize) -> String {
    format!("page/{}.html", number)
}
