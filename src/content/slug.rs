//! Slug derivation for titles, tags and categories

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Punctuation dropped before slugifying, so "Don't Panic!" reads "dont-panic"
    static ref REMOVED_PUNCTUATION: Regex = Regex::new(r#"[*+~.()'"!:@]"#).unwrap();
}

/// Derive a URL-safe, lower-cased file stem from a title.
///
/// Uniqueness is not enforced; two titles with the same slug share an output name.
pub fn slugify_title(title: &str) -> String {
    let spelled = title.replace('&', " and ");
    let stripped = REMOVED_PUNCTUATION.replace_all(&spelled, "");
    let slug = slug::slugify(stripped);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
