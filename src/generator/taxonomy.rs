//! Tag and category indexes over processed posts

use indexmap::IndexMap;

use crate::content::{slugify_title, Post};

/// Posts sharing one tag or category output file
#[derive(Debug, Clone)]
pub struct TaxonomyGroup<'a> {
    /// First-seen spelling, used for display
    pub name: String,
    /// Every distinct spelling that maps to this slug
    pub names: Vec<String>,
    /// Posts in recency order, each listed once
    pub posts: Vec<&'a Post>,
}

/// Slug -> group, in first-seen (recency) order
pub type PostIndex<'a> = IndexMap<String, TaxonomyGroup<'a>>;

/// Group posts by tag
pub fn build_tag_index(posts: &[Post]) -> PostIndex<'_> {
    group_by(posts, |p| &p.tags)
}

/// Group posts by category
pub fn build_category_index(posts: &[Post]) -> PostIndex<'_> {
    group_by(posts, |p| &p.categories)
}

fn group_by<'a, F>(posts: &'a [Post], keys: F) -> PostIndex<'a>
where
    F: Fn(&'a Post) -> &'a Vec<String>,
{
    let mut index: PostIndex<'a> = IndexMap::new();

    for post in posts {
        for key in keys(post) {
            if key.trim().is_empty() {
                continue;
            }
            let group = index
                .entry(slugify_title(key))
                .or_insert_with(|| TaxonomyGroup {
                    name: key.clone(),
                    names: Vec::new(),
                    posts: Vec::new(),
                });
            if !group.names.contains(key) {
                group.names.push(key.clone());
            }
            // A post repeating a tag, or carrying two spellings of it, is listed once
            if !group.posts.iter().any(|p| std::ptr::eq(*p, post)) {
                group.posts.push(post);
            }
        }
    }

    index
}

/// Groups whose slug was reached by more than one distinct name
pub fn slug_collisions<'i>(index: &'i PostIndex<'_>) -> Vec<(&'i str, &'i [String])> {
    index
        .iter()
        .filter(|(_, group)| group.names.len() > 1)
        .map(|(slug, group)| (slug.as_str(), group.names.as_slice()))
        .collect()
}
