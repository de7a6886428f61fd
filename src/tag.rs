//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag,
//! and the derivation of a collection's distinct tag labels.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use url::Url;

use crate::post::Post;

/// Represents a [`crate::post::Post`] tag. The `label` field retains the
/// casing written in the post's frontmatter for display purposes; identity
/// and comparison are case-insensitive, so `macOS` and `MacOS` resolve to
/// the same tag.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag's display label, casing preserved.
    pub label: String,

    /// The URL for the tag's listing page. Given a `tags_base_url`, this
    /// looks like `{tags_base_url}/{tag_slug}/`.
    pub url: Url,
}

impl Tag {
    /// Constructs a [`Tag`] from a frontmatter label, rooting its listing
    /// page under `tags_base_url`.
    pub fn new(label: &str, tags_base_url: &Url) -> Tag {
        Tag {
            label: label.to_owned(),
            url: tags_base_url
                .join(&format!("{}/", slug::slugify(label)))
                // slugified segments are always valid path segments
                .unwrap(),
        }
    }

    /// The tag's case-folded comparison key. Folding happens per call so the
    /// display casing on `label` is never disturbed.
    pub fn folded(&self) -> String {
        self.label.to_lowercase()
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating to the case-folded
    /// label.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by comparing the
    /// case-folded labels.
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}
impl Eq for Tag {}

/// Derives the distinct tags across `posts` in order of first appearance.
/// Deduplication is case-insensitive and the first-seen casing wins, so a
/// collection tagged `["Rust", "rust"]` yields a single `Rust` chip.
pub fn available_tags(posts: &[Post]) -> Vec<Tag> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tags = Vec::new();
    for post in posts {
        for tag in &post.tags {
            if seen.insert(tag.folded()) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}
