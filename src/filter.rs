//! The tag-filter view behind the blog listing. A [`TagFilter`] borrows a
//! loaded collection, owns the set of currently-active tags, and derives the
//! subsequence of the collection carrying *all* active tags. The derived
//! view is recomputed inside every [`TagFilter::toggle_tag`] call, so a
//! caller can never observe a stale view.

use std::collections::HashSet;

use crate::tag::Tag;

/// Exposes an item's tags to the filter. The filter treats everything else
/// about the item as opaque payload, so any listable content (posts,
/// projects) can sit behind the same view.
pub trait Tagged {
    fn tags(&self) -> &[Tag];
}

/// The filter view over a fixed collection. The collection itself is
/// borrowed immutably for the lifetime of the view and never reordered;
/// the view is always a subsequence of it.
pub struct TagFilter<'a, T> {
    items: &'a [T],
    available: Vec<Tag>,
    selected: HashSet<String>,
    visible: Vec<&'a T>,
}

impl<'a, T: Tagged> TagFilter<'a, T> {
    /// Constructs a view with an empty selection, so the initial view is the
    /// whole collection. `available` is the chip list for presentation;
    /// it is typically [`crate::tag::available_tags`] but is accepted
    /// explicitly so the chips need not be limited to tags actually present.
    pub fn new(items: &'a [T], available: Vec<Tag>) -> TagFilter<'a, T> {
        TagFilter {
            items,
            available,
            selected: HashSet::new(),
            visible: items.iter().collect(),
        }
    }

    /// Activates `tag` if it is inactive, deactivates it otherwise, then
    /// recomputes the view. Matching is case-insensitive, so toggling
    /// `Rust` deactivates an earlier `rust`. Toggling a tag outside the
    /// available chip list is accepted; unless items carry it, the view
    /// comes back empty.
    pub fn toggle_tag(&mut self, tag: &str) {
        let folded = tag.to_lowercase();
        if !self.selected.remove(&folded) {
            self.selected.insert(folded);
        }
        self.recompute();
    }

    /// Whether `tag` is currently active (case-insensitive). Pure query.
    pub fn is_active(&self, tag: &str) -> bool {
        self.selected.contains(&tag.to_lowercase())
    }

    /// The current view: the items carrying every active tag, in collection
    /// order. With nothing selected this is the whole collection.
    pub fn visible(&self) -> &[&'a T] {
        &self.visible
    }

    /// The chip list supplied at construction.
    pub fn available(&self) -> &[Tag] {
        &self.available
    }

    /// The size of the unfiltered collection (the `m` in the listing's
    /// "SHOWING n OF m POSTS" counter).
    pub fn total(&self) -> usize {
        self.items.len()
    }

    fn recompute(&mut self) {
        let selected = &self.selected;
        self.visible = self
            .items
            .iter()
            .filter(|item| Self::matches(selected, item.tags()))
            .collect();
    }

    // An item matches when every selected tag has a case-insensitive match
    // among the item's own tags. An empty selection matches vacuously; an
    // item with no tags cannot match a non-empty selection.
    fn matches(selected: &HashSet<String>, tags: &[Tag]) -> bool {
        selected
            .iter()
            .all(|want| tags.iter().any(|tag| tag.folded() == *want))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use url::Url;

    struct Entry {
        id: u32,
        tags: Vec<Tag>,
    }

    impl Tagged for Entry {
        fn tags(&self) -> &[Tag] {
            &self.tags
        }
    }

    fn entry(id: u32, labels: &[&str]) -> Entry {
        let base = Url::parse("https://example.org/blog/tags/").unwrap();
        Entry {
            id,
            tags: labels.iter().map(|label| Tag::new(label, &base)).collect(),
        }
    }

    // The collection from the listing's worked example: two go posts, two
    // rust posts, one overlap.
    fn collection() -> Vec<Entry> {
        vec![
            entry(1, &["go", "infra"]),
            entry(2, &["rust"]),
            entry(3, &["go", "rust"]),
        ]
    }

    fn ids(filter: &TagFilter<Entry>) -> Vec<u32> {
        filter.visible().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_empty_selection_is_passthrough() {
        let items = collection();
        let filter = TagFilter::new(&items, Vec::new());
        assert_eq!(ids(&filter), vec![1, 2, 3]);
        assert_eq!(filter.total(), 3);
    }

    #[test]
    fn test_narrow_and_widen() {
        let items = collection();
        let mut filter = TagFilter::new(&items, Vec::new());

        filter.toggle_tag("go");
        assert_eq!(ids(&filter), vec![1, 3]);

        filter.toggle_tag("rust");
        assert_eq!(ids(&filter), vec![3]);

        // deactivating go leaves only the rust selection
        filter.toggle_tag("go");
        assert_eq!(ids(&filter), vec![2, 3]);
    }

    #[test]
    fn test_toggle_twice_is_a_no_op() {
        let items = collection();
        let mut filter = TagFilter::new(&items, Vec::new());
        filter.toggle_tag("rust");

        filter.toggle_tag("go");
        filter.toggle_tag("go");

        assert!(filter.is_active("rust"));
        assert!(!filter.is_active("go"));
        assert_eq!(ids(&filter), vec![2, 3]);
    }

    #[test]
    fn test_adding_a_tag_never_grows_the_view() {
        let items = collection();
        let mut filter = TagFilter::new(&items, Vec::new());
        let mut previous = filter.visible().len();

        for tag in &["go", "infra", "rust"] {
            filter.toggle_tag(tag);
            assert!(filter.visible().len() <= previous);
            previous = filter.visible().len();
        }
    }

    #[test]
    fn test_view_preserves_collection_order() {
        let items = collection();
        let mut filter = TagFilter::new(&items, Vec::new());
        filter.toggle_tag("rust");

        let visible = ids(&filter);
        let mut expected = visible.clone();
        expected.sort();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let items = vec![entry(1, &["Rust"]), entry(2, &["rust"])];
        let mut filter = TagFilter::new(&items, Vec::new());

        filter.toggle_tag("rust");
        assert_eq!(ids(&filter), vec![1, 2]);

        filter.toggle_tag("rust");
        filter.toggle_tag("RUST");
        assert_eq!(ids(&filter), vec![1, 2]);
        assert!(filter.is_active("Rust"));
    }

    #[test]
    fn test_untagged_item_never_matches() {
        let items = vec![entry(1, &[]), entry(2, &["go"])];
        let mut filter = TagFilter::new(&items, Vec::new());

        filter.toggle_tag("go");
        assert_eq!(ids(&filter), vec![2]);

        filter.toggle_tag("go");
        filter.toggle_tag("rust");
        assert_eq!(ids(&filter), Vec::<u32>::new());
    }

    #[test]
    fn test_unknown_tag_yields_empty_view() {
        let items = collection();
        let mut filter = TagFilter::new(&items, Vec::new());
        filter.toggle_tag("haskell");
        assert!(filter.visible().is_empty());

        // and widening out of it restores the passthrough
        filter.toggle_tag("haskell");
        assert_eq!(ids(&filter), vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_item_tags_are_harmless() {
        let items = vec![entry(1, &["go", "Go", "GO"])];
        let mut filter = TagFilter::new(&items, Vec::new());
        filter.toggle_tag("go");
        assert_eq!(ids(&filter), vec![1]);
    }

    #[test]
    fn test_available_is_passed_through_for_presentation() {
        let base = Url::parse("https://example.org/blog/tags/").unwrap();
        let items = collection();
        let chips = vec![Tag::new("Go", &base), Tag::new("Rust", &base)];
        let filter = TagFilter::new(&items, chips);

        let labels: Vec<&str> = filter.available().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Go", "Rust"]);
    }
}
