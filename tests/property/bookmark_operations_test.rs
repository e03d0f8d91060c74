//! Property-based tests for bookmark store operations.
//!
//! These tests verify that adding is idempotent per url and that tag search
//! returns exactly the bookmarks carrying a tag, for arbitrary urls and tag
//! assignments.

use std::collections::BTreeSet;

use marcador::database::Database;
use marcador::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use proptest::prelude::*;

/// Strategy for generating valid URL strings.
/// Produces URLs with http/https scheme, alphanumeric host, and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for tags drawn from a small pool, so bookmarks share them.
fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        prop_oneof![Just("rust"), Just("web"), Just("news"), Just("docs"), Just("music")],
        0..4,
    )
    .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

// Adding the same url any number of times leaves exactly one bookmark,
// carrying the description and tags of the first add.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn repeated_add_keeps_one_bookmark(
        url in arb_url(),
        first_tags in arb_tags(),
        later_tags in arb_tags(),
        repeats in 1usize..5,
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());

        let first = manager.add(&url, "first", &first_tags).unwrap();
        prop_assert!(first.is_some());
        for _ in 0..repeats {
            prop_assert!(manager.add(&url, "later", &later_tags).unwrap().is_none());
        }

        let all = manager.list(false).unwrap();
        prop_assert_eq!(all.len(), 1);
        prop_assert_eq!(&all[0].description, "first");
        let stored: BTreeSet<&String> = all[0].tags.iter().collect();
        let expected: BTreeSet<&String> = first_tags.iter().collect();
        prop_assert_eq!(stored, expected);
    }
}

// For any collection of bookmarks, searching a tag returns exactly the
// bookmarks that carry it, and the tag listing is the union of all tags.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn tag_search_is_complete_and_exact(
        entries in proptest::collection::btree_map(arb_url(), arb_tags(), 1..8),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());

        for (url, tags) in &entries {
            manager.add(url, "", tags).unwrap();
        }

        let all_tags: BTreeSet<String> = entries.values().flatten().cloned().collect();
        let listed: BTreeSet<String> = manager.tag_list().unwrap().into_iter().collect();
        prop_assert_eq!(&listed, &all_tags);

        for tag in &all_tags {
            let found: BTreeSet<String> = manager
                .tag_search(tag)
                .unwrap()
                .into_iter()
                .map(|b| b.url)
                .collect();
            let expected: BTreeSet<String> = entries
                .iter()
                .filter(|(_, tags)| tags.contains(tag))
                .map(|(url, _)| url.clone())
                .collect();
            prop_assert_eq!(found, expected, "search for tag '{}'", tag);
        }
    }
}

// Deleting a bookmark removes it from every tag search.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn deleted_bookmark_leaves_every_search(
        url in arb_url(),
        tags in arb_tags(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut manager = BookmarkManager::new(db.connection());

        manager.add(&url, "", &tags).unwrap();
        let removed = manager.delete(&url).unwrap();
        prop_assert_eq!(&removed.url, &url);

        for tag in &tags {
            prop_assert!(manager.tag_search(tag).unwrap().is_empty());
        }
        prop_assert!(manager.get(&url).is_err());
    }
}
