//! Unit tests for the BookmarkManager public API.
//!
//! These tests exercise the store through the `BookmarkManagerTrait`
//! interface, using an in-memory SQLite database. Locking between two
//! connections is checked on a temporary store file.

use std::thread;
use std::time::{Duration, Instant};

use marcador::database::Database;
use marcador::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use marcador::types::bookmark::INITIAL_SCORE;
use marcador::types::errors::BookmarkError;
use tempfile::TempDir;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn count_rows(db: &Database, table: &str) -> i64 {
    db.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_add_creates_bookmark_with_initial_ranking() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    let added = mgr
        .add("https://rust-lang.org", "Rust", &tags(&["lang", "rust"]))
        .unwrap()
        .expect("first add should insert");

    assert_eq!(added.url, "https://rust-lang.org");
    assert_eq!(added.description, "Rust");
    assert_eq!(added.count, 0);
    assert_eq!(added.score, INITIAL_SCORE);
    assert_eq!(added.tags, tags(&["lang", "rust"]));
    assert_eq!(mgr.get_by_id(added.id).unwrap(), added);
}

#[test]
fn test_add_same_url_twice_is_noop() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    assert!(mgr.add("a.com", "", &[]).unwrap().is_some());
    assert!(mgr.add("a.com", "other", &tags(&["x"])).unwrap().is_none());

    let all = mgr.list(false).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "");
    assert!(all[0].tags.is_empty(), "second add must not attach tags");
    assert_eq!(count_rows(&db, "tags"), 0, "second add must not create tags");
}

#[test]
fn test_add_rejects_blank_url() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    assert!(matches!(mgr.add("  ", "", &[]), Err(BookmarkError::Validation(_))));
}

#[test]
fn test_add_shares_existing_tags() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    mgr.add("a.com", "", &tags(&["web"])).unwrap();
    mgr.add("b.com", "", &tags(&["web", "web", "news"])).unwrap();

    assert_eq!(count_rows(&db, "tags"), 2);
    assert_eq!(mgr.get("b.com").unwrap().tags, tags(&["web", "news"]));
}

#[test]
fn test_list_unsorted_keeps_insertion_order() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    for url in ["c.com", "a.com", "b.com"] {
        mgr.add(url, "", &[]).unwrap();
    }
    let urls: Vec<String> = mgr.list(false).unwrap().into_iter().map(|b| b.url).collect();
    assert_eq!(urls, vec!["c.com", "a.com", "b.com"]);
}

#[test]
fn test_list_sorted_by_score_breaks_ties_by_insertion() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());

    for url in ["a.com", "b.com", "c.com"] {
        mgr.add(url, "", &[]).unwrap();
    }
    mgr.hit("c.com").unwrap();

    let urls: Vec<String> = mgr.list(true).unwrap().into_iter().map(|b| b.url).collect();
    assert_eq!(urls, vec!["c.com", "a.com", "b.com"]);
}

#[test]
fn test_add_tag_is_idempotent_and_creates_tag() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &[]).unwrap();

    mgr.add_tag("a.com", "docs").unwrap();
    mgr.add_tag("a.com", "docs").unwrap();

    assert_eq!(mgr.get("a.com").unwrap().tags, tags(&["docs"]));
    assert_eq!(count_rows(&db, "bookmarks_tags"), 1);
    assert_eq!(mgr.tag_list().unwrap(), tags(&["docs"]));
}

#[test]
fn test_add_tag_unknown_url_is_not_found() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    assert!(matches!(
        mgr.add_tag("missing.com", "x"),
        Err(BookmarkError::NotFound(_))
    ));
    assert_eq!(count_rows(&db, "tags"), 0, "failed add_tag must roll back");
}

#[test]
fn test_delete_returns_snapshot_and_removes_associations() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "Site A", &tags(&["x", "y"])).unwrap();
    mgr.add("b.com", "", &tags(&["x"])).unwrap();

    let before = mgr.get("a.com").unwrap();
    let removed = mgr.delete("a.com").unwrap();

    assert_eq!(removed, before);
    assert!(matches!(mgr.get("a.com"), Err(BookmarkError::NotFound(_))));
    assert_eq!(count_rows(&db, "bookmarks_tags"), 1);
    assert_eq!(mgr.tag_search("y").unwrap().len(), 0);
}

#[test]
fn test_delete_unknown_url_is_not_found() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    assert!(matches!(mgr.delete("nope.com"), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_get_by_id_unknown_is_not_found() {
    let db = setup();
    let mgr = BookmarkManager::new(db.connection());
    assert!(matches!(mgr.get_by_id(99), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_edit_replaces_url_and_tags() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let original = mgr.add("old.com", "desc", &tags(&["a", "b"])).unwrap().unwrap();
    mgr.hit("old.com").unwrap();

    let edited = mgr.edit(original.id, "new.com", &tags(&["b", "c"])).unwrap();

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.url, "new.com");
    assert_eq!(edited.description, "desc");
    assert_eq!(edited.count, 1, "edit keeps ranking state");
    assert_eq!(edited.tags, tags(&["b", "c"]));
    assert!(mgr.tag_search("a").unwrap().is_empty());
    assert!(matches!(mgr.get("old.com"), Err(BookmarkError::NotFound(_))));
}

#[test]
fn test_edit_to_own_url_only_replaces_tags() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let bm = mgr.add("a.com", "", &tags(&["x"])).unwrap().unwrap();

    let edited = mgr.edit(bm.id, "a.com", &[]).unwrap();
    assert!(edited.tags.is_empty());
}

#[test]
fn test_edit_onto_other_url_conflicts_and_rolls_back() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    let a = mgr.add("a.com", "", &tags(&["x"])).unwrap().unwrap();
    mgr.add("b.com", "", &[]).unwrap();

    assert!(matches!(
        mgr.edit(a.id, "b.com", &tags(&["y"])),
        Err(BookmarkError::Conflict(_))
    ));
    assert_eq!(mgr.get("a.com").unwrap().tags, tags(&["x"]));
}

#[test]
fn test_edit_unknown_id_is_not_found() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    assert!(matches!(
        mgr.edit(7, "z.com", &[]),
        Err(BookmarkError::NotFound(_))
    ));
}

#[test]
fn test_tag_search_unknown_tag_is_empty() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &tags(&["x"])).unwrap();
    assert!(mgr.tag_search("nothing").unwrap().is_empty());
}

#[test]
fn test_tag_search_returns_every_tagged_bookmark() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &tags(&["x"])).unwrap();
    mgr.add("b.com", "", &[]).unwrap();
    mgr.add("c.com", "", &tags(&["x", "y"])).unwrap();

    let urls: Vec<String> = mgr.tag_search("x").unwrap().into_iter().map(|b| b.url).collect();
    assert_eq!(urls, vec!["a.com", "c.com"]);
}

#[test]
fn test_tag_list_has_each_tag_once() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &tags(&["web", "rust"])).unwrap();
    mgr.add("b.com", "", &tags(&["rust"])).unwrap();
    mgr.add_tag("b.com", "web").unwrap();

    assert_eq!(mgr.tag_list().unwrap(), tags(&["rust", "web"]));
}

#[test]
fn test_hit_unknown_url_is_not_found_and_changes_nothing() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &[]).unwrap();

    assert!(matches!(mgr.hit("b.com"), Err(BookmarkError::NotFound(_))));
    assert_eq!(mgr.get("a.com").unwrap().score, INITIAL_SCORE);
}

#[test]
fn test_prune_tags_removes_orphans_only() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add("a.com", "", &tags(&["keep"])).unwrap();
    mgr.add("b.com", "", &tags(&["drop"])).unwrap();
    mgr.delete("b.com").unwrap();

    assert_eq!(mgr.prune_tags().unwrap(), 1);
    assert_eq!(mgr.tag_list().unwrap(), tags(&["keep"]));
    assert_eq!(mgr.prune_tags().unwrap(), 0);
}

#[test]
fn test_padded_url_round_trip() {
    let db = setup();
    let mut mgr = BookmarkManager::new(db.connection());
    mgr.add(" a.com ", "", &tags(&["x"])).unwrap();

    assert_eq!(mgr.get(" a.com ").unwrap().url, "a.com");
    mgr.add_tag(" a.com ", "y").unwrap();
    assert_eq!(mgr.hit(" a.com ").unwrap().count, 1);
    assert!(mgr.add(" a.com", "", &[]).unwrap().is_none());

    let removed = mgr.delete(" a.com ").unwrap();
    assert_eq!(removed.tags, tags(&["x", "y"]));
    assert!(mgr.list(false).unwrap().is_empty());
}

#[test]
fn test_writer_waits_for_other_connection_to_commit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("marcador.sqlite");

    let holder = Database::open(&path).unwrap();
    BookmarkManager::new(holder.connection()).add("a.com", "", &[]).unwrap();
    let waiter = Database::open(&path).unwrap();

    // Hold the write lock with a pending change the waiter has not seen yet.
    holder
        .connection()
        .execute_batch("BEGIN IMMEDIATE; INSERT INTO bookmarks (url) VALUES ('b.com');")
        .unwrap();

    let handle = thread::spawn(move || {
        let started = Instant::now();
        let result = BookmarkManager::new(waiter.connection()).hit("a.com");
        (result, started.elapsed())
    });

    thread::sleep(Duration::from_millis(300));
    holder.connection().execute_batch("COMMIT;").unwrap();

    let (result, waited) = handle.join().unwrap();
    let hit = result.expect("hit should wait for the lock, not fail");
    assert_eq!(hit.count, 1);
    assert!(waited >= Duration::from_millis(200), "hit returned after {:?}", waited);

    let mgr = BookmarkManager::new(holder.connection());
    assert!((mgr.get("b.com").unwrap().score - 0.95).abs() < 1e-9);
}
