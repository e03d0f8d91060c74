//! In-process access to a bookmark store.
//!
//! `LocalProxy` owns the store's `Database` and opens a short-lived
//! `BookmarkManager` for every call. It is the seam the RPC handler and the
//! CLI share, and adds no behavior of its own.

use std::fs;
use std::path::Path;

use crate::database::Database;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::proxy::BookmarkProxy;
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

pub struct LocalProxy {
    db: Database,
}

impl LocalProxy {
    /// Opens the store file at `path`, creating it and its parent directory if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BookmarkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    BookmarkError::Storage(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(Self { db: Database::open(path)? })
    }

    /// Opens a throwaway in-memory store.
    pub fn in_memory() -> Result<Self, BookmarkError> {
        Ok(Self { db: Database::open_in_memory()? })
    }

    fn manager(&self) -> BookmarkManager<'_> {
        BookmarkManager::new(self.db.connection())
    }

    /// Removes tags that no bookmark uses any more.
    pub fn prune_tags(&self) -> Result<usize, BookmarkError> {
        self.manager().prune_tags()
    }
}

impl BookmarkProxy for LocalProxy {
    fn list(&self, sorted_by_score: bool) -> Result<Vec<Bookmark>, BookmarkError> {
        self.manager().list(sorted_by_score)
    }

    fn add(&self, url: &str, description: &str, tags: &[String]) -> Result<(), BookmarkError> {
        self.manager().add(url, description, tags).map(|_| ())
    }

    fn add_tag(&self, url: &str, tag: &str) -> Result<(), BookmarkError> {
        self.manager().add_tag(url, tag)
    }

    fn delete(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.manager().delete(url)
    }

    fn get(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.manager().get(url)
    }

    fn hit(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.manager().hit(url)
    }

    fn tag_search(&self, tag: &str) -> Result<Vec<Bookmark>, BookmarkError> {
        self.manager().tag_search(tag)
    }

    fn tag_list(&self) -> Result<Vec<String>, BookmarkError> {
        self.manager().tag_list()
    }

    fn edit(&self, id: i64, url: &str, tags: &[String]) -> Result<Bookmark, BookmarkError> {
        self.manager().edit(id, url, tags)
    }
}
