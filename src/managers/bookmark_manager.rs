//! Bookmark Manager for marcador.
//!
//! Implements `BookmarkManagerTrait`: CRUD, tag search and hit ranking for
//! bookmarks, backed by SQLite via `rusqlite`. Every mutating operation runs
//! in a single transaction; an early return drops the transaction, which
//! rolls it back.
//!
//! Mutations take the write lock when their transaction begins, so a writer
//! racing another process waits out the connection's busy timeout instead
//! of failing on a stale read snapshot.

use rusqlite::{params, Connection, OptionalExtension, Params, Transaction, TransactionBehavior};

use crate::services::ranking_engine::{RankingEngine, RankingEngineTrait};
use crate::types::bookmark::{Bookmark, INITIAL_SCORE};
use crate::types::errors::BookmarkError;

const COLUMNS: &str = "b.id, b.url, b.description, b.count, b.score";

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    /// All bookmarks with their tags, by insertion order or by descending score.
    fn list(&self, sorted_by_score: bool) -> Result<Vec<Bookmark>, BookmarkError>;
    /// Adds a bookmark. Returns `None` without touching the store if the url is already present.
    fn add(&mut self, url: &str, description: &str, tags: &[String]) -> Result<Option<Bookmark>, BookmarkError>;
    fn add_tag(&mut self, url: &str, tag: &str) -> Result<(), BookmarkError>;
    /// Removes a bookmark and its tag associations, returning its last state.
    fn delete(&mut self, url: &str) -> Result<Bookmark, BookmarkError>;
    fn get(&self, url: &str) -> Result<Bookmark, BookmarkError>;
    fn get_by_id(&self, id: i64) -> Result<Bookmark, BookmarkError>;
    /// Replaces the url and the whole tag set of bookmark `id`.
    fn edit(&mut self, id: i64, new_url: &str, new_tags: &[String]) -> Result<Bookmark, BookmarkError>;
    fn tag_search(&self, tag: &str) -> Result<Vec<Bookmark>, BookmarkError>;
    fn tag_list(&self) -> Result<Vec<String>, BookmarkError>;
    /// Records a visit: decays every other score, bumps count and score of `url`.
    fn hit(&mut self, url: &str) -> Result<Bookmark, BookmarkError>;
    /// Deletes tags no bookmark refers to. Returns how many were removed.
    fn prune_tags(&mut self) -> Result<usize, BookmarkError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
    ranking: RankingEngine,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            ranking: RankingEngine::default(),
        }
    }

    /// Starts a transaction holding the write lock from its first statement.
    fn begin_write(&self) -> Result<Transaction<'a>, BookmarkError> {
        Ok(Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?)
    }

    /// Reads a single bookmark row; tags are resolved separately.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            url: row.get(1)?,
            description: row.get(2)?,
            count: row.get(3)?,
            score: row.get(4)?,
            tags: Vec::new(),
        })
    }

    /// Tags of one bookmark, in the order they were attached.
    fn tags_of(&self, bookmark_id: i64) -> Result<Vec<String>, BookmarkError> {
        let mut stmt = self.conn.prepare(
            "SELECT t.tag FROM bookmarks_tags bt JOIN tags t ON t.id = bt.tag_id \
             WHERE bt.bookmark_id = ?1 ORDER BY bt.rowid",
        )?;
        let tags = stmt
            .query_map(params![bookmark_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    /// Runs a bookmark query and resolves the tags of every row.
    fn query_bookmarks<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Bookmark>, BookmarkError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut bookmarks = stmt
            .query_map(params, Self::row_to_bookmark)?
            .collect::<Result<Vec<Bookmark>, _>>()?;
        for bookmark in bookmarks.iter_mut() {
            bookmark.tags = self.tags_of(bookmark.id)?;
        }
        Ok(bookmarks)
    }

    /// Looks a bookmark up by url, matched the way `add` stores it.
    fn find_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError> {
        let url = url.trim();
        let found = self
            .conn
            .query_row(
                &format!("SELECT {} FROM bookmarks b WHERE b.url = ?1", COLUMNS),
                params![url],
                Self::row_to_bookmark,
            )
            .optional()?;
        match found {
            Some(mut bookmark) => {
                bookmark.tags = self.tags_of(bookmark.id)?;
                Ok(Some(bookmark))
            }
            None => Ok(None),
        }
    }

    /// Returns the id of `tag`, creating the tag if it does not exist.
    fn ensure_tag(&self, tag: &str) -> Result<i64, BookmarkError> {
        self.conn
            .execute("INSERT OR IGNORE INTO tags (tag) VALUES (?1)", params![tag])?;
        let id = self
            .conn
            .query_row("SELECT id FROM tags WHERE tag = ?1", params![tag], |row| row.get(0))?;
        Ok(id)
    }

    fn link_tags(&self, bookmark_id: i64, tags: &[String]) -> Result<(), BookmarkError> {
        for tag in normalize_tags(tags) {
            let tag_id = self.ensure_tag(&tag)?;
            self.conn.execute(
                "INSERT OR IGNORE INTO bookmarks_tags (bookmark_id, tag_id) VALUES (?1, ?2)",
                params![bookmark_id, tag_id],
            )?;
        }
        Ok(())
    }
}

/// Trims tags, drops empty ones and collapses duplicates, keeping first-seen order.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn require_url(url: &str) -> Result<&str, BookmarkError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(BookmarkError::Validation("url must not be empty".to_string()));
    }
    Ok(url)
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn list(&self, sorted_by_score: bool) -> Result<Vec<Bookmark>, BookmarkError> {
        let order = if sorted_by_score {
            "b.score DESC, b.id ASC"
        } else {
            "b.id ASC"
        };
        self.query_bookmarks(
            &format!("SELECT {} FROM bookmarks b ORDER BY {}", COLUMNS, order),
            [],
        )
    }

    fn add(
        &mut self,
        url: &str,
        description: &str,
        tags: &[String],
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let url = require_url(url)?;
        let tx = self.begin_write()?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO bookmarks (url, description, count, score) VALUES (?1, ?2, 0, ?3)",
            params![url, description, INITIAL_SCORE],
        )?;
        if inserted == 0 {
            log::debug!("[STORE] {} already bookmarked, add ignored", url);
            return Ok(None);
        }

        let id = self.conn.last_insert_rowid();
        self.link_tags(id, tags)?;
        tx.commit()?;

        log::debug!("[STORE] Added bookmark {} ({})", id, url);
        self.get_by_id(id).map(Some)
    }

    fn add_tag(&mut self, url: &str, tag: &str) -> Result<(), BookmarkError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(BookmarkError::Validation("tag must not be empty".to_string()));
        }

        let tx = self.begin_write()?;
        let bookmark = self
            .find_by_url(url)?
            .ok_or_else(|| BookmarkError::NotFound(url.to_string()))?;
        self.link_tags(bookmark.id, &[tag.to_string()])?;
        tx.commit()?;

        log::debug!("[STORE] Tagged {} with {}", url, tag);
        Ok(())
    }

    fn delete(&mut self, url: &str) -> Result<Bookmark, BookmarkError> {
        let tx = self.begin_write()?;
        let bookmark = self
            .find_by_url(url)?
            .ok_or_else(|| BookmarkError::NotFound(url.to_string()))?;

        self.conn.execute(
            "DELETE FROM bookmarks_tags WHERE bookmark_id = ?1",
            params![bookmark.id],
        )?;
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![bookmark.id])?;
        tx.commit()?;

        log::debug!("[STORE] Deleted bookmark {} ({})", bookmark.id, url);
        Ok(bookmark)
    }

    fn get(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.find_by_url(url)?
            .ok_or_else(|| BookmarkError::NotFound(url.to_string()))
    }

    fn get_by_id(&self, id: i64) -> Result<Bookmark, BookmarkError> {
        self.query_bookmarks(
            &format!("SELECT {} FROM bookmarks b WHERE b.id = ?1", COLUMNS),
            params![id],
        )?
        .pop()
        .ok_or_else(|| BookmarkError::NotFound(format!("id {}", id)))
    }

    fn edit(&mut self, id: i64, new_url: &str, new_tags: &[String]) -> Result<Bookmark, BookmarkError> {
        let new_url = require_url(new_url)?;
        let tx = self.begin_write()?;

        let current = self.get_by_id(id)?;
        if current.url != new_url {
            if let Some(other) = self.find_by_url(new_url)? {
                if other.id != id {
                    return Err(BookmarkError::Conflict(new_url.to_string()));
                }
            }
            self.conn.execute(
                "UPDATE bookmarks SET url = ?1 WHERE id = ?2",
                params![new_url, id],
            )?;
        }

        self.conn
            .execute("DELETE FROM bookmarks_tags WHERE bookmark_id = ?1", params![id])?;
        self.link_tags(id, new_tags)?;
        tx.commit()?;

        log::debug!("[STORE] Edited bookmark {} ({} -> {})", id, current.url, new_url);
        self.get_by_id(id)
    }

    fn tag_search(&self, tag: &str) -> Result<Vec<Bookmark>, BookmarkError> {
        self.query_bookmarks(
            &format!(
                "SELECT {} FROM bookmarks b \
                 JOIN bookmarks_tags bt ON bt.bookmark_id = b.id \
                 JOIN tags t ON t.id = bt.tag_id \
                 WHERE t.tag = ?1 ORDER BY b.id",
                COLUMNS
            ),
            params![tag.trim()],
        )
    }

    fn tag_list(&self) -> Result<Vec<String>, BookmarkError> {
        let mut stmt = self.conn.prepare("SELECT tag FROM tags ORDER BY tag")?;
        let tags = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    fn hit(&mut self, url: &str) -> Result<Bookmark, BookmarkError> {
        let tx = self.begin_write()?;
        let bookmark = self
            .find_by_url(url)?
            .ok_or_else(|| BookmarkError::NotFound(url.to_string()))?;
        self.ranking.apply_hit(self.conn, bookmark.id)?;
        tx.commit()?;

        log::debug!("[STORE] Hit {} (count {})", url, bookmark.count + 1);
        self.get_by_id(bookmark.id)
    }

    fn prune_tags(&mut self) -> Result<usize, BookmarkError> {
        let removed = self.conn.execute(
            "DELETE FROM tags WHERE id NOT IN (SELECT tag_id FROM bookmarks_tags)",
            [],
        )?;
        if removed > 0 {
            log::debug!("[STORE] Pruned {} unused tags", removed);
        }
        Ok(removed)
    }
}
