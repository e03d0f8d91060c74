//! Visit-driven ranking for bookmarks.
//!
//! Every hit multiplies the score of all *other* bookmarks by a decay factor
//! and adds a fixed boost to the bookmark that was opened. The result is a
//! geometric recency + frequency signal that needs no timestamps.

use rusqlite::{params, Connection};

/// Factor applied to every bookmark that was not hit.
pub const DECAY_FACTOR: f64 = 0.95;

/// Amount added to the score of the hit bookmark.
pub const HIT_BOOST: f64 = 1.0;

/// Trait defining the ranking rule.
pub trait RankingEngineTrait {
    /// Applies one hit on bookmark `id` to every row of the store.
    ///
    /// The caller owns the surrounding transaction.
    fn apply_hit(&self, conn: &Connection, id: i64) -> Result<(), rusqlite::Error>;
}

/// Decay/boost parameters of the ranking rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingEngine {
    decay: f64,
    boost: f64,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self {
            decay: DECAY_FACTOR,
            boost: HIT_BOOST,
        }
    }
}

impl RankingEngineTrait for RankingEngine {
    fn apply_hit(&self, conn: &Connection, id: i64) -> Result<(), rusqlite::Error> {
        conn.execute(
            "UPDATE bookmarks SET score = score * ?1 WHERE id != ?2",
            params![self.decay, id],
        )?;
        conn.execute(
            "UPDATE bookmarks SET count = count + 1, score = score + ?1 WHERE id = ?2",
            params![self.boost, id],
        )?;
        Ok(())
    }
}

