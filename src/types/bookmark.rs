use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score given to a freshly added bookmark.
pub const INITIAL_SCORE: f64 = 1.0;

/// Represents a saved bookmark together with its resolved tags.
///
/// Remote payloads may carry only `url`, `description` and `tags`; the
/// remaining fields fall back to their defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Terminal listing entry. Colours follow `colored`'s global switch, so
/// piped output stays plain.
impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. ", self.id.to_string().cyan())?;
        if self.description.is_empty() {
            write!(f, "{}", self.url.as_str().yellow())?;
        } else {
            write!(
                f,
                "{}\n  {} {}",
                self.description.as_str().green(),
                ">".red(),
                self.url.as_str().yellow()
            )?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|tag| tag.as_str().blue().to_string()).collect();
            write!(f, "\n  {} {}", "#".red(), tags.join(&",".blue().to_string()))?;
        }
        Ok(())
    }
}
