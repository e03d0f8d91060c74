// marcador access proxies
// One operation set, two backends: the local SQLite store and a remote bookmark server.

pub mod local_proxy;
pub mod remote_proxy;

use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

/// The operation set shared by local and remote callers.
///
/// Results and failures are those of the bookmark store; a remote backend
/// only adds `Remote`, `Protocol` and `Transport` errors.
pub trait BookmarkProxy {
    fn list(&self, sorted_by_score: bool) -> Result<Vec<Bookmark>, BookmarkError>;
    /// Adding an existing url is a silent no-op.
    fn add(&self, url: &str, description: &str, tags: &[String]) -> Result<(), BookmarkError>;
    fn add_tag(&self, url: &str, tag: &str) -> Result<(), BookmarkError>;
    fn delete(&self, url: &str) -> Result<Bookmark, BookmarkError>;
    fn get(&self, url: &str) -> Result<Bookmark, BookmarkError>;
    fn hit(&self, url: &str) -> Result<Bookmark, BookmarkError>;
    fn tag_search(&self, tag: &str) -> Result<Vec<Bookmark>, BookmarkError>;
    fn tag_list(&self) -> Result<Vec<String>, BookmarkError>;
    fn edit(&self, id: i64, url: &str, tags: &[String]) -> Result<Bookmark, BookmarkError>;
}

pub use local_proxy::LocalProxy;
pub use remote_proxy::RemoteProxy;
