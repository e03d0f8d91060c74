//! Command handler for the bookmark server protocol.
//!
//! Kept apart from the socket loop so it can be unit-tested on its own.
//! `handle_command` validates the arguments of one command and applies it to
//! a `BookmarkProxy`; nothing is mutated unless every required field is present.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};

use crate::proxy::BookmarkProxy;
use crate::rpc_protocol::{decode_request, encode_response, peek_request_id, Response};
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

/// Commands understood by the server.
pub const COMMANDS: &[&str] = &["list", "add", "tag", "delete", "get", "hit", "search", "tags", "edit"];

/// Fails with a `Validation` error naming every field of `fields` absent from `args`.
fn require(args: &Value, fields: &[&str]) -> Result<(), BookmarkError> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| args.get(*f).map_or(true, Value::is_null))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BookmarkError::Validation(format!("missing fields: {}", missing.join(", "))))
    }
}

fn str_arg<'v>(args: &'v Value, field: &str) -> Result<&'v str, BookmarkError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| BookmarkError::Validation(format!("field '{}' must be a string", field)))
}

fn tags_arg(args: &Value, field: &str) -> Result<Vec<String>, BookmarkError> {
    let invalid = || BookmarkError::Validation(format!("field '{}' must be an array of strings", field));
    args.get(field)
        .and_then(Value::as_array)
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

fn bookmark_value(bookmark: &Bookmark) -> Result<Value, BookmarkError> {
    serde_json::to_value(bookmark).map_err(|e| BookmarkError::Protocol(e.to_string()))
}

fn bookmarks_value(bookmarks: &[Bookmark]) -> Result<Value, BookmarkError> {
    serde_json::to_value(bookmarks).map_err(|e| BookmarkError::Protocol(e.to_string()))
}

/// Dispatch one command to the proxy.
///
/// Returns the success payload, or the error to report to the client.
pub fn handle_command(proxy: &dyn BookmarkProxy, cmd: &str, args: &Value) -> Result<Value, BookmarkError> {
    match cmd {
        "list" => {
            let sorted = args.get("sorted").and_then(Value::as_bool).unwrap_or(false);
            bookmarks_value(&proxy.list(sorted)?)
        }
        "add" => {
            require(args, &["url", "description", "tags"])?;
            let url = str_arg(args, "url")?;
            let description = str_arg(args, "description")?;
            let tags = tags_arg(args, "tags")?;
            proxy.add(url, description, &tags)?;
            Ok(Value::Null)
        }
        "tag" => {
            require(args, &["url", "tag"])?;
            proxy.add_tag(str_arg(args, "url")?, str_arg(args, "tag")?)?;
            Ok(Value::Null)
        }
        "delete" => {
            require(args, &["url"])?;
            bookmark_value(&proxy.delete(str_arg(args, "url")?)?)
        }
        "get" => {
            require(args, &["url"])?;
            bookmark_value(&proxy.get(str_arg(args, "url")?)?)
        }
        "hit" => {
            require(args, &["url"])?;
            bookmark_value(&proxy.hit(str_arg(args, "url")?)?)
        }
        "search" => {
            require(args, &["tag"])?;
            bookmarks_value(&proxy.tag_search(str_arg(args, "tag")?)?)
        }
        "tags" => Ok(json!(proxy.tag_list()?)),
        "edit" => {
            require(args, &["id", "url", "tags"])?;
            let id = args
                .get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| BookmarkError::Validation("field 'id' must be an integer".to_string()))?;
            let url = str_arg(args, "url")?;
            let tags = tags_arg(args, "tags")?;
            bookmark_value(&proxy.edit(id, url, &tags)?)
        }
        _ => Err(BookmarkError::Protocol(format!(
            "unknown command: {} (expected one of {})",
            cmd,
            COMMANDS.join(", ")
        ))),
    }
}

/// Turns one request datagram into exactly one response datagram.
///
/// Decoding failures, handler errors and panics inside the handler all
/// become error responses. The reply carries the request's id when it has one.
pub fn respond(proxy: &dyn BookmarkProxy, datagram: &[u8]) -> Vec<u8> {
    let (id, response) = match decode_request(datagram) {
        Ok(request) => {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                handle_command(proxy, &request.cmd, &request.args)
            }));
            let response = match outcome {
                Ok(result) => {
                    if let Err(err) = &result {
                        log::info!("[SERVER] {} failed: {}", request.cmd, err);
                    }
                    Response::from_result(result)
                }
                Err(_) => {
                    log::error!("[SERVER] {} panicked", request.cmd);
                    Response::Error(format!("internal error while handling {}", request.cmd))
                }
            };
            (request.id, response)
        }
        Err(err) => {
            log::info!("[SERVER] Rejected datagram: {}", err);
            (peek_request_id(datagram), Response::Error(err.to_string()))
        }
    };
    encode_response(&response, id)
}
