//! Wire format of the bookmark server.
//!
//! One JSON object per UDP datagram.
//! Request:  {"id":7, "cmd":"add", "args":{"url":"...","description":"...","tags":[...]}}
//! Response: {"id":7, "type":"ok", "payload":...} or {"id":7, "type":"error", "payload":"message"}
//!
//! `id` is optional. A server echoes the id of the request it answers, so a
//! client can tell a late reply to an abandoned call from the reply it waits for.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::errors::BookmarkError;

/// Largest payload of a single UDP/IPv4 datagram. Both ends size their buffers to it.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

const ID_FIELD: &str = "id";

/// A command sent to the bookmark server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub cmd: String,
    #[serde(default = "empty_args")]
    pub args: Value,
}

fn empty_args() -> Value {
    Value::Object(Map::new())
}

impl Request {
    pub fn new(cmd: &str, args: Value) -> Self {
        Self {
            id: None,
            cmd: cmd.to_string(),
            args,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// The single reply to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Response {
    Ok(Value),
    Error(String),
}

impl Response {
    pub fn from_result(result: Result<Value, BookmarkError>) -> Self {
        match result {
            Ok(payload) => Response::Ok(payload),
            Err(err) => Response::Error(err.to_string()),
        }
    }
}

/// A decoded response datagram and the request id it carries, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: Option<u64>,
    pub response: Response,
}

/// Parses a request datagram. `args` must be a JSON object when present.
pub fn decode_request(bytes: &[u8]) -> Result<Request, BookmarkError> {
    let request: Request = serde_json::from_slice(bytes)
        .map_err(|e| BookmarkError::Protocol(format!("undecodable request: {}", e)))?;
    if !request.args.is_object() {
        return Err(BookmarkError::Protocol("args must be an object".to_string()));
    }
    Ok(request)
}

/// Best-effort id of a datagram that failed to decode as a request.
pub fn peek_request_id(bytes: &[u8]) -> Option<u64> {
    serde_json::from_slice::<Value>(bytes)
        .ok()?
        .get(ID_FIELD)?
        .as_u64()
}

pub fn encode_request(request: &Request) -> Result<Vec<u8>, BookmarkError> {
    let bytes = serde_json::to_vec(request)
        .map_err(|e| BookmarkError::Protocol(format!("unencodable request: {}", e)))?;
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(BookmarkError::Protocol(format!(
            "request of {} bytes exceeds the {}-byte datagram limit",
            bytes.len(),
            MAX_DATAGRAM_SIZE
        )));
    }
    Ok(bytes)
}

pub fn decode_response(bytes: &[u8]) -> Result<Reply, BookmarkError> {
    let undecodable = |e: serde_json::Error| BookmarkError::Protocol(format!("undecodable response: {}", e));
    let mut value: Value = serde_json::from_slice(bytes).map_err(undecodable)?;
    let id = value
        .as_object_mut()
        .and_then(|obj| obj.remove(ID_FIELD))
        .and_then(|id| id.as_u64());
    let response = serde_json::from_value(value).map_err(undecodable)?;
    Ok(Reply { id, response })
}

/// Serializes a response tagged with `id`, replacing it with an error
/// response if it would not fit in one datagram.
pub fn encode_response(response: &Response, id: Option<u64>) -> Vec<u8> {
    let bytes = match envelope(response, id) {
        Ok(bytes) => bytes,
        Err(e) => return error_bytes(&format!("Protocol error: unencodable response: {}", e), id),
    };
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return error_bytes(
            &format!(
                "Protocol error: response of {} bytes exceeds the {}-byte datagram limit",
                bytes.len(),
                MAX_DATAGRAM_SIZE
            ),
            id,
        );
    }
    bytes
}

fn envelope(response: &Response, id: Option<u64>) -> serde_json::Result<Vec<u8>> {
    let mut value = serde_json::to_value(response)?;
    if let (Some(id), Some(obj)) = (id, value.as_object_mut()) {
        obj.insert(ID_FIELD.to_string(), Value::from(id));
    }
    serde_json::to_vec(&value)
}

fn error_bytes(message: &str, id: Option<u64>) -> Vec<u8> {
    // A string payload always serializes.
    envelope(&Response::Error(message.to_string()), id).unwrap_or_default()
}
