//! Client side of the bookmark server protocol.
//!
//! Every `BookmarkProxy` call is one request/response round trip over UDP.
//! Error responses come back as `BookmarkError::Remote` carrying the
//! server's message, so they stay distinguishable from an empty success.

use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::cell::Cell;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::proxy::BookmarkProxy;
use crate::rpc_protocol::{decode_response, encode_request, Request, Response, MAX_DATAGRAM_SIZE};
use crate::types::bookmark::Bookmark;
use crate::types::config::DEFAULT_TIMEOUT_MS;
use crate::types::errors::BookmarkError;

pub struct RemoteProxy {
    socket: UdpSocket,
    server: SocketAddr,
    timeout: Duration,
    next_id: Cell<u64>,
}

/// Picks the address to talk to among the ones `addr` resolved to.
///
/// The server binds IPv4 by default, so an IPv4 candidate wins over an
/// earlier IPv6 one (`localhost` often resolves to `::1` first).
fn pick_server_addr<I: IntoIterator<Item = SocketAddr>>(addrs: I) -> Option<SocketAddr> {
    let mut first = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        first.get_or_insert(addr);
    }
    first
}

impl RemoteProxy {
    /// Binds an ephemeral local socket aimed at the server at `addr`.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, BookmarkError> {
        let resolved = addr
            .to_socket_addrs()
            .map_err(|e| BookmarkError::Transport(format!("cannot resolve server address: {}", e)))?;
        let server = pick_server_addr(resolved)
            .ok_or_else(|| BookmarkError::Transport("server address resolved to nothing".to_string()))?;

        let local = if server.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).map_err(transport)?;
        // Connecting filters out datagrams from anyone but the server.
        socket.connect(server).map_err(transport)?;

        let proxy = Self {
            socket,
            server,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            next_id: Cell::new(1),
        };
        proxy.apply_timeout()?;
        Ok(proxy)
    }

    /// Sets how long a call waits for the server's answer.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, BookmarkError> {
        self.timeout = timeout;
        self.apply_timeout()?;
        Ok(self)
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    /// `None` when calls wait forever.
    fn read_timeout(&self) -> Option<Duration> {
        // A zero duration is rejected by the socket API.
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    fn apply_timeout(&self) -> Result<(), BookmarkError> {
        self.socket.set_read_timeout(self.read_timeout()).map_err(transport)
    }

    fn timed_out(&self) -> BookmarkError {
        BookmarkError::Transport(format!(
            "no response from {} within {} ms",
            self.server,
            self.timeout.as_millis()
        ))
    }

    fn take_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    /// Sends one request and returns the success payload.
    ///
    /// Replies tagged with another request's id are late answers to calls
    /// that already timed out; they are dropped and the wait goes on until
    /// the deadline. A reply without an id is taken as the answer.
    pub fn call(&self, cmd: &str, args: Value) -> Result<Value, BookmarkError> {
        let id = self.take_id();
        let bytes = encode_request(&Request::new(cmd, args).with_id(id))?;
        self.socket.send(&bytes).map_err(transport)?;

        let deadline = self.read_timeout().map(|timeout| Instant::now() + timeout);
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let reply = loop {
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(self.timed_out());
                }
                self.socket.set_read_timeout(Some(remaining)).map_err(transport)?;
            }

            let len = self.socket.recv(&mut buf).map_err(|e| match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => self.timed_out(),
                ErrorKind::ConnectionRefused => BookmarkError::Transport(format!(
                    "nothing is listening at {}",
                    self.server
                )),
                _ => transport(e),
            })?;

            let reply = decode_response(&buf[..len])?;
            match reply.id {
                Some(got) if got != id => {
                    log::debug!("[CLIENT] Dropping stale reply {} while waiting for {}", got, id);
                }
                _ => break reply,
            }
        };

        match reply.response {
            Response::Ok(payload) => Ok(payload),
            Response::Error(message) => {
                log::debug!("[CLIENT] {} rejected by {}: {}", cmd, self.server, message);
                Err(BookmarkError::Remote(message))
            }
        }
    }

    fn call_as<T: DeserializeOwned>(&self, cmd: &str, args: Value) -> Result<T, BookmarkError> {
        let payload = self.call(cmd, args)?;
        serde_json::from_value(payload)
            .map_err(|e| BookmarkError::Protocol(format!("unexpected {} payload: {}", cmd, e)))
    }
}

fn transport(err: std::io::Error) -> BookmarkError {
    BookmarkError::Transport(err.to_string())
}

impl BookmarkProxy for RemoteProxy {
    fn list(&self, sorted_by_score: bool) -> Result<Vec<Bookmark>, BookmarkError> {
        self.call_as("list", json!({"sorted": sorted_by_score}))
    }

    fn add(&self, url: &str, description: &str, tags: &[String]) -> Result<(), BookmarkError> {
        self.call("add", json!({"url": url, "description": description, "tags": tags}))
            .map(|_| ())
    }

    fn add_tag(&self, url: &str, tag: &str) -> Result<(), BookmarkError> {
        self.call("tag", json!({"url": url, "tag": tag})).map(|_| ())
    }

    fn delete(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.call_as("delete", json!({"url": url}))
    }

    fn get(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.call_as("get", json!({"url": url}))
    }

    fn hit(&self, url: &str) -> Result<Bookmark, BookmarkError> {
        self.call_as("hit", json!({"url": url}))
    }

    fn tag_search(&self, tag: &str) -> Result<Vec<Bookmark>, BookmarkError> {
        self.call_as("search", json!({"tag": tag}))
    }

    fn tag_list(&self) -> Result<Vec<String>, BookmarkError> {
        self.call_as("tags", json!({}))
    }

    fn edit(&self, id: i64, url: &str, tags: &[String]) -> Result<Bookmark, BookmarkError> {
        self.call_as("edit", json!({"id": id, "url": url, "tags": tags}))
    }
}
