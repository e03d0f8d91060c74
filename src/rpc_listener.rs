//! Single-threaded UDP serve loop for the bookmark server.
//!
//! Each datagram is decoded, applied to the store and answered before the
//! next one is read, so store mutations never interleave.

use std::io::{self, ErrorKind};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::proxy::BookmarkProxy;
use crate::rpc_handler::respond;
use crate::rpc_protocol::MAX_DATAGRAM_SIZE;

pub struct RpcListener<P: BookmarkProxy> {
    socket: UdpSocket,
    proxy: P,
}

impl<P: BookmarkProxy> RpcListener<P> {
    /// Binds the server socket. Use port 0 to let the OS pick one.
    pub fn bind<A: ToSocketAddrs>(addr: A, proxy: P) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self { socket, proxy })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receives one datagram and sends its response.
    ///
    /// Failing to reach the client is logged and not returned, the request
    /// has already been applied.
    pub fn serve_one(&self, buf: &mut [u8]) -> io::Result<()> {
        let (len, peer) = self.socket.recv_from(buf)?;
        log::debug!("[SERVER] {} bytes from {}", len, peer);

        let reply = respond(&self.proxy, &buf[..len]);
        if let Err(e) = self.socket.send_to(&reply, peer) {
            log::warn!("[SERVER] Failed to answer {}: {}", peer, e);
        }
        Ok(())
    }

    /// Serves requests until the socket fails.
    ///
    /// Transient receive errors (an ICMP port-unreachable surfacing as a
    /// reset, an interrupted call) are skipped.
    pub fn serve(&self) -> io::Result<()> {
        log::info!("[SERVER] Listening on {}", self.local_addr()?);
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        loop {
            match self.serve_one(&mut buf) {
                Ok(()) => {}
                Err(e) if matches!(e.kind(), ErrorKind::ConnectionReset | ErrorKind::Interrupted) => {
                    log::debug!("[SERVER] Ignoring receive error: {}", e);
                }
                Err(e) => {
                    log::error!("[SERVER] Socket failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
