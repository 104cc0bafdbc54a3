//! Device transport — one request, one reply, over UDP.
//!
//! The transport first handshakes with the device to learn its id and
//! clock, then exchanges [`packet`](crate::packet) datagrams sealed with the
//! device token. Requests are JSON objects `{"id", "method", "params"}`; the
//! device answers with `{"id", "result"}` or `{"id", "error": {"code",
//! "message"}}`. Ids increase monotonically per connection, starting at 1.
//! Replies whose id does not match the outstanding request are stale and
//! dropped, as are datagrams that were not sealed with the token.
//!
//! A request that times out forgets the handshake, so the next request
//! handshakes again (devices reset their clock when they reboot).

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout_at};

use crate::error::MiioError;
use crate::packet::{Codec, HELLO, Handshake, Token};

const MAX_DATAGRAM: usize = 4096;

/// Request/response exchange with a single device.
pub trait MiioTransport: Send + Sync {
    /// Address of the device, for diagnostics.
    fn address(&self) -> String;

    /// Handshake with the device.
    fn discover(&self) -> impl Future<Output = Result<(), MiioError>> + Send;

    /// Send `method` with `params` and return the raw `result` value.
    fn send(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, MiioError>> + Send;
}

#[derive(Serialize)]
struct Request<'a> {
    id: u32,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response {
    id: u32,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<DeviceError>,
}

#[derive(Deserialize)]
struct DeviceError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Device identity plus the local instant its clock was read.
#[derive(Debug, Clone, Copy)]
struct DeviceClock {
    handshake: Handshake,
    at: Instant,
}

impl DeviceClock {
    fn stamp(&self) -> u32 {
        let elapsed = u32::try_from(self.at.elapsed().as_secs()).unwrap_or(u32::MAX);
        self.handshake.stamp.wrapping_add(elapsed)
    }
}

/// [`MiioTransport`] over a connected [`UdpSocket`].
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    codec: Codec,
    next_id: AtomicU32,
    timeout: Duration,
    // one exchange at a time, so replies are never read by the wrong request
    clock: Mutex<Option<DeviceClock>>,
}

impl UdpTransport {
    /// Bind an ephemeral local socket and connect it to `peer`.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::Io`] when the socket cannot be bound or connected.
    pub async fn connect(
        peer: SocketAddr,
        token: Token,
        timeout: Duration,
    ) -> Result<Self, MiioError> {
        let local: SocketAddr = if peer.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0_u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        Ok(Self {
            socket,
            peer,
            codec: Codec::new(token),
            next_id: AtomicU32::new(1),
            timeout,
            clock: Mutex::new(None),
        })
    }

    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn recv_until(&self, deadline: Instant, buf: &mut [u8]) -> Result<usize, MiioError> {
        match timeout_at(deadline, self.socket.recv(buf)).await {
            Ok(received) => Ok(received?),
            Err(_) => Err(MiioError::Timeout),
        }
    }

    async fn handshake(&self) -> Result<DeviceClock, MiioError> {
        self.socket.send(&HELLO).await?;

        let deadline = Instant::now() + self.timeout;
        let mut buf = [0_u8; MAX_DATAGRAM];
        loop {
            let len = self.recv_until(deadline, &mut buf).await?;
            match Handshake::parse(&buf[..len]) {
                Ok(handshake) => {
                    tracing::debug!(
                        peer = %self.peer,
                        device_id = handshake.device_id,
                        "device answered handshake"
                    );
                    return Ok(DeviceClock {
                        handshake,
                        at: Instant::now(),
                    });
                }
                Err(err) => tracing::debug!(len, error = %err, "ignoring non-handshake datagram"),
            }
        }
    }

    async fn request(
        &self,
        clock: DeviceClock,
        method: &'static str,
        params: Value,
    ) -> Result<Value, MiioError> {
        let id = self.next_id();
        let payload = serde_json::to_vec(&Request { id, method, params })?;
        let datagram = self
            .codec
            .seal(clock.handshake.device_id, clock.stamp(), &payload)?;
        tracing::debug!(id, method, "sending device request");
        self.socket.send(&datagram).await?;

        let deadline = Instant::now() + self.timeout;
        let mut buf = vec![0_u8; MAX_DATAGRAM];
        loop {
            let len = self.recv_until(deadline, &mut buf).await?;
            let payload = match self.codec.open(&buf[..len]) {
                Ok(payload) => payload,
                Err(err) => {
                    tracing::debug!(error = %err, "dropping unreadable datagram");
                    continue;
                }
            };
            let response: Response = match serde_json::from_slice(&payload) {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!(error = %err, "dropping undecodable reply");
                    continue;
                }
            };
            if response.id != id {
                tracing::debug!(expected = id, actual = response.id, "dropping stale reply");
                continue;
            }
            if let Some(err) = response.error {
                return Err(MiioError::Device {
                    code: err.code,
                    message: err.message,
                });
            }
            return response
                .result
                .ok_or_else(|| MiioError::UnexpectedResponse(format!("reply {id} has no result")));
        }
    }
}

impl MiioTransport for UdpTransport {
    fn address(&self) -> String {
        self.peer.to_string()
    }

    async fn discover(&self) -> Result<(), MiioError> {
        let mut clock = self.clock.lock().await;
        *clock = Some(self.handshake().await?);
        Ok(())
    }

    async fn send(&self, method: &'static str, params: Value) -> Result<Value, MiioError> {
        let mut clock = self.clock.lock().await;
        let known = *clock;
        let current = match known {
            Some(current) => current,
            None => {
                let fresh = self.handshake().await?;
                *clock = Some(fresh);
                fresh
            }
        };
        let result = self.request(current, method, params).await;
        if matches!(result, Err(MiioError::Timeout)) {
            *clock = None;
        }
        result
    }
}
