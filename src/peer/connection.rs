use super::codec::{self, DEFAULT_MAX_FRAME_LEN};
use super::error::PeerError;
use super::handshake::{Handshake, DEFAULT_PROTOCOL};
use super::message::PeerMessage;
use super::observer::{TracingObserver, WireObserver};
use super::peer_id::PeerId;
use super::wire;
use crate::tracker::PeerAddress;
use std::io::{self, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Stream-level settings for a [`PeerConnection`].
///
/// Deadlines are set on the socket; nothing here retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub connect_timeout: Duration,
    /// `None` blocks until data arrives or the connection is closed.
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub max_frame_len: u32,
    pub protocol_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: None,
            write_timeout: None,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            protocol_name: DEFAULT_PROTOCOL.to_string(),
        }
    }
}

#[derive(Debug)]
struct Shared {
    stream: TcpStream,
    closed: AtomicBool,
}

impl Shared {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Errors raised after a local close are reported as a close.
    fn map_err(&self, err: PeerError) -> PeerError {
        if self.is_closed() {
            PeerError::ConnectionClosed
        } else {
            err
        }
    }
}

/// A blocking connection to one peer.
///
/// The stream is owned exclusively: the handshake and then the message loop
/// run on it in order. For a dedicated reader thread and a dedicated writer
/// thread, use [`into_split`](Self::into_split); each half still serves one
/// caller at a time.
///
/// # Examples
///
/// ```no_run
/// use torrent_wire::peer::{ConnectionConfig, PeerConnection, PeerId, PeerMessage};
/// use torrent_wire::tracker::PeerAddress;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let addr = PeerAddress::new("192.168.1.100", 6881);
/// let mut conn = PeerConnection::connect(&addr, ConnectionConfig::default())?;
///
/// let remote = conn.handshake(PeerId::generate(), [0u8; 20])?;
/// println!("connected to {}", remote.peer_id());
///
/// conn.send_messages(&[PeerMessage::interested()])?;
/// let reply = conn.read_message()?;
/// println!("got {}", reply.kind());
/// # Ok(())
/// # }
/// ```
pub struct PeerConnection {
    reader: MessageReader,
    writer: MessageWriter,
    handle: CloseHandle,
    protocol_name: String,
    remote: Option<Handshake>,
}

impl PeerConnection {
    /// Connects to `addr`, trying each resolved address in turn.
    pub fn connect(addr: &PeerAddress, config: ConnectionConfig) -> Result<Self, PeerError> {
        let mut last_err = None;
        for socket_addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&socket_addr, config.connect_timeout) {
                Ok(stream) => return Self::from_stream(stream, config),
                Err(e) => {
                    debug!(peer = %socket_addr, error = %e, "connect failed");
                    last_err = Some(e);
                }
            }
        }

        Err(PeerError::Io(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses resolved for {}", addr),
            )
        })))
    }

    /// Wraps an already connected stream, e.g. one from a listener.
    pub fn from_stream(stream: TcpStream, config: ConnectionConfig) -> Result<Self, PeerError> {
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        stream.set_nodelay(true)?;

        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let observer: Arc<dyn WireObserver> = Arc::new(TracingObserver::new(peer));

        let shared = Arc::new(Shared {
            stream: stream.try_clone()?,
            closed: AtomicBool::new(false),
        });

        Ok(Self {
            reader: MessageReader {
                inner: BufReader::new(stream.try_clone()?),
                shared: shared.clone(),
                observer: observer.clone(),
                max_frame_len: config.max_frame_len,
            },
            writer: MessageWriter {
                stream,
                shared: shared.clone(),
                observer: observer.clone(),
            },
            handle: CloseHandle { shared, observer },
            protocol_name: config.protocol_name,
            remote: None,
        })
    }

    /// Replaces the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn WireObserver>) -> Self {
        self.reader.observer = observer.clone();
        self.writer.observer = observer.clone();
        self.handle.observer = observer;
        self
    }

    /// Sends our handshake, then reads and checks the peer's.
    ///
    /// The peer id in the returned handshake is not validated.
    pub fn handshake(
        &mut self,
        peer_id: PeerId,
        info_hash: [u8; 20],
    ) -> Result<Handshake, PeerError> {
        let local =
            Handshake::with_protocol(self.protocol_name.as_bytes(), info_hash, peer_id.0)?;
        self.writer.send_handshake(&local)?;

        let remote = self.reader.read_handshake()?;
        local.verify(&remote)?;

        self.remote = Some(remote.clone());
        Ok(remote)
    }

    pub fn send_messages(&mut self, messages: &[PeerMessage]) -> Result<(), PeerError> {
        self.writer.send_messages(messages)
    }

    pub fn read_message(&mut self) -> Result<PeerMessage, PeerError> {
        self.reader.read_message()
    }

    /// The handshake received from the peer, once exchanged.
    pub fn remote_handshake(&self) -> Option<&Handshake> {
        self.remote.as_ref()
    }

    pub fn remote_peer_id(&self) -> Option<PeerId> {
        self.remote.as_ref().map(Handshake::peer_id)
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.handle.shared.stream.peer_addr()
    }

    /// Shuts the socket down; pending and later reads and writes fail with
    /// [`PeerError::ConnectionClosed`].
    pub fn close(&self) {
        self.handle.close();
    }

    /// A handle that can close this connection from another thread.
    pub fn close_handle(&self) -> CloseHandle {
        self.handle.clone()
    }

    /// Splits into independently owned read and write halves.
    pub fn into_split(self) -> (MessageReader, MessageWriter) {
        (self.reader, self.writer)
    }
}

/// Read half of a [`PeerConnection`].
pub struct MessageReader {
    inner: BufReader<TcpStream>,
    shared: Arc<Shared>,
    observer: Arc<dyn WireObserver>,
    max_frame_len: u32,
}

impl MessageReader {
    pub fn read_message(&mut self) -> Result<PeerMessage, PeerError> {
        if self.shared.is_closed() {
            return Err(PeerError::ConnectionClosed);
        }

        match wire::read_message_with_limit(&mut self.inner, self.max_frame_len) {
            Ok(message) => {
                self.observer.message_received(&message);
                Ok(message)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn read_handshake(&mut self) -> Result<Handshake, PeerError> {
        if self.shared.is_closed() {
            return Err(PeerError::ConnectionClosed);
        }

        match wire::read_handshake(&mut self.inner) {
            Ok(handshake) => {
                self.observer.handshake_received(&handshake);
                Ok(handshake)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&self, err: PeerError) -> PeerError {
        if self.shared.is_closed() {
            return PeerError::ConnectionClosed;
        }
        self.observer.closed(Some(&err));
        err
    }

    /// A handle that can close the whole connection from another thread.
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            shared: self.shared.clone(),
            observer: self.observer.clone(),
        }
    }
}

/// Write half of a [`PeerConnection`].
pub struct MessageWriter {
    stream: TcpStream,
    shared: Arc<Shared>,
    observer: Arc<dyn WireObserver>,
}

impl MessageWriter {
    /// Writes every frame in one buffer and flushes once.
    pub fn send_messages(&mut self, messages: &[PeerMessage]) -> Result<(), PeerError> {
        if self.shared.is_closed() {
            return Err(PeerError::ConnectionClosed);
        }

        let buf = codec::encode_frames(messages);
        self.write(&buf)?;
        self.observer.messages_sent(messages.len(), buf.len());
        Ok(())
    }

    fn send_handshake(&mut self, handshake: &Handshake) -> Result<(), PeerError> {
        if self.shared.is_closed() {
            return Err(PeerError::ConnectionClosed);
        }

        self.write(handshake.as_bytes())?;
        self.observer.handshake_sent(handshake);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), PeerError> {
        self.stream
            .write_all(buf)
            .and_then(|()| self.stream.flush())
            .map_err(|e| self.shared.map_err(e.into()))
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            shared: self.shared.clone(),
            observer: self.observer.clone(),
        }
    }
}

/// Closes a connection from any thread.
///
/// Closing is idempotent. A reader blocked in `read_message` wakes up with
/// [`PeerError::ConnectionClosed`].
#[derive(Clone)]
pub struct CloseHandle {
    shared: Arc<Shared>,
    observer: Arc<dyn WireObserver>,
}

impl CloseHandle {
    pub fn close(&self) {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // The peer may already have gone away; the socket is closed either way.
        if let Err(e) = self.shared.stream.shutdown(Shutdown::Both) {
            debug!(error = %e, "shutdown after close");
        }
        self.observer.closed(None);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}
