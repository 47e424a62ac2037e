use super::codec::{self, DEFAULT_MAX_FRAME_LEN};
use super::error::PeerError;
use super::handshake::Handshake;
use super::message::PeerMessage;
use super::observer::{TracingObserver, WireObserver};
use super::peer_id::PeerId;
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Async peer-wire transport over any tokio byte stream.
///
/// Uses the same framing as the blocking functions. Timeouts are left to the
/// caller (`tokio::time::timeout` around each call).
pub struct PeerTransport<S> {
    stream: S,
    read_buf: BytesMut,
    max_frame_len: u32,
    observer: Arc<dyn WireObserver>,
}

impl<S> PeerTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(32 * 1024),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            observer: Arc::new(TracingObserver::default()),
        }
    }

    pub fn with_max_frame_len(mut self, max_frame_len: u32) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn WireObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub async fn send_handshake(&mut self, handshake: &Handshake) -> Result<(), PeerError> {
        self.stream.write_all(handshake.as_bytes()).await?;
        self.stream.flush().await?;
        self.observer.handshake_sent(handshake);
        Ok(())
    }

    pub async fn receive_handshake(&mut self) -> Result<Handshake, PeerError> {
        loop {
            if let Some(handshake) = codec::decode_handshake(&mut self.read_buf)? {
                self.observer.handshake_received(&handshake);
                return Ok(handshake);
            }

            if !self.fill().await? {
                return Err(self.eof(PeerError::TruncatedHandshake {
                    expected: codec::pending_handshake_len(&self.read_buf),
                    received: self.read_buf.len(),
                }));
            }
        }
    }

    /// Sends ours, reads theirs, checks protocol name and info hash.
    pub async fn handshake(
        &mut self,
        peer_id: PeerId,
        protocol_name: &[u8],
        info_hash: [u8; 20],
    ) -> Result<Handshake, PeerError> {
        let local = Handshake::with_protocol(protocol_name, info_hash, peer_id.0)?;
        self.send_handshake(&local).await?;

        let remote = self.receive_handshake().await?;
        local.verify(&remote)?;
        Ok(remote)
    }

    pub async fn send_messages(&mut self, messages: &[PeerMessage]) -> Result<(), PeerError> {
        let buf = codec::encode_frames(messages);
        self.stream.write_all(&buf).await?;
        self.stream.flush().await?;
        self.observer.messages_sent(messages.len(), buf.len());
        Ok(())
    }

    pub async fn receive_message(&mut self) -> Result<PeerMessage, PeerError> {
        loop {
            if let Some(message) = codec::decode_frame(&mut self.read_buf, self.max_frame_len)? {
                self.observer.message_received(&message);
                return Ok(message);
            }

            if !self.fill().await? {
                return Err(self.eof(PeerError::TruncatedFrame {
                    expected: codec::pending_frame_len(&self.read_buf),
                    received: self.read_buf.len(),
                }));
            }
        }
    }

    /// Reads more bytes into the buffer; `false` at end of stream.
    async fn fill(&mut self) -> Result<bool, PeerError> {
        let n = self.stream.read_buf(&mut self.read_buf).await?;
        Ok(n > 0)
    }

    /// End of stream is a clean close only between messages.
    fn eof(&self, truncated: PeerError) -> PeerError {
        let err = if self.read_buf.is_empty() {
            PeerError::ConnectionClosed
        } else {
            truncated
        };
        self.observer.closed(Some(&err));
        err
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}
