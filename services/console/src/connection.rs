//! The WebSocket channel to the analysis pipeline.
//!
//! One connection per process, keyed by the session identity embedded in
//! the endpoint path. There is no automatic reconnection: once the channel
//! closes, the connection stays closed and the caller decides what to do.

use claimlens_core::protocol::OutboundMessage;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tracing::{error, info};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Observable channel states. The connecting phase exists only inside
/// [`Connection::open`]; a constructed `Connection` is always `Open` until
/// the channel goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    /// `send` was called on a channel that is not open. This is a caller
    /// error; outbound messages are never queued or silently dropped.
    #[error("the channel is not open")]
    NotOpen,
    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("channel transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Builds the channel endpoint for a session: path-embedded identity, no
/// query parameters.
pub fn endpoint_url(host: &str, port: u16, identity: &str) -> String {
    format!("ws://{host}:{port}/ws/{identity}")
}

/// The single bidirectional channel to the pipeline.
pub struct Connection {
    tx: SplitSink<WsStream, Message>,
    rx: SplitStream<WsStream>,
    state: ConnectionState,
}

impl Connection {
    /// Performs the WebSocket handshake and returns an open connection.
    pub async fn open(host: &str, port: u16, identity: &str) -> Result<Self, ConnectionError> {
        let url = endpoint_url(host, port, identity);
        let (stream, _) = connect_async(url.as_str()).await?;
        info!(%url, "channel open");
        let (tx, rx) = stream.split();
        Ok(Self {
            tx,
            rx,
            state: ConnectionState::Open,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Serializes and transmits one outbound message.
    pub async fn send(&mut self, msg: &OutboundMessage) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::Open {
            return Err(ConnectionError::NotOpen);
        }
        let serialized = serde_json::to_string(msg)?;
        if let Err(err) = self.tx.send(Message::Text(serialized)).await {
            self.state = ConnectionState::Closed;
            return Err(err.into());
        }
        Ok(())
    }

    /// Yields the next inbound text frame, skipping control and binary
    /// frames. Returns `None` once the peer closes or the transport fails;
    /// the connection is `Closed` afterwards and stays that way.
    pub async fn next_text(&mut self) -> Option<String> {
        if self.state == ConnectionState::Closed {
            return None;
        }
        while let Some(frame) = self.rx.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(err) => {
                    error!(%err, "error receiving from channel");
                    break;
                }
            }
        }
        self.state = ConnectionState::Closed;
        None
    }
}
