//! Frame transports
//!
//! A [`Transport`] is one open, exclusively owned, message-framed connection
//! to a batcher. A [`Connector`] opens transports. The WebSocket
//! implementation is what the client uses by default; tests plug in
//! in-memory transports through the same traits.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::{ClientError, Result};

/// A data frame on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Frame::Text(text) => text.as_bytes(),
            Frame::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// An open connection carrying whole frames
#[async_trait]
pub trait Transport: Send {
    /// Queue one frame for sending
    async fn send(&mut self, frame: Frame) -> Result<()>;

    /// Next inbound data frame; `None` once the peer has closed
    async fn recv(&mut self) -> Option<Result<Frame>>;

    /// Close the connection. Closing an already closed transport is not an
    /// error.
    async fn close(&mut self) -> Result<()>;
}

/// Opens transports to a batcher address
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    async fn connect(&self, address: &str) -> Result<Self::Transport>;
}

/// Connector for `ws://` and `wss://` batchers
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    type Transport = WebSocketTransport;

    async fn connect(&self, address: &str) -> Result<Self::Transport> {
        let (stream, response) = connect_async(address)
            .await
            .map_err(|e| ClientError::connect_failed(address, e))?;
        debug!(address, status = %response.status(), "websocket connected");
        Ok(WebSocketTransport { stream })
    }
}

/// WebSocket connection to a batcher
pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        let message = match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(bytes) => Message::Binary(bytes.into()),
        };
        self.stream
            .send(message)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<Frame>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(Frame::Text(text.to_string()))),
                Ok(Message::Binary(bytes)) => return Some(Ok(Frame::Binary(bytes.to_vec()))),
                Ok(Message::Close(reason)) => {
                    debug!(?reason, "batcher closed the connection");
                    return None;
                }
                // ping/pong are answered by tungstenite itself
                Ok(_) => continue,
                Err(e) => return Some(Err(ClientError::Transport(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        use tokio_tungstenite::tungstenite::Error as WsError;

        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(ClientError::Transport(e.to_string())),
        }
    }
}
