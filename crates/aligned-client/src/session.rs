//! One batcher session: handshake, ordered send, counted receive
//!
//! ```text
//! Connecting -> AwaitingHandshake -> Ready -> Sending -> AwaitingResponses -> Closed
//!      \_______________\_______________\________\______________\______-> Failed
//! ```
//!
//! The session owns its transport for its whole life. Every failure closes
//! the transport before the error is returned, and a successful receive
//! closes it as soon as the last expected response arrives, so a session
//! never outlives the call that drives it with an open connection.
//!
//! Responses carry no request identifier. The i-th response belongs to the
//! i-th frame sent, which only holds as long as the batcher answers in
//! submission order.

use std::time::Duration;

use tracing::{debug, warn};

use crate::codec::{decode_protocol_version, decode_response};
use crate::error::{ClientError, Result};
use crate::transport::{Connector, Frame, Transport};
use crate::types::BatchInclusionData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    AwaitingHandshake,
    Ready,
    Sending,
    AwaitingResponses,
    Closed,
    Failed,
}

pub struct BatcherSession<T: Transport> {
    transport: T,
    state: SessionState,
    address: String,
    protocol_version: u16,
    sent: usize,
}

impl<T: Transport> BatcherSession<T> {
    /// Connect to `address` and complete the version handshake
    ///
    /// The first frame from the batcher must be exactly two bytes holding
    /// `expected_version` in big-endian order.
    pub async fn open<C>(connector: &C, address: &str, expected_version: u16) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        debug!(address, state = ?SessionState::Connecting, "opening batcher session");
        let transport = connector.connect(address).await?;

        let mut session = Self {
            transport,
            state: SessionState::Connecting,
            address: address.to_string(),
            protocol_version: expected_version,
            sent: 0,
        };
        session.transition(SessionState::AwaitingHandshake);

        match session.await_handshake().await {
            Ok(()) => {
                session.transition(SessionState::Ready);
                Ok(session)
            }
            Err(e) => Err(session.fail(e).await),
        }
    }

    async fn await_handshake(&mut self) -> Result<()> {
        let frame = match self.transport.recv().await {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => return Err(ClientError::connect_failed(&self.address, e)),
            None => {
                return Err(ClientError::connect_failed(
                    &self.address,
                    "connection closed before handshake",
                ))
            }
        };

        let got = decode_protocol_version(frame.as_bytes())?;
        if got != self.protocol_version {
            return Err(ClientError::ProtocolVersionMismatch {
                expected: self.protocol_version,
                got,
            });
        }
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Negotiated protocol version
    pub fn protocol_version(&self) -> u16 {
        self.protocol_version
    }

    /// Number of frames sent in this session
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Send every frame in order without waiting for replies
    pub async fn send_batch(&mut self, frames: Vec<Frame>) -> Result<()> {
        self.expect_state(SessionState::Ready)?;
        self.transition(SessionState::Sending);

        for frame in frames {
            if let Err(e) = self.transport.send(frame).await {
                return Err(self.fail(e).await);
            }
            self.sent += 1;
        }

        debug!(frames = self.sent, "batch sent");
        self.transition(SessionState::AwaitingResponses);
        Ok(())
    }

    /// Wait for one response per sent frame, then close the connection
    ///
    /// With a `deadline`, the whole receive phase must finish within it.
    pub async fn receive_responses(
        &mut self,
        deadline: Option<Duration>,
    ) -> Result<Vec<BatchInclusionData>> {
        self.expect_state(SessionState::AwaitingResponses)?;

        let expected = self.sent;
        let mut responses = Vec::with_capacity(expected);

        let outcome = match deadline {
            Some(limit) => {
                let timed = tokio::time::timeout(
                    limit,
                    collect_responses(&mut self.transport, expected, &mut responses),
                )
                .await;
                match timed {
                    Ok(result) => result,
                    Err(_) => Err(ClientError::ResponseTimeout {
                        expected,
                        received: responses.len(),
                    }),
                }
            }
            None => collect_responses(&mut self.transport, expected, &mut responses).await,
        };

        if let Err(e) = outcome {
            return Err(self.fail(e).await);
        }

        self.close().await;
        Ok(responses)
    }

    /// Close the transport. Safe to call in any state.
    pub async fn close(&mut self) {
        if matches!(self.state, SessionState::Closed | SessionState::Failed) {
            return;
        }
        if let Err(e) = self.transport.close().await {
            warn!(error = %e, "error closing batcher connection");
        }
        self.transition(SessionState::Closed);
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ClientError::InvalidSessionState {
                actual: self.state,
                expected,
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    /// Close the transport, mark the session failed and hand back `err`
    async fn fail(&mut self, err: ClientError) -> ClientError {
        if let Err(close_err) = self.transport.close().await {
            debug!(error = %close_err, "close after failure");
        }
        warn!(error = %err, from = ?self.state, "batcher session failed");
        self.state = SessionState::Failed;
        err
    }
}

async fn collect_responses<T: Transport>(
    transport: &mut T,
    expected: usize,
    responses: &mut Vec<BatchInclusionData>,
) -> Result<()> {
    while responses.len() < expected {
        match transport.recv().await {
            Some(Ok(frame)) => {
                let response = decode_response(frame.as_bytes())?;
                debug!(
                    position = responses.len(),
                    index_in_batch = response.index_in_batch,
                    "response received"
                );
                responses.push(response);
            }
            Some(Err(e)) => return Err(e),
            None => {
                return Err(ClientError::ConnectionClosedEarly {
                    expected,
                    received: responses.len(),
                })
            }
        }
    }
    Ok(())
}
