//! In-memory transport with a fixed inbound script

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use aligned_primitives::{Hash256, InclusionProof};
use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::transport::{Connector, Frame, Transport};
use crate::types::BatchInclusionData;

#[derive(Default)]
struct ScriptState {
    inbound: VecDeque<Result<Frame>>,
    sent: Vec<Frame>,
    connects: usize,
    close_calls: usize,
    closed: bool,
    hang_when_drained: bool,
}

/// Shared view of what a scripted batcher received and how it was used
#[derive(Clone, Default)]
pub(crate) struct Script {
    state: Arc<Mutex<ScriptState>>,
}

impl Script {
    pub(crate) fn new(inbound: Vec<Frame>) -> Self {
        let state = ScriptState {
            inbound: inbound.into_iter().map(Ok).collect(),
            ..ScriptState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Block forever instead of reporting a close once the script runs out
    pub(crate) fn hang_when_drained(self) -> Self {
        self.state.lock().unwrap().hang_when_drained = true;
        self
    }

    /// Fail the next read after the queued frames with a transport error
    pub(crate) fn then_error(self, reason: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .inbound
            .push_back(Err(ClientError::Transport(reason.to_string())));
        self
    }

    pub(crate) fn sent(&self) -> Vec<Frame> {
        self.state.lock().unwrap().sent.clone()
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub(crate) fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }
}

pub(crate) struct ScriptedConnector {
    script: Script,
}

impl ScriptedConnector {
    pub(crate) fn new(script: Script) -> Self {
        Self { script }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    async fn connect(&self, _address: &str) -> Result<Self::Transport> {
        self.script.state.lock().unwrap().connects += 1;
        Ok(ScriptedTransport {
            script: self.script.clone(),
        })
    }
}

pub(crate) struct ScriptedTransport {
    script: Script,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        self.script.state.lock().unwrap().sent.push(frame);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<Frame>> {
        let (next, hang) = {
            let mut state = self.script.state.lock().unwrap();
            if state.closed {
                return None;
            }
            (state.inbound.pop_front(), state.hang_when_drained)
        };
        match next {
            Some(item) => Some(item),
            None if hang => std::future::pending().await,
            None => None,
        }
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.script.state.lock().unwrap();
        state.close_calls += 1;
        state.closed = true;
        Ok(())
    }
}

/// Encode a batcher response frame
pub(crate) fn response_frame(root: Hash256, merkle_path: Vec<Hash256>, index: usize) -> Frame {
    let response = BatchInclusionData {
        batch_merkle_root: root,
        batch_inclusion_proof: InclusionProof::new(merkle_path),
        index_in_batch: index,
    };
    Frame::Binary(serde_json::to_vec(&response).unwrap())
}

/// Encode a response proving `index` of `tree`
pub(crate) fn tree_response(tree: &aligned_primitives::MerkleTree, index: usize) -> Frame {
    let proof = tree.proof(index).unwrap();
    response_frame(tree.root(), proof.merkle_path, index)
}
