use std::collections::VecDeque;

use crate::foundation::core::ClipId;
use crate::graph::instance::TransitionRequest;

/// A request made while the store was unavailable, replayed once it appears.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PendingOperation {
    /// Attach a transition.
    Add(TransitionRequest),
    /// Remove whatever transition touches `clip_id`.
    #[serde(rename_all = "camelCase")]
    Remove {
        /// Clip whose transition should go.
        clip_id: ClipId,
    },
}

impl PendingOperation {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove { .. } => "remove",
        }
    }
}

/// FIFO of pending operations.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    ops: VecDeque<PendingOperation>,
}

impl PendingQueue {
    /// Append to the back.
    pub fn push(&mut self, op: PendingOperation) {
        self.ops.push_back(op);
    }

    /// Take the oldest operation.
    pub fn pop(&mut self) -> Option<PendingOperation> {
        self.ops.pop_front()
    }

    /// Put an operation back at the front (it will be retried first).
    pub fn push_front(&mut self, op: PendingOperation) {
        self.ops.push_front(op);
    }

    /// Queued operations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingOperation> {
        self.ops.iter()
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
