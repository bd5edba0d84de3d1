//! Edit intents collected from rendered blocks.
//!
//! The renderer's callbacks are synchronous and fire from presentation code,
//! while store mutations are async. [`EditQueue`] sits between the two: it
//! implements [`EditSink`] by recording an [`EditAction`], and the editor
//! drains it later with [`Editor::apply_queued`](crate::Editor::apply_queued).

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use pageblocks_render::EditSink;
use pageblocks_types::{BlockId, BlockType, UpdateBlockInput};

/// One requested edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    /// New block of `block_type` appended under `parent` (`None` = root).
    Add {
        parent: Option<BlockId>,
        block_type: BlockType,
    },
    Update {
        id: BlockId,
        patch: UpdateBlockInput,
    },
    Delete {
        id: BlockId,
    },
    /// Move `id` under `parent`, appended at the end.
    Reparent {
        id: BlockId,
        parent: Option<BlockId>,
    },
    /// Move `id` to position `index` among its current siblings.
    Move {
        id: BlockId,
        index: usize,
    },
}

impl EditAction {
    /// The block the action is about (the parent, for `Add`).
    pub fn target(&self) -> Option<BlockId> {
        match self {
            EditAction::Add { parent, .. } => *parent,
            EditAction::Update { id, .. }
            | EditAction::Delete { id }
            | EditAction::Reparent { id, .. }
            | EditAction::Move { id, .. } => Some(*id),
        }
    }
}

/// FIFO of pending edits. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct EditQueue {
    pending: Mutex<VecDeque<EditAction>>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: EditAction) {
        tracing::trace!(?action, "queued edit");
        self.pending.lock().push_back(action);
    }

    /// Take the oldest pending action.
    pub fn pop(&self) -> Option<EditAction> {
        self.pending.lock().pop_front()
    }

    /// Put an action back at the head of the queue.
    pub fn requeue(&self, action: EditAction) {
        self.pending.lock().push_front(action);
    }

    /// Take everything pending, oldest first.
    pub fn drain(&self) -> Vec<EditAction> {
        self.pending.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl EditSink for EditQueue {
    fn update(&self, id: BlockId, patch: UpdateBlockInput) {
        self.push(EditAction::Update { id, patch });
    }

    fn delete(&self, id: BlockId) {
        self.push(EditAction::Delete { id });
    }

    fn add_child(&self, parent: BlockId, block_type: BlockType) {
        self.push(EditAction::Add {
            parent: Some(parent),
            block_type,
        });
    }
}
