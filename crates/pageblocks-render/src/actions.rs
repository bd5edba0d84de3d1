//! Edit callbacks bound to a specific block.
//!
//! The renderer hands every presented block a handle that already knows the
//! block's id, so a presenter never has to thread ids through by hand. Leaves
//! get [`LeafActions`] (update, delete); containers get [`ContainerActions`],
//! which adds add-child. A leaf cannot be handed an add-child callback; the
//! type doesn't have one.

use std::sync::Arc;

use pageblocks_types::{BlockId, BlockType, UpdateBlockInput};

/// Receiver of edit intents raised from rendered blocks.
///
/// Implementations should be cheap and non-blocking: they are called from
/// presentation code. Queue the intent and apply it elsewhere.
pub trait EditSink: Send + Sync {
    fn update(&self, id: BlockId, patch: UpdateBlockInput);
    fn delete(&self, id: BlockId);
    fn add_child(&self, parent: BlockId, block_type: BlockType);
}

/// Update/delete callbacks bound to one block.
#[derive(Clone)]
pub struct LeafActions {
    id: BlockId,
    sink: Arc<dyn EditSink>,
}

impl LeafActions {
    pub(crate) fn new(id: BlockId, sink: Arc<dyn EditSink>) -> Self {
        Self { id, sink }
    }

    /// The block these callbacks are bound to.
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn update(&self, patch: UpdateBlockInput) {
        self.sink.update(self.id, patch);
    }

    pub fn delete(&self) {
        self.sink.delete(self.id);
    }
}

impl std::fmt::Debug for LeafActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafActions").field("id", &self.id).finish()
    }
}

/// Update/delete/add-child callbacks bound to one container.
#[derive(Clone, Debug)]
pub struct ContainerActions {
    inner: LeafActions,
}

impl ContainerActions {
    pub(crate) fn new(id: BlockId, sink: Arc<dyn EditSink>) -> Self {
        Self {
            inner: LeafActions::new(id, sink),
        }
    }

    pub fn id(&self) -> BlockId {
        self.inner.id
    }

    pub fn update(&self, patch: UpdateBlockInput) {
        self.inner.update(patch);
    }

    pub fn delete(&self) {
        self.inner.delete();
    }

    /// Request a new child of `block_type`, appended after the last child.
    pub fn add_child(&self, block_type: BlockType) {
        self.inner.sink.add_child(self.inner.id, block_type);
    }
}

/// Sink that drops every intent. For read-only rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EditSink for NullSink {
    fn update(&self, _id: BlockId, _patch: UpdateBlockInput) {}
    fn delete(&self, _id: BlockId) {}
    fn add_child(&self, _parent: BlockId, _block_type: BlockType) {}
}
