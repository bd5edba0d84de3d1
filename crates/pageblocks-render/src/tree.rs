//! Structural render tree: what was presented, where, and with which callbacks.
//!
//! Useful for hosting code that builds its own widgets from the result, and
//! for tests that want to "click" a rendered block.

use pageblocks_types::{Block, BlockId, ContainerKind, LeafKind};

use crate::actions::{ContainerActions, LeafActions};
use crate::renderer::{Presenter, RenderContext};

/// What a render node presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Leaf(LeafKind),
    Container(ContainerKind),
    /// Empty-container affordance.
    DropTarget(ContainerKind),
}

/// Callbacks attached to a render node.
#[derive(Debug, Clone)]
pub enum NodeActions {
    Leaf(LeafActions),
    Container(ContainerActions),
}

impl NodeActions {
    /// The block the callbacks act on. For a drop target, its container.
    pub fn id(&self) -> BlockId {
        match self {
            NodeActions::Leaf(a) => a.id(),
            NodeActions::Container(a) => a.id(),
        }
    }

    /// Container callbacks, if this node has them.
    pub fn as_container(&self) -> Option<&ContainerActions> {
        match self {
            NodeActions::Container(a) => Some(a),
            NodeActions::Leaf(_) => None,
        }
    }
}

/// One presented element.
#[derive(Debug, Clone)]
pub struct RenderNode {
    /// Presented block; `None` for drop targets.
    pub block_id: Option<BlockId>,
    pub kind: RenderKind,
    pub depth: u32,
    pub parent_id: Option<BlockId>,
    pub actions: NodeActions,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn is_drop_target(&self) -> bool {
        matches!(self.kind, RenderKind::DropTarget(_))
    }

    /// Find the node presenting `id` in this subtree.
    pub fn find(&self, id: &BlockId) -> Option<&RenderNode> {
        if self.block_id.as_ref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Presented block ids in pre-order (drop targets skipped).
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<BlockId>) {
        out.extend(self.block_id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// Presenter building [`RenderNode`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreePresenter;

impl Presenter for TreePresenter {
    type Node = RenderNode;

    fn leaf(
        &mut self,
        kind: LeafKind,
        block: &Block,
        cx: &RenderContext,
        actions: LeafActions,
    ) -> RenderNode {
        RenderNode {
            block_id: Some(block.id),
            kind: RenderKind::Leaf(kind),
            depth: cx.depth,
            parent_id: cx.parent_id,
            actions: NodeActions::Leaf(actions),
            children: Vec::new(),
        }
    }

    fn container(
        &mut self,
        kind: ContainerKind,
        block: &Block,
        cx: &RenderContext,
        actions: ContainerActions,
        children: Vec<RenderNode>,
    ) -> RenderNode {
        RenderNode {
            block_id: Some(block.id),
            kind: RenderKind::Container(kind),
            depth: cx.depth,
            parent_id: cx.parent_id,
            actions: NodeActions::Container(actions),
            children,
        }
    }

    fn drop_target(
        &mut self,
        kind: ContainerKind,
        _container: &Block,
        cx: &RenderContext,
        actions: ContainerActions,
    ) -> RenderNode {
        RenderNode {
            block_id: None,
            kind: RenderKind::DropTarget(kind),
            depth: cx.depth,
            parent_id: cx.parent_id,
            actions: NodeActions::Container(actions),
            children: Vec::new(),
        }
    }
}
