//! Recursive walk from a nested block forest to presenter nodes.
//!
//! ```text
//! Renderer::render_forest(roots)
//! └── render_block(block, cx)
//!     ├── hidden        → nothing (subtree not visited)
//!     ├── Leaf(kind)    → Presenter::leaf(.., LeafActions)
//!     └── Container(kind)
//!         ├── render_block(child, cx.child(i)) for each child, as given
//!         ├── no rendered children → Presenter::drop_target(..)
//!         └── Presenter::container(.., ContainerActions, children)
//! ```
//!
//! The renderer never sorts or mutates its input. Sibling order is whatever
//! the data says; `unflatten_blocks` is responsible for it.

use std::sync::Arc;

use pageblocks_types::{Block, BlockId, BlockShape, ContainerKind, LeafKind, MAX_TREE_DEPTH};

use crate::actions::{ContainerActions, EditSink, LeafActions};

/// Where a block sits in the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderContext {
    /// 0 for page roots, +1 per container level.
    pub depth: u32,
    /// Enclosing container (`None` for roots).
    pub parent_id: Option<BlockId>,
    /// Position in the parent's `children` array.
    pub index: usize,
}

impl RenderContext {
    /// Context of the `index`-th root.
    pub fn root(index: usize) -> Self {
        Self {
            depth: 0,
            parent_id: None,
            index,
        }
    }

    /// Context for the `index`-th child of `parent`.
    pub fn child(&self, parent: BlockId, index: usize) -> Self {
        Self {
            depth: self.depth + 1,
            parent_id: Some(parent),
            index,
        }
    }
}

/// A rendering target.
///
/// One method per presentation family; `kind` lets an implementation match
/// exhaustively on the concrete block kind.
pub trait Presenter {
    type Node;

    fn leaf(
        &mut self,
        kind: LeafKind,
        block: &Block,
        cx: &RenderContext,
        actions: LeafActions,
    ) -> Self::Node;

    /// `children` is never empty: an empty container receives one
    /// [`drop_target`](Presenter::drop_target) node instead.
    fn container(
        &mut self,
        kind: ContainerKind,
        block: &Block,
        cx: &RenderContext,
        actions: ContainerActions,
        children: Vec<Self::Node>,
    ) -> Self::Node;

    /// Placeholder inside a container with nothing to show, so it stays a
    /// discoverable target for new children. `cx` is the slot's own context.
    fn drop_target(
        &mut self,
        kind: ContainerKind,
        container: &Block,
        cx: &RenderContext,
        actions: ContainerActions,
    ) -> Self::Node;
}

/// Walks nested blocks and drives a [`Presenter`].
#[derive(Clone)]
pub struct Renderer {
    sink: Arc<dyn EditSink>,
}

impl Renderer {
    /// Renderer whose bound callbacks forward to `sink`.
    pub fn new(sink: Arc<dyn EditSink>) -> Self {
        Self { sink }
    }

    /// Render every visible root, in the order given.
    pub fn render_forest<P: Presenter>(&self, presenter: &mut P, roots: &[Block]) -> Vec<P::Node> {
        roots
            .iter()
            .enumerate()
            .filter_map(|(i, block)| self.render_block(presenter, block, &RenderContext::root(i)))
            .collect()
    }

    /// Render one block and its visible subtree. `None` if the block is hidden.
    pub fn render_block<P: Presenter>(
        &self,
        presenter: &mut P,
        block: &Block,
        cx: &RenderContext,
    ) -> Option<P::Node> {
        if !block.is_visible {
            tracing::trace!(block = %block.id, "hidden, skipping subtree");
            return None;
        }
        if cx.depth as usize > MAX_TREE_DEPTH {
            tracing::warn!(block = %block.id, depth = cx.depth, "render depth limit reached");
            return None;
        }

        match block.block_type.shape() {
            BlockShape::Leaf(kind) => {
                if !block.children.is_empty() {
                    tracing::warn!(
                        block = %block.id,
                        block_type = %block.block_type,
                        children = block.children.len(),
                        "leaf block has children, not rendering them"
                    );
                }
                let actions = LeafActions::new(block.id, self.sink.clone());
                Some(presenter.leaf(kind, block, cx, actions))
            }
            BlockShape::Container(kind) => {
                let mut children: Vec<P::Node> = block
                    .children
                    .iter()
                    .enumerate()
                    .filter_map(|(i, child)| {
                        self.render_block(presenter, child, &cx.child(block.id, i))
                    })
                    .collect();
                if children.is_empty() {
                    let slot = cx.child(block.id, 0);
                    let actions = ContainerActions::new(block.id, self.sink.clone());
                    children.push(presenter.drop_target(kind, block, &slot, actions));
                }
                let actions = ContainerActions::new(block.id, self.sink.clone());
                Some(presenter.container(kind, block, cx, actions, children))
            }
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}
