//! Rendering for pageblocks.
//!
//! [`Renderer`] walks a nested forest (as produced by
//! `pageblocks_tree::unflatten_blocks`) and drives a [`Presenter`]. Every
//! presented block carries callbacks already bound to its id; containers
//! additionally get add-child. Hidden blocks and everything beneath them are
//! skipped. A container with nothing visible inside gets a drop target.
//!
//! Two presenters ship here: [`OutlinePresenter`] for text output and
//! [`TreePresenter`] for a structural [`RenderNode`] tree.

mod actions;
mod outline;
mod renderer;
mod tree;

use std::sync::Arc;

use pageblocks_types::Block;

pub use actions::{ContainerActions, EditSink, LeafActions, NullSink};
pub use outline::OutlinePresenter;
pub use renderer::{Presenter, RenderContext, Renderer};
pub use tree::{NodeActions, RenderKind, RenderNode, TreePresenter};

/// Render `roots` as an indented outline, one line per visible block.
pub fn render_outline(roots: &[Block], presenter: &OutlinePresenter) -> String {
    let mut presenter = presenter.clone();
    Renderer::new(Arc::new(NullSink))
        .render_forest(&mut presenter, roots)
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}
