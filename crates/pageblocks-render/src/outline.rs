//! Indented text outline of a block forest.
//!
//! One line per visible block, e.g.
//!
//! ```text
//! SECTION 0195a1b2 #0
//!   GRID 0195a1b3 #0
//!     CARD 0195a1b4 #0 "Pricing"
//!     CARD 0195a1b5 #1
//!   FLEX_ROW 0195a1b6 #1
//!     [drop here]
//! ```

use pageblocks_types::{Block, ContainerKind, LeafKind};

use crate::actions::{ContainerActions, LeafActions};
use crate::renderer::{Presenter, RenderContext};

/// Presenter producing indented outline lines.
#[derive(Debug, Clone)]
pub struct OutlinePresenter {
    /// Spaces per depth level.
    pub indent: usize,
    /// Longest content preview shown, in characters. 0 disables previews.
    pub preview_chars: usize,
}

impl Default for OutlinePresenter {
    fn default() -> Self {
        Self {
            indent: 2,
            preview_chars: 40,
        }
    }
}

impl OutlinePresenter {
    fn line(&self, block: &Block, cx: &RenderContext) -> String {
        let pad = " ".repeat(self.indent * cx.depth as usize);
        let mut line = format!("{pad}{} {} #{}", block.block_type, block.id.short(), block.order);
        if let Some(preview) = self.preview(block) {
            line.push_str(&format!(" {preview:?}"));
        }
        line
    }

    /// First string found under a `text`, `title`, or `label` content key.
    fn preview(&self, block: &Block) -> Option<String> {
        if self.preview_chars == 0 {
            return None;
        }
        let text = ["text", "title", "label"]
            .iter()
            .find_map(|key| block.content.get(key).and_then(serde_json::Value::as_str))?;
        let mut preview: String = text.chars().take(self.preview_chars).collect();
        if text.chars().count() > self.preview_chars {
            preview.push('…');
        }
        Some(preview)
    }
}

impl Presenter for OutlinePresenter {
    type Node = Vec<String>;

    fn leaf(
        &mut self,
        _kind: LeafKind,
        block: &Block,
        cx: &RenderContext,
        _actions: LeafActions,
    ) -> Self::Node {
        vec![self.line(block, cx)]
    }

    fn container(
        &mut self,
        _kind: ContainerKind,
        block: &Block,
        cx: &RenderContext,
        _actions: ContainerActions,
        children: Vec<Self::Node>,
    ) -> Self::Node {
        let mut lines = vec![self.line(block, cx)];
        lines.extend(children.into_iter().flatten());
        lines
    }

    fn drop_target(
        &mut self,
        _kind: ContainerKind,
        _container: &Block,
        cx: &RenderContext,
        _actions: ContainerActions,
    ) -> Self::Node {
        vec![format!("{}[drop here]", " ".repeat(self.indent * cx.depth as usize))]
    }
}
