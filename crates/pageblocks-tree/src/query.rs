//! Read-only traversal over one page snapshot.
//!
//! A [`BlockTree`] is built once from a flat (or nested) snapshot and then
//! answers queries without mutating anything. It is an explicit value: each
//! read cycle builds a fresh one, nothing is cached behind the caller's back.
//!
//! Unknown ids are not errors; they yield an empty `Vec` or `None`.

use std::collections::HashMap;

use pageblocks_types::{Block, BlockId, BlockType, PageId};

use crate::convert::{flatten_blocks, unflatten_blocks};
use crate::TreeError;

/// Indexed snapshot of a page's block forest.
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    /// Nested forest, roots in ascending order.
    roots: Vec<Block>,
    /// Flat rows in pre-order; `depth` is the derived depth.
    rows: Vec<Block>,
    /// Block id → index into `rows`.
    index: HashMap<BlockId, usize>,
    /// Parent id → child row indices, ascending order.
    children: HashMap<BlockId, Vec<usize>>,
    /// Root row indices, ascending order.
    root_rows: Vec<usize>,
    /// Row index → position among its siblings.
    sibling_pos: Vec<usize>,
}

impl BlockTree {
    /// Build from flat rows (any order). Fails if the rows cannot form a forest.
    pub fn from_flat(flat: &[Block]) -> Result<Self, TreeError> {
        let roots = unflatten_blocks(flat)?;
        Ok(Self::index(roots))
    }

    /// Build from an already-nested forest.
    ///
    /// Structure comes from the `children` arrays; stored `parent_id`s are
    /// ignored. The forest is flattened and rebuilt so a hand-assembled tree
    /// goes through the same integrity checks as a persisted one.
    pub fn from_nested(nested: &[Block]) -> Result<Self, TreeError> {
        Self::from_flat(&flatten_blocks(nested))
    }

    fn index(roots: Vec<Block>) -> Self {
        let rows = flatten_blocks(&roots);
        let index: HashMap<BlockId, usize> =
            rows.iter().enumerate().map(|(i, b)| (b.id, i)).collect();

        let mut children: HashMap<BlockId, Vec<usize>> = HashMap::new();
        let mut root_rows = Vec::new();
        let mut sibling_pos = vec![0; rows.len()];
        // Pre-order visits siblings in ascending order, so pushing keeps them sorted.
        for (i, row) in rows.iter().enumerate() {
            let siblings = match row.parent_id {
                Some(parent) => children.entry(parent).or_default(),
                None => &mut root_rows,
            };
            sibling_pos[i] = siblings.len();
            siblings.push(i);
        }

        Self {
            roots,
            rows,
            index,
            children,
            root_rows,
            sibling_pos,
        }
    }

    /// Page this snapshot belongs to; `None` when empty.
    pub fn page_id(&self) -> Option<PageId> {
        self.rows.first().map(|b| b.page_id)
    }

    /// Every block, pre-order, as flat rows.
    pub fn all_blocks(&self) -> &[Block] {
        &self.rows
    }

    /// The nested forest: root blocks in ascending order.
    pub fn block_tree(&self) -> &[Block] {
        &self.roots
    }

    /// Root rows in ascending order.
    pub fn roots(&self) -> Vec<&Block> {
        self.root_rows.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Flat row for `id`.
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index.contains_key(id)
    }

    /// Nested subtree rooted at `id`.
    pub fn node(&self, id: &BlockId) -> Option<&Block> {
        let &i = self.index.get(id)?;
        let mut path = vec![self.sibling_pos[i]];
        let mut current = self.rows[i].parent_id;
        while let Some(parent) = current {
            let &p = self.index.get(&parent)?;
            path.push(self.sibling_pos[p]);
            current = self.rows[p].parent_id;
        }

        let mut positions = path.into_iter().rev();
        let mut node = self.roots.get(positions.next()?)?;
        for pos in positions {
            node = node.children.get(pos)?;
        }
        Some(node)
    }

    /// Direct children of `id`, ascending order. Empty for leaves and unknown ids.
    pub fn children(&self, id: &BlockId) -> Vec<&Block> {
        self.children
            .get(id)
            .map(|kids| kids.iter().map(|&i| &self.rows[i]).collect())
            .unwrap_or_default()
    }

    /// Parent of `id`. `None` for roots and unknown ids.
    pub fn parent(&self, id: &BlockId) -> Option<&Block> {
        self.get(id)?.parent_id.and_then(|p| self.get(&p))
    }

    /// Ancestors from the immediate parent up to the root, nearest first.
    pub fn ancestors(&self, id: &BlockId) -> Vec<&Block> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(block) = current {
            result.push(block);
            current = self.parent(&block.id);
        }
        result
    }

    /// All blocks strictly below `id`, pre-order.
    pub fn descendants(&self, id: &BlockId) -> Vec<&Block> {
        let Some(&i) = self.index.get(id) else {
            return Vec::new();
        };
        // In pre-order a subtree is the contiguous run of deeper rows after its root.
        let depth = self.rows[i].depth;
        self.rows[i + 1..]
            .iter()
            .take_while(|b| b.depth > depth)
            .collect()
    }

    /// Derived depth of `id` (0 for roots).
    pub fn depth(&self, id: &BlockId) -> Option<u32> {
        self.get(id).map(|b| b.depth)
    }

    /// Check whether `id` sits somewhere below `ancestor`.
    pub fn is_descendant_of(&self, id: &BlockId, ancestor: &BlockId) -> bool {
        self.ancestors(id).iter().any(|b| b.id == *ancestor)
    }

    /// Rank for a block appended after the last child of `parent` (or last root).
    pub fn next_child_order(&self, parent: Option<&BlockId>) -> i64 {
        let siblings = match parent {
            Some(parent) => self.children(parent),
            None => self.roots(),
        };
        siblings.iter().map(|b| b.order).max().map_or(0, |max| max + 1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Check whether `block_type` may own children.
pub fn is_container_block(block_type: BlockType) -> bool {
    block_type.is_container()
}
