//! Flat ↔ nested conversion.
//!
//! The flat form is what persistence hands us: one row per block, structure
//! carried by `parent_id` and `order`. The nested form has `children`
//! populated and is what traversal and rendering consume.
//!
//! Both directions recompute `depth` from position; a stored depth is never
//! trusted.

use std::collections::HashMap;

use pageblocks_types::{Block, BlockId, MAX_TREE_DEPTH};

use crate::TreeError;

/// Pre-order flattening of a nested forest.
///
/// Each block is emitted before its children; siblings are visited in
/// ascending `order` (stable, so ties keep their array position). Output rows
/// have empty `children`; `depth` and `parent_id` come from nesting, so a
/// stored `parent_id` that disagrees with the `children` arrays is replaced.
pub fn flatten_blocks(nested: &[Block]) -> Vec<Block> {
    let mut out = Vec::new();
    let mut stack: Vec<(u32, Option<BlockId>, &Block)> = sorted_by_order(nested)
        .into_iter()
        .rev()
        .map(|b| (0, None, b))
        .collect();

    while let Some((depth, parent, block)) = stack.pop() {
        // Push children in reverse to maintain order
        for child in sorted_by_order(&block.children).into_iter().rev() {
            stack.push((depth + 1, Some(block.id), child));
        }
        let mut row = block.to_flat();
        row.depth = depth;
        row.parent_id = parent;
        out.push(row);
    }

    out
}

/// Rebuild the nested forest from flat rows.
///
/// Rows may arrive in any order. Siblings are grouped by `parent_id` and
/// stably sorted by `order`; equal orders keep input order and log a warning.
///
/// The snapshot is rejected (never repaired) when it cannot form a forest:
/// duplicate ids, rows from more than one page, self-parenting, a parent
/// missing from the snapshot or on another page, a cycle, or nesting beyond
/// `MAX_TREE_DEPTH`.
pub fn unflatten_blocks(flat: &[Block]) -> Result<Vec<Block>, TreeError> {
    let mut index: HashMap<BlockId, usize> = HashMap::with_capacity(flat.len());
    for (i, block) in flat.iter().enumerate() {
        if index.insert(block.id, i).is_some() {
            return Err(TreeError::DuplicateBlock(block.id));
        }
    }

    if let Some(first) = flat.first()
        && let Some(other) = flat.iter().find(|b| b.page_id != first.page_id)
    {
        return Err(TreeError::MixedPages {
            first: first.page_id,
            other: other.page_id,
        });
    }

    let mut groups: HashMap<Option<BlockId>, Vec<usize>> = HashMap::new();
    for (i, block) in flat.iter().enumerate() {
        if let Some(parent_id) = block.parent_id {
            if parent_id == block.id {
                return Err(TreeError::SelfParent(block.id));
            }
            let Some(&p) = index.get(&parent_id) else {
                return Err(TreeError::MissingParent {
                    block: block.id,
                    parent: parent_id,
                });
            };
            if flat[p].page_id != block.page_id {
                return Err(TreeError::CrossPage {
                    block: block.id,
                    page: block.page_id,
                    parent: parent_id,
                    parent_page: flat[p].page_id,
                });
            }
        }
        groups.entry(block.parent_id).or_default().push(i);
    }

    for (parent, siblings) in groups.iter_mut() {
        // sort_by_key is stable: ties keep input order
        siblings.sort_by_key(|&i| flat[i].order);
        for pair in siblings.windows(2) {
            if flat[pair[0]].order == flat[pair[1]].order {
                tracing::warn!(
                    parent = ?parent,
                    order = flat[pair[0]].order,
                    "sibling order tie, keeping input order"
                );
            }
        }
    }

    let mut builder = Builder {
        flat,
        groups: &groups,
        placed: vec![false; flat.len()],
    };
    let roots = match groups.get(&None) {
        Some(roots) => roots
            .iter()
            .map(|&i| builder.attach(i, 0))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    // Anything not reachable from a root sits on (or under) a parent cycle.
    if let Some(i) = builder.placed.iter().position(|placed| !placed) {
        return Err(TreeError::Cycle(flat[i].id));
    }

    tracing::debug!(blocks = flat.len(), roots = roots.len(), "unflattened snapshot");
    Ok(roots)
}

struct Builder<'a> {
    flat: &'a [Block],
    groups: &'a HashMap<Option<BlockId>, Vec<usize>>,
    placed: Vec<bool>,
}

impl Builder<'_> {
    fn attach(&mut self, i: usize, depth: usize) -> Result<Block, TreeError> {
        let (flat, groups) = (self.flat, self.groups);
        let row = &flat[i];
        if depth > MAX_TREE_DEPTH {
            return Err(TreeError::TooDeep {
                block: row.id,
                max: MAX_TREE_DEPTH,
            });
        }
        self.placed[i] = true;

        let mut block = row.to_flat();
        block.depth = depth as u32;
        if let Some(children) = groups.get(&Some(row.id)) {
            block.children = children
                .iter()
                .map(|&c| self.attach(c, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(block)
    }
}

fn sorted_by_order(blocks: &[Block]) -> Vec<&Block> {
    let mut sorted: Vec<&Block> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.order);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageblocks_types::{BlockBuilder, BlockType, PageId};

    fn ids(blocks: &[Block]) -> Vec<BlockId> {
        blocks.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_unflatten_empty() {
        assert!(unflatten_blocks(&[]).unwrap().is_empty());
        assert!(flatten_blocks(&[]).is_empty());
    }

    #[test]
    fn test_unflatten_orders_children_and_sets_depth() {
        let page = PageId::new();
        let section = BlockBuilder::new(page, BlockType::Section).build();
        let c2 = BlockBuilder::new(page, BlockType::Text).parent(section.id).order(2).build();
        let c0 = BlockBuilder::new(page, BlockType::Text).parent(section.id).order(0).build();
        let c1 = BlockBuilder::new(page, BlockType::Text).parent(section.id).order(1).build();

        // Children first, parent last: input order must not matter
        let flat = vec![c2.clone(), c0.clone(), c1.clone(), section.clone()];
        let tree = unflatten_blocks(&flat).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].depth, 0);
        assert_eq!(ids(&tree[0].children), vec![c0.id, c1.id, c2.id]);
        assert!(tree[0].children.iter().all(|c| c.depth == 1));
    }

    #[test]
    fn test_unflatten_stable_tie_break() {
        let page = PageId::new();
        let parent = BlockBuilder::new(page, BlockType::FlexRow).build();
        let a = BlockBuilder::new(page, BlockType::Text).parent(parent.id).order(4).build();
        let b = BlockBuilder::new(page, BlockType::Text).parent(parent.id).order(2).build();
        let c = BlockBuilder::new(page, BlockType::Text).parent(parent.id).order(0).build();
        let d = BlockBuilder::new(page, BlockType::Text).parent(parent.id).order(0).build();

        let flat = vec![parent, a.clone(), b.clone(), c.clone(), d.clone()];
        let tree = unflatten_blocks(&flat).unwrap();
        assert_eq!(ids(&tree[0].children), vec![c.id, d.id, b.id, a.id]);
    }

    #[test]
    fn test_unflatten_overwrites_stored_depth() {
        let page = PageId::new();
        let root = BlockBuilder::new(page, BlockType::Container).depth(7).build();
        let child = BlockBuilder::new(page, BlockType::Image).parent(root.id).depth(0).build();
        let tree = unflatten_blocks(&[root, child]).unwrap();
        assert_eq!(tree[0].depth, 0);
        assert_eq!(tree[0].children[0].depth, 1);
    }

    #[test]
    fn test_unflatten_keeps_leaf_children() {
        // Structure-preserving: a leaf with children is reported elsewhere, not dropped.
        let page = PageId::new();
        let text = BlockBuilder::new(page, BlockType::Text).build();
        let inner = BlockBuilder::new(page, BlockType::Image).parent(text.id).build();
        let tree = unflatten_blocks(&[text, inner.clone()]).unwrap();
        assert_eq!(ids(&tree[0].children), vec![inner.id]);
    }

    #[test]
    fn test_unflatten_rejects_missing_parent() {
        let page = PageId::new();
        let ghost = BlockId::new();
        let orphan = BlockBuilder::new(page, BlockType::Text).parent(ghost).build();
        let err = unflatten_blocks(&[orphan.clone()]).unwrap_err();
        assert_eq!(
            err,
            TreeError::MissingParent {
                block: orphan.id,
                parent: ghost
            }
        );
    }

    #[test]
    fn test_unflatten_rejects_self_parent() {
        let page = PageId::new();
        let id = BlockId::new();
        let block = BlockBuilder::new(page, BlockType::Section).id(id).parent(id).build();
        assert_eq!(unflatten_blocks(&[block]), Err(TreeError::SelfParent(id)));
    }

    #[test]
    fn test_unflatten_rejects_cycle() {
        let page = PageId::new();
        let a_id = BlockId::new();
        let b_id = BlockId::new();
        let root = BlockBuilder::new(page, BlockType::Section).build();
        let a = BlockBuilder::new(page, BlockType::Grid).id(a_id).parent(b_id).build();
        let b = BlockBuilder::new(page, BlockType::Grid).id(b_id).parent(a_id).build();
        let err = unflatten_blocks(&[root, a, b]).unwrap_err();
        assert!(matches!(err, TreeError::Cycle(id) if id == a_id || id == b_id));
    }

    #[test]
    fn test_unflatten_rejects_duplicates() {
        let page = PageId::new();
        let block = BlockBuilder::new(page, BlockType::Text).build();
        assert_eq!(
            unflatten_blocks(&[block.clone(), block.clone()]),
            Err(TreeError::DuplicateBlock(block.id))
        );
    }

    #[test]
    fn test_unflatten_rejects_cross_page_parent() {
        let parent = BlockBuilder::new(PageId::new(), BlockType::Section).build();
        let child = BlockBuilder::new(PageId::new(), BlockType::Text).parent(parent.id).build();
        let err = unflatten_blocks(&[parent, child]).unwrap_err();
        assert!(matches!(err, TreeError::CrossPage { .. }));
    }

    #[test]
    fn test_unflatten_rejects_too_deep() {
        let page = PageId::new();
        let mut flat = vec![BlockBuilder::new(page, BlockType::Container).build()];
        for _ in 0..=MAX_TREE_DEPTH {
            let parent = flat[flat.len() - 1].id;
            flat.push(BlockBuilder::new(page, BlockType::Container).parent(parent).build());
        }
        let err = unflatten_blocks(&flat).unwrap_err();
        assert!(matches!(err, TreeError::TooDeep { .. }));
    }

    #[test]
    fn test_flatten_is_pre_order_with_sorted_siblings() {
        let page = PageId::new();
        let card_b = BlockBuilder::new(page, BlockType::Card).order(5).build();
        let card_a = BlockBuilder::new(page, BlockType::Card).order(1).build();
        let grid = BlockBuilder::new(page, BlockType::Grid)
            .children(vec![card_b.clone(), card_a.clone()])
            .build();
        let footer = BlockBuilder::new(page, BlockType::Section).order(1).build();
        let header = BlockBuilder::new(page, BlockType::Section)
            .order(0)
            .children(vec![grid.clone()])
            .build();

        let flat = flatten_blocks(&[footer.clone(), header.clone()]);
        assert_eq!(
            ids(&flat),
            vec![header.id, grid.id, card_a.id, card_b.id, footer.id]
        );
        let depths: Vec<u32> = flat.iter().map(|b| b.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 0]);
        assert!(flat.iter().all(|b| b.children.is_empty()));
    }

    #[test]
    fn test_flatten_takes_parents_from_nesting() {
        let page = PageId::new();
        let card = BlockBuilder::new(page, BlockType::Card).build();
        let grid = BlockBuilder::new(page, BlockType::Grid)
            .children(vec![card.clone()])
            .build();
        let section = BlockBuilder::new(page, BlockType::Section)
            .children(vec![grid.clone()])
            .build();

        let flat = flatten_blocks(&[section.clone()]);
        let parents: Vec<Option<BlockId>> = flat.iter().map(|b| b.parent_id).collect();
        assert_eq!(parents, vec![None, Some(section.id), Some(grid.id)]);

        let tree = unflatten_blocks(&flat).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(ids(&tree[0].children), vec![grid.id]);
        assert_eq!(ids(&tree[0].children[0].children), vec![card.id]);
    }

    #[test]
    fn test_flatten_overrides_stale_parent() {
        let page = PageId::new();
        let stale = BlockId::new();
        let child = BlockBuilder::new(page, BlockType::Text).parent(stale).build();
        let root = BlockBuilder::new(page, BlockType::Section)
            .parent(stale)
            .children(vec![child.clone()])
            .build();

        let flat = flatten_blocks(&[root.clone()]);
        assert_eq!(flat[0].parent_id, None);
        assert_eq!(flat[1].parent_id, Some(root.id));
        assert!(unflatten_blocks(&flat).is_ok());
    }

    #[test]
    fn test_unflatten_rejects_mixed_pages() {
        let a = BlockBuilder::new(PageId::new(), BlockType::Section).build();
        let b = BlockBuilder::new(PageId::new(), BlockType::Section).build();
        assert_eq!(
            unflatten_blocks(&[a.clone(), b.clone()]),
            Err(TreeError::MixedPages {
                first: a.page_id,
                other: b.page_id
            })
        );
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let page = PageId::new();
        let section = BlockBuilder::new(page, BlockType::Section).build();
        let grid = BlockBuilder::new(page, BlockType::Grid).parent(section.id).build();
        let card1 = BlockBuilder::new(page, BlockType::Card).parent(grid.id).order(0).build();
        let card2 = BlockBuilder::new(page, BlockType::Card).parent(grid.id).order(1).build();
        let input = vec![card2.clone(), grid.clone(), section.clone(), card1.clone()];

        let flat = flatten_blocks(&unflatten_blocks(&input).unwrap());
        assert_eq!(ids(&flat), vec![section.id, grid.id, card1.id, card2.id]);
        for row in &input {
            let out = flat.iter().find(|b| b.id == row.id).unwrap();
            assert!(out.row_eq(row));
        }
    }
}
