//! Invariant report for a flat snapshot.
//!
//! Conversion rejects snapshots that cannot form a forest at all. The checks
//! here cover what conversion deliberately tolerates: leaves holding children,
//! sibling order ties, and stored depths that disagree with the parent chain.

use std::collections::HashMap;
use std::fmt;

use pageblocks_types::{Block, BlockId, BlockType};

use crate::{BlockTree, TreeError};

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The snapshot does not form a forest; no other check ran.
    Integrity(TreeError),
    /// A leaf-type block owns children.
    LeafWithChildren {
        block: BlockId,
        block_type: BlockType,
        children: usize,
    },
    /// Two siblings share an order value.
    OrderTie {
        parent: Option<BlockId>,
        order: i64,
        blocks: Vec<BlockId>,
    },
    /// Stored depth differs from the ancestor-chain length.
    DepthMismatch {
        block: BlockId,
        stored: u32,
        derived: u32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Integrity(e) => write!(f, "integrity: {e}"),
            Violation::LeafWithChildren {
                block,
                block_type,
                children,
            } => write!(f, "{block_type} block {block} has {children} children"),
            Violation::OrderTie {
                parent,
                order,
                blocks,
            } => {
                let parent = parent.map_or_else(|| "page root".to_string(), |p| p.to_string());
                write!(f, "{} siblings under {parent} share order {order}", blocks.len())
            }
            Violation::DepthMismatch {
                block,
                stored,
                derived,
            } => write!(f, "block {block} stores depth {stored}, derived {derived}"),
        }
    }
}

/// Result of [`validate_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations that make the snapshot unusable (as opposed to tolerated on read).
    pub fn has_integrity_error(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::Integrity(_)))
    }
}

/// Check every invariant of a flat snapshot.
pub fn validate_snapshot(flat: &[Block]) -> ValidationReport {
    let tree = match BlockTree::from_flat(flat) {
        Ok(tree) => tree,
        Err(e) => {
            return ValidationReport {
                violations: vec![Violation::Integrity(e)],
            };
        }
    };

    let mut violations = Vec::new();

    for row in tree.all_blocks() {
        let children = tree.children(&row.id);
        if !row.is_container() && !children.is_empty() {
            violations.push(Violation::LeafWithChildren {
                block: row.id,
                block_type: row.block_type,
                children: children.len(),
            });
        }
    }

    let mut groups: Vec<(Option<BlockId>, Vec<&Block>)> =
        vec![(None, tree.roots())];
    groups.extend(
        tree.all_blocks()
            .iter()
            .map(|row| (Some(row.id), tree.children(&row.id)))
            .filter(|(_, kids)| kids.len() > 1),
    );
    for (parent, siblings) in groups {
        let mut by_order: HashMap<i64, Vec<BlockId>> = HashMap::new();
        for sibling in &siblings {
            by_order.entry(sibling.order).or_default().push(sibling.id);
        }
        // Walk siblings, not the map: ties come out in sibling order.
        for sibling in &siblings {
            if let Some(blocks) = by_order.remove(&sibling.order)
                && blocks.len() > 1
            {
                violations.push(Violation::OrderTie {
                    parent,
                    order: sibling.order,
                    blocks,
                });
            }
        }
    }

    for stored in flat {
        if let Some(derived) = tree.depth(&stored.id)
            && derived != stored.depth
        {
            violations.push(Violation::DepthMismatch {
                block: stored.id,
                stored: stored.depth,
                derived,
            });
        }
    }

    ValidationReport { violations }
}
