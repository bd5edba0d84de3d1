//! Shared identity and block types for pageblocks.
//!
//! This crate is the foundation of the block-tree engine: typed IDs, the
//! closed `BlockType` set, the `Block` node, mutation payloads, and the
//! numeric/symbolic tag codec. It has **no internal pageblocks
//! dependencies**: a pure leaf crate that the others build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Page (PageId)
//!     └── owns root Blocks (parent_id = None)
//!
//! Block (BlockId)
//!     └── parent_id points at a container Block on the same page
//!     └── order ranks it among its siblings
//!     └── children (nested form only)
//! ```
//!
//! # Key Types
//!
//! |--------------------|----------------------------------------------|
//! | Type               | Purpose                                      |
//! |--------------------|----------------------------------------------|
//! | [`BlockId`]        | Opaque block identity                        |
//! | [`PageId`]         | Page scope of a block forest                 |
//! | [`BlockType`]      | 27 kinds, numeric + symbolic tag             |
//! | [`BlockShape`]     | Container/leaf split for exhaustive dispatch |
//! | [`Block`]          | A tree node (flat or nested form)            |
//! | [`WireBlock`]      | Block with numeric tag (counterpart side)    |
//! | [`InvalidBlockType`] | Codec failure                              |
//! |--------------------|----------------------------------------------|

pub mod block;
pub mod codec;
pub mod ids;
pub mod payload;

// Re-export primary types at crate root for convenience.
pub use block::{
    Block, BlockBuilder, BlockShape, BlockType, ContainerKind, LeafKind, MAX_TREE_DEPTH,
    NumericTag,
};
pub use codec::{
    InvalidBlockType, is_container_tag, numeric_to_symbol, numeric_to_symbols, symbol_to_numeric,
    symbols_to_numeric,
};
pub use ids::{BlockId, PageId, PrefixError, resolve_block_prefix};
pub use payload::{
    CreateBlockInput, UpdateBlockInput, WireBlock, WireCreateBlockInput, WireUpdateBlockInput,
};
