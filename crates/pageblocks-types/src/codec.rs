//! BlockType codec: numeric tag ↔ symbolic tag.
//!
//! The numeric tag is the counterpart system's local identity for a block
//! kind; the symbolic tag is the wire/storage identity. Both directions are
//! generated from [`BlockType`], so a value is either valid on both sides or
//! invalid on both.
//!
//! Anything outside the closed set fails with [`InvalidBlockType`]; nothing is
//! ever coerced to a default kind.

use thiserror::Error;

use crate::block::{BlockType, NumericTag};
use crate::payload::{
    CreateBlockInput, UpdateBlockInput, WireBlock, WireCreateBlockInput, WireUpdateBlockInput,
};
use crate::Block;

/// A tag outside the closed block-type enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBlockType {
    /// Integer tag with no mapping.
    #[error("invalid block type: numeric tag {0} is not mapped")]
    Numeric(i64),

    /// Symbol that names no block type.
    #[error("invalid block type: unrecognized symbol {0:?}")]
    Symbol(String),
}

/// Symbolic tag for integer `n`.
pub fn numeric_to_symbol(n: i64) -> Result<&'static str, InvalidBlockType> {
    BlockType::from_numeric(n).map(BlockType::as_str)
}

/// Integer tag for symbol `s` (case-insensitive).
pub fn symbol_to_numeric(s: &str) -> Result<NumericTag, InvalidBlockType> {
    BlockType::from_symbol(s).map(BlockType::numeric)
}

/// Element-wise [`numeric_to_symbol`]; the first invalid tag fails the batch.
pub fn numeric_to_symbols(tags: &[i64]) -> Result<Vec<&'static str>, InvalidBlockType> {
    tags.iter().map(|&n| numeric_to_symbol(n)).collect()
}

/// Element-wise [`symbol_to_numeric`]; the first invalid symbol fails the batch.
pub fn symbols_to_numeric<S: AsRef<str>>(
    symbols: &[S],
) -> Result<Vec<NumericTag>, InvalidBlockType> {
    symbols.iter().map(|s| symbol_to_numeric(s.as_ref())).collect()
}

/// Check whether `tag` names a container kind. Unknown tags are not containers.
pub fn is_container_tag(tag: &str) -> bool {
    BlockType::from_symbol(tag).is_ok_and(BlockType::is_container)
}

// ── Structural converters ───────────────────────────────────────────────────

/// Translate a block (and its children) to the numeric-tag representation.
pub fn to_wire_block(block: &Block) -> WireBlock {
    WireBlock {
        id: block.id,
        page_id: block.page_id,
        block_type: block.block_type.numeric(),
        content: block.content.clone(),
        style: block.style.clone(),
        order: block.order,
        is_visible: block.is_visible,
        parent_id: block.parent_id,
        depth: block.depth,
        children: block.children.iter().map(to_wire_block).collect(),
    }
}

/// Translate a numeric-tag block (and its children) back to a [`Block`].
pub fn from_wire_block(wire: WireBlock) -> Result<Block, InvalidBlockType> {
    let children = wire
        .children
        .into_iter()
        .map(from_wire_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Block {
        id: wire.id,
        page_id: wire.page_id,
        block_type: BlockType::from_numeric(i64::from(wire.block_type))?,
        content: wire.content,
        style: wire.style,
        order: wire.order,
        is_visible: wire.is_visible,
        parent_id: wire.parent_id,
        depth: wire.depth,
        children,
    })
}

pub fn to_wire_create(input: &CreateBlockInput) -> WireCreateBlockInput {
    WireCreateBlockInput {
        page_id: input.page_id,
        parent_id: input.parent_id,
        block_type: input.block_type.numeric(),
        content: input.content.clone(),
        style: input.style.clone(),
        order: input.order,
        is_visible: input.is_visible,
    }
}

pub fn from_wire_create(wire: WireCreateBlockInput) -> Result<CreateBlockInput, InvalidBlockType> {
    Ok(CreateBlockInput {
        page_id: wire.page_id,
        parent_id: wire.parent_id,
        block_type: BlockType::from_numeric(i64::from(wire.block_type))?,
        content: wire.content,
        style: wire.style,
        order: wire.order,
        is_visible: wire.is_visible,
    })
}

pub fn to_wire_update(input: &UpdateBlockInput) -> WireUpdateBlockInput {
    WireUpdateBlockInput {
        block_type: input.block_type.map(BlockType::numeric),
        content: input.content.clone(),
        style: input.style.clone(),
        order: input.order,
        is_visible: input.is_visible,
    }
}

pub fn from_wire_update(wire: WireUpdateBlockInput) -> Result<UpdateBlockInput, InvalidBlockType> {
    let block_type = wire
        .block_type
        .map(|tag| BlockType::from_numeric(i64::from(tag)))
        .transpose()?;
    Ok(UpdateBlockInput {
        block_type,
        content: wire.content,
        style: wire.style,
        order: wire.order,
        is_visible: wire.is_visible,
    })
}
