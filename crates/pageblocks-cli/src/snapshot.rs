//! Reading block snapshots from disk or stdin.
//!
//! A snapshot is a JSON array of blocks. Rows may be flat (parent pointers)
//! or nested (`children` arrays); nested input is flattened on read. With
//! `wire` set, `type` holds the numeric tag instead of the symbol.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use pageblocks_tree::flatten_blocks;
use pageblocks_types::{Block, WireBlock, codec};

/// Read JSON text from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Parse snapshot text into flat rows.
pub fn parse_snapshot(text: &str, wire: bool) -> Result<Vec<Block>> {
    let blocks: Vec<Block> = if wire {
        let rows: Vec<WireBlock> =
            serde_json::from_str(text).context("invalid numeric-tag snapshot")?;
        rows.into_iter()
            .map(codec::from_wire_block)
            .collect::<Result<_, _>>()?
    } else {
        serde_json::from_str(text).context("invalid snapshot")?
    };

    if blocks.iter().any(|b| !b.children.is_empty()) {
        tracing::debug!("nested snapshot, flattening");
        return Ok(flatten_blocks(&blocks));
    }
    Ok(blocks)
}

pub fn load_snapshot(path: Option<&Path>, wire: bool) -> Result<Vec<Block>> {
    let text = read_input(path)?;
    let rows = parse_snapshot(&text, wire)?;
    tracing::debug!(rows = rows.len(), "snapshot loaded");
    Ok(rows)
}
