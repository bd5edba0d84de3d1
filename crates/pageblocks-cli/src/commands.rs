//! Subcommand implementations. Each returns the text to print.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;

use pageblocks_render::{OutlinePresenter, render_outline};
use pageblocks_tree::{BlockTree, validate_snapshot};
use pageblocks_types::{Block, BlockId, codec, resolve_block_prefix};

use crate::config::CliConfig;

/// Structural relation for `query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Relation {
    Children,
    Parent,
    Ancestors,
    Descendants,
}

/// Conversion direction for `codec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Integer tags to symbolic names.
    ToSymbol,
    /// Symbolic names to integer tags.
    ToNumeric,
}

/// Outline (or nested JSON) of the snapshot.
pub fn tree(rows: &[Block], config: &CliConfig, json: bool) -> Result<String> {
    let tree = BlockTree::from_flat(rows)?;
    if json {
        return Ok(serde_json::to_string_pretty(tree.block_tree())?);
    }
    let presenter = OutlinePresenter {
        indent: config.indent,
        preview_chars: config.preview_chars,
    };
    Ok(render_outline(tree.block_tree(), &presenter))
}

/// Pre-order flat rows as JSON, depth recomputed.
pub fn flatten(rows: &[Block]) -> Result<String> {
    let tree = BlockTree::from_flat(rows)?;
    Ok(serde_json::to_string_pretty(tree.all_blocks())?)
}

fn row_line(block: &Block) -> String {
    format!(
        "{} {} depth={} order={}",
        block.id, block.block_type, block.depth, block.order
    )
}

/// Blocks related to the block whose id starts with `prefix`, one per line.
pub fn query(rows: &[Block], relation: Relation, prefix: &str) -> Result<String> {
    let tree = BlockTree::from_flat(rows)?;
    let id: BlockId = resolve_block_prefix(tree.all_blocks().iter().map(|b| b.id), prefix)
        .with_context(|| format!("cannot resolve block {prefix:?}"))?;

    let found: Vec<&Block> = match relation {
        Relation::Children => tree.children(&id),
        Relation::Parent => tree.parent(&id).into_iter().collect(),
        Relation::Ancestors => tree.ancestors(&id),
        Relation::Descendants => tree.descendants(&id),
    };
    tracing::debug!(block = %id, ?relation, results = found.len(), "query");
    Ok(found
        .into_iter()
        .map(row_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Validation report text, and whether the snapshot is clean.
pub fn validate(rows: &[Block]) -> (String, bool) {
    let report = validate_snapshot(rows);
    if report.is_clean() {
        return (format!("ok: {} blocks", rows.len()), true);
    }
    let text = report
        .violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    (text, false)
}

/// Convert each value between numeric and symbolic tags. All-or-nothing.
pub fn convert_tags(direction: Direction, values: &[String]) -> Result<String> {
    if values.is_empty() {
        bail!("no values given");
    }
    let out: Vec<String> = match direction {
        Direction::ToSymbol => {
            let tags = values
                .iter()
                .map(|v| {
                    v.parse::<i64>()
                        .with_context(|| format!("{v:?} is not an integer tag"))
                })
                .collect::<Result<Vec<_>>>()?;
            codec::numeric_to_symbols(&tags)?
                .into_iter()
                .map(String::from)
                .collect()
        }
        Direction::ToNumeric => codec::symbols_to_numeric(values)?
            .into_iter()
            .map(|n| n.to_string())
            .collect(),
    };
    Ok(out.join("\n"))
}
