//! Tabular export of a valued lattice
//!
//! One record per internal node, in pre-order (node, up subtree, down subtree).
//! Identifiers are paths: the root is `Base` and each move appends `_U` or `_D`.
//! Leaves are referenced by their parents' child columns but are not exported.
//! The walk visits every path, so a lattice of `n` periods yields `2^n - 1` records
//! whatever its layout.

use crate::error::{LatticeError, Result};
use crate::lattice::LatticeTree;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Identifier of the root node
pub const ROOT_LABEL: &str = "Base";
const UP_SUFFIX: &str = "_U";
const DOWN_SUFFIX: &str = "_D";

/// Deepest lattice that can be exported (about a million records)
pub const MAX_EXPORT_PERIODS: usize = 20;

/// One exported lattice node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Position in the pre-order walk
    pub row: usize,
    pub identifier: String,
    #[serde(rename = "value")]
    pub option_value: f64,
    pub spot_value: f64,
    /// Empty for the root
    pub parent: String,
    #[serde(rename = "upChild")]
    pub up_child: String,
    #[serde(rename = "downChild")]
    pub down_child: String,
}

/// Walk the valued lattice and collect every internal node.
///
/// Records are only returned once the whole walk has succeeded.
pub fn export_records(tree: &LatticeTree) -> Result<Vec<ExportRecord>> {
    if tree.periods() > MAX_EXPORT_PERIODS {
        return Err(LatticeError::InvalidInput(format!(
            "lattice export supports at most {} periods, got {}",
            MAX_EXPORT_PERIODS,
            tree.periods()
        )));
    }
    if !tree.is_valued() {
        return Err(LatticeError::NotValued);
    }

    let nodes = tree.nodes();
    let mut records = Vec::new();
    let mut stack = vec![(0usize, ROOT_LABEL.to_string(), String::new())];

    while let Some((slot, identifier, parent)) = stack.pop() {
        let node = &nodes[slot];
        let (Some(up), Some(down)) = (node.up_child, node.down_child) else {
            continue;
        };

        let option_value = node.option_value.ok_or(LatticeError::NotValued)?;
        let up_id = format!("{}{}", identifier, UP_SUFFIX);
        let down_id = format!("{}{}", identifier, DOWN_SUFFIX);

        // Down pushed first so the up subtree is walked first
        stack.push((down, down_id.clone(), identifier.clone()));
        stack.push((up, up_id.clone(), identifier.clone()));

        let row = records.len();
        records.push(ExportRecord {
            row,
            identifier,
            option_value,
            spot_value: node.spot,
            parent,
            up_child: up_id,
            down_child: down_id,
        });
    }

    log::debug!("exported {} lattice records", records.len());
    Ok(records)
}

/// Write records as CSV with a header row
pub fn write_csv<W: Write>(records: &[ExportRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to a CSV file, replacing any existing file
pub fn write_csv_file<P: AsRef<Path>>(records: &[ExportRecord], path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(records, file)
}
