use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use findom::{FindOptions, FindomConfig, Normalizer};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use super::compact_json;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Normalize",
        commands: &[
            "findom normalize query.json                  # Show normalized options as a table",
            "findom normalize query.json --output json    # Emit normalized JSON",
            "cat query.json | findom normalize -o compact # Single-line output from stdin",
        ],
    },
    ExampleGroup {
        title: "Configuration",
        commands: &["findom --config ./findom.toml normalize query.json  # Use an explicit config file"],
    },
];

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON file to read (stdin when omitted)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeReport {
    /// Canonical operators in the normalized `where` clause
    pub operators: usize,
    pub options: FindOptions,
}

impl NormalizeReport {
    pub fn new(options: FindOptions) -> Self {
        let operators = options.where_clause.as_ref().map_or(0, |node| node.operator_count());
        Self { operators, options }
    }

    fn field_values(&self) -> Vec<(String, Value)> {
        match serde_json::to_value(&self.options) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl TableDisplay for NormalizeReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.table(&["Option", "Value"]);
        for (field, value) in self.field_values() {
            let rendered = serde_json::to_string_pretty(&value).unwrap_or_default();
            table.add_row(vec![Cell::new(field), Cell::new(rendered)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        compact_json(&serde_json::to_value(&self.options).unwrap_or_default())
    }
}

pub fn handle_normalize(args: NormalizeArgs, config: &FindomConfig, output: &OutputManager) -> Result<()> {
    let document = super::read_document(args.file.as_deref())?;
    let options = FindOptions::from_value(document).context("Input is not recognized as find options")?;

    let normalizer = Normalizer::new(config.normalizer.clone());
    output.verbose(&format!("max depth {}", normalizer.config().max_depth));

    let before = options.where_clause.as_ref().map_or(0, |node| node.operator_count());
    let report = NormalizeReport::new(normalizer.normalize(&options));
    output.verbose(&operator_summary(before, report.operators));

    if options.where_clause.is_none() {
        output.warning("No where clause; options are passed through unchanged");
    }

    output.display(&report)
}

/// Nested operands count separately: `{"$not": {"$like": ..}}` is two operators.
fn operator_summary(before: usize, after: usize) -> String {
    format!("{after} canonical operator(s) in where clause, {before} before normalization")
}
