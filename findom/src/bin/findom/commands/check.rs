use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use findom::is_find_options;
use findom::options::{FIND_OPTIONS_FIELDS, field_qualifies, json_type_name};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager, TableDisplay};
use crate::theme::{FAIL, PASS};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Shape Check",
    commands: &[
        "findom check query.json                 # Check a file",
        "echo '{\"skip\": \"5\"}' | findom check     # Check stdin",
        "findom check query.json --output json   # Machine-readable report",
    ],
}];

#[derive(Args)]
pub struct CheckArgs {
    /// JSON file to read (stdin when omitted)
    pub file: Option<PathBuf>,
}

/// Per-key result of the shape check
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub field: String,
    pub shape: &'static str,
    pub recognized: bool,
    pub qualifies: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub find_options: bool,
    pub found: &'static str,
    pub fields: Vec<FieldReport>,
}

impl CheckReport {
    pub fn from_document(document: &Value) -> Self {
        let fields = document
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(field, value)| FieldReport {
                        field: field.clone(),
                        shape: json_type_name(value),
                        recognized: FIND_OPTIONS_FIELDS.contains(&field.as_str()),
                        qualifies: field_qualifies(field, value),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            find_options: is_find_options(document),
            found: json_type_name(document),
            fields,
        }
    }
}

impl TableDisplay for CheckReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.table(&["Field", "Shape", "Recognized", "Qualifies"]);
        for field in &self.fields {
            table.add_row(vec![
                Cell::new(&field.field),
                Cell::new(field.shape),
                Cell::new(mark(field.recognized)),
                Cell::new(mark(field.qualifies)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let qualifying: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| field.qualifies)
            .map(|field| field.field.as_str())
            .collect();
        format!("find_options={} qualifying=[{}]", self.find_options, qualifying.join(","))
    }
}

fn mark(flag: bool) -> &'static str {
    if flag { PASS } else { FAIL }
}

pub fn handle_check(args: CheckArgs, output: &OutputManager) -> Result<()> {
    let document = super::read_document(args.file.as_deref())?;
    let report = CheckReport::from_document(&document);

    output.display(&report)?;

    if report.find_options {
        if output.options.output_format == OutputFormat::Table {
            output.success("Input is recognized as find options");
        }
        Ok(())
    } else {
        output.info("Find options need at least one of: select, where, relations, order, options, lock (object), cache (object, boolean or number), skip or take (number or string)");
        anyhow::bail!("Input ({}) is not recognized as find options", report.found)
    }
}
