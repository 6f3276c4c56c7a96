use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::Tone;

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(self);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Print a status line. Only `Pass` goes to stdout; the rest go to stderr so
    /// JSON output stays parseable.
    fn emit(&self, tone: Tone, message: &str) {
        let line = if self.options.no_color {
            format!("{} {message}", tone.glyph())
        } else {
            format!("{} {}", tone.glyph().color(tone.color()), message.color(tone.color()))
        };
        match tone {
            Tone::Pass => println!("{line}"),
            _ => eprintln!("{line}"),
        }
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            self.emit(Tone::Pass, message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        self.emit(Tone::Fail, message);
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            self.emit(Tone::Notice, message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            self.emit(Tone::Note, message);
        }
    }

    /// Only shown with `--verbose`
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            self.emit(Tone::Detail, message);
        }
    }

    /// Table with a bold header row; plain ASCII borders under `--no-color`
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color { ASCII_FULL } else { UTF8_FULL_CONDENSED });
        table.set_header(headers.iter().map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if self.options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        }));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    impl TableDisplay for TestData {
        fn to_table(&self, output: &OutputManager) -> Table {
            let mut table = output.table(&["Name", "Value"]);
            table.add_row(vec![Cell::new(&self.name), Cell::new(self.value.to_string())]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{}={}", self.name, self.value)
        }
    }

    fn data() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_output_manager_json() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        assert!(manager.display(&data()).is_ok());
    }

    #[test]
    fn test_output_manager_quiet() {
        let manager = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        assert!(manager.display(&data()).is_ok());
    }

    #[test]
    fn test_table_has_header_and_row() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        let rendered = data().to_table(&manager).to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("42"));
    }
}
