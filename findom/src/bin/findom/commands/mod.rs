pub mod check;
pub mod normalize;

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Read a JSON document from `path`, or from stdin when no path is given
pub fn read_document(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    parse_document(&content)
}

pub fn parse_document(content: &str) -> Result<Value> {
    serde_json::from_str(content).context("Input is not valid JSON")
}

/// Render a JSON value on one line for table cells
pub fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "take": 1 }"#).unwrap();
        assert_eq!(read_document(Some(path.as_path())).unwrap(), json!({ "take": 1 }));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_document("{ take: 1").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
