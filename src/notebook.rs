//! Notebook loading.
//!
//! Only the parts of the notebook format that matter for exporting are read:
//! the ordered `cells` array and, per cell, its `cell_type` and `source`.
//! Everything else (outputs, metadata, execution counts) is ignored.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// One notebook cell, reduced to its type and source lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(deserialize_with = "deserialize_source")]
    pub source: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
}

/// Notebooks store `source` either as a list of lines or as one string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Lines(Vec<String>),
    Text(String),
}

fn deserialize_source<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match RawSource::deserialize(deserializer)? {
        RawSource::Lines(lines) => lines,
        RawSource::Text(text) => text.split_inclusive('\n').map(str::to_owned).collect(),
    })
}

impl Cell {
    /// Builds a code cell from its source lines.
    pub fn code<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cell_type: "code".to_string(),
            source: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_code(&self) -> bool {
        self.cell_type == "code"
    }

    pub fn first_line(&self) -> Option<&str> {
        self.source.first().map(String::as_str)
    }

    /// Lines after the first one.
    pub fn body(&self) -> &[String] {
        self.source.get(1..).unwrap_or(&[])
    }

    /// The whole cell as a single string.
    pub fn text(&self) -> String {
        self.source.concat()
    }
}

/// Parses notebook JSON and returns its non-empty code cells in order.
pub fn parse_notebook(json: &str) -> Result<Vec<Cell>> {
    let notebook: Notebook =
        serde_json::from_str(json).context("Failed to parse notebook JSON")?;

    let total = notebook.cells.len();
    let cells: Vec<Cell> = notebook
        .cells
        .into_iter()
        .filter(|cell| cell.is_code() && !cell.source.is_empty())
        .collect();

    debug!("Kept {} of {} cells", cells.len(), total);
    Ok(cells)
}

/// Reads a notebook from disk and returns its non-empty code cells in order.
pub async fn load_notebook(path: &Path) -> Result<Vec<Cell>> {
    let json = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read notebook: {}", path.display()))?;

    parse_notebook(&json).with_context(|| format!("Invalid notebook: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_non_empty_code_cells() {
        let json = r##"{
            "cells": [
                {"cell_type": "markdown", "source": ["# Title\n"]},
                {"cell_type": "code", "source": ["x = 1\n"], "outputs": [], "execution_count": 3},
                {"cell_type": "code", "source": []},
                {"cell_type": "raw", "source": ["raw\n"]},
                {"cell_type": "code", "source": ["def f():\n", "    pass\n"]}
            ],
            "metadata": {},
            "nbformat": 4
        }"##;

        let cells = parse_notebook(json).unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::code(["x = 1\n"]),
                Cell::code(["def f():\n", "    pass\n"]),
            ]
        );
    }

    #[test]
    fn splits_string_source_into_lines() {
        let json = r#"{"cells": [{"cell_type": "code", "source": "a = 1\nb = 2"}]}"#;
        let cells = parse_notebook(json).unwrap();
        assert_eq!(cells[0].source, vec!["a = 1\n", "b = 2"]);
    }

    #[test]
    fn empty_string_source_is_dropped() {
        let json = r#"{"cells": [{"cell_type": "code", "source": ""}]}"#;
        assert!(parse_notebook(json).unwrap().is_empty());
    }

    #[test]
    fn missing_cells_key_is_an_error() {
        assert!(parse_notebook(r#"{"metadata": {}}"#).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_notebook("{not json").is_err());
    }

    #[test]
    fn cell_accessors() {
        let cell = Cell::code(["# PORT a.py\n", "x = 1\n", "y = 2\n"]);
        assert_eq!(cell.first_line(), Some("# PORT a.py\n"));
        assert_eq!(cell.body(), ["x = 1\n", "y = 2\n"]);
        assert_eq!(cell.text(), "# PORT a.py\nx = 1\ny = 2\n");

        let single = Cell::code(["x = 1\n"]);
        assert!(single.body().is_empty());
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = load_notebook(Path::new("does/not/exist.ipynb"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.ipynb"));
    }
}
