//! Databricks notebook source format
//!
//! A source notebook is plain text. Cells are separated by the
//! [`COMMAND_DELIMITER`] line, the file usually opens with [`SOURCE_HEADER`],
//! and non-Python cells are written as comments behind a `# MAGIC` prefix:
//!
//! ```text
//! # Databricks notebook source
//!
//! # MAGIC %md
//! # MAGIC # Title
//!
//! # COMMAND ----------
//!
//! print("hello")
//! ```

use crate::ipynb::{Cell, CellType, Notebook, ParsedNotebook};
use std::borrow::Cow;

/// Header line of an exported source notebook
pub const SOURCE_HEADER: &str = "# Databricks notebook source";
/// Line separating two cells
pub const COMMAND_DELIMITER: &str = "# COMMAND ----------";
/// First line of a markdown cell
pub const MARKDOWN_MAGIC: &str = "# MAGIC %md";
/// First line of a SQL cell
pub const SQL_MAGIC: &str = "# MAGIC %sql";
/// Prefix of every line inside a magic cell
pub const MAGIC_PREFIX: &str = "# MAGIC ";
/// Cell magic that marks SQL content in a Jupyter code cell
pub const SQL_CELL_MAGIC: &str = "%%sql";

/// Kind of a source segment, decided by its first line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// `# MAGIC %md` segment
    Markdown,
    /// `# MAGIC %sql` segment, carried as a `%%sql` code cell
    Sql,
    /// Plain Python
    #[default]
    Code,
}

impl SegmentKind {
    /// Classify trimmed segment text
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.starts_with(MARKDOWN_MAGIC) {
            Self::Markdown
        } else if text.starts_with(SQL_MAGIC) {
            Self::Sql
        } else {
            Self::Code
        }
    }
}

impl std::fmt::Display for SegmentKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Markdown => "markdown",
            Self::Sql => "sql",
            Self::Code => "code",
        };
        write!(f, "{s}")
    }
}

/// Non-empty, trimmed text between two delimiters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment<'a> {
    /// Classified kind
    pub kind: SegmentKind,
    /// Trimmed segment text, owned only when the header had to be removed
    pub text: Cow<'a, str>,
}

impl<'a> Segment<'a> {
    /// Classify a trimmed, non-empty piece of text
    #[must_use]
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        let text = text.into();
        Self {
            kind: SegmentKind::classify(&text),
            text,
        }
    }

    /// Convert the segment into a structured cell
    #[must_use]
    pub fn into_cell(self) -> Cell {
        let lines = self.text.split('\n');
        match self.kind {
            SegmentKind::Markdown => Cell::markdown(
                lines
                    .filter(|line| !line.starts_with(MARKDOWN_MAGIC))
                    .map(strip_magic_prefix)
                    .collect(),
            ),
            SegmentKind::Sql => Cell::code(
                lines
                    .map(|line| {
                        if line.starts_with(SQL_MAGIC) {
                            SQL_CELL_MAGIC.to_string()
                        } else {
                            strip_magic_prefix(line)
                        }
                    })
                    .collect(),
            ),
            SegmentKind::Code => Cell::code(lines.map(String::from).collect()),
        }
    }
}

fn strip_magic_prefix(line: &str) -> String {
    line.strip_prefix(MAGIC_PREFIX).unwrap_or(line).to_string()
}

/// Split source text into classified segments
///
/// The delimiter text is dropped. Every header occurrence in the first piece
/// is removed; only the first piece is searched. Pieces that are empty after
/// trimming never become segments.
#[must_use]
pub fn split_segments(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();

    for (index, piece) in content.split(COMMAND_DELIMITER).enumerate() {
        let text: Cow<'_, str> = if index == 0 && piece.contains(SOURCE_HEADER) {
            Cow::Owned(piece.replace(SOURCE_HEADER, "").trim().to_string())
        } else {
            Cow::Borrowed(piece.trim())
        };
        if text.is_empty() {
            continue;
        }

        let segment = Segment::new(text);
        log::debug!(
            "segment {}: {} ({} bytes)",
            segments.len(),
            segment.kind,
            segment.text.len()
        );
        segments.push(segment);
    }

    segments
}

/// Parse source text into a structured notebook named `notebook_name`
#[must_use]
pub fn parse_source(content: &str, notebook_name: &str) -> Notebook {
    let cells = split_segments(content)
        .into_iter()
        .map(Segment::into_cell)
        .collect();
    Notebook::new(notebook_name, cells)
}

/// Render a parsed notebook as source text
///
/// The header and a blank line always come first. Each cell after the first
/// is preceded by the delimiter and a blank line. Cells that are neither
/// code nor markdown keep their delimiter but contribute no text.
#[must_use]
pub fn render_source(notebook: &ParsedNotebook) -> String {
    let mut lines: Vec<String> = vec![SOURCE_HEADER.to_string(), String::new()];

    for (index, cell) in notebook.cells.iter().enumerate() {
        if index > 0 {
            lines.push(COMMAND_DELIMITER.to_string());
            lines.push(String::new());
        }

        match cell.cell_type {
            CellType::Markdown => {
                lines.push(MARKDOWN_MAGIC.to_string());
                lines.extend(
                    cell.source
                        .split('\n')
                        .map(|line| format!("{MAGIC_PREFIX}{line}")),
                );
            }
            CellType::Code => lines.push(cell.source.clone()),
            CellType::Raw => log::debug!("cell {index}: raw cell rendered empty"),
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipynb::NotebookCell;

    fn lines(cell: &Cell) -> Vec<&str> {
        cell.source().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_markdown_cell() {
        let nb = parse_source(
            "# Databricks notebook source\n\n# MAGIC %md\n# MAGIC # Title\n# MAGIC Some text",
            "n",
        );
        assert_eq!(nb.cells.len(), 1);
        assert_eq!(nb.cells[0].cell_type(), CellType::Markdown);
        assert_eq!(lines(&nb.cells[0]), ["# Title", "Some text"]);
    }

    #[test]
    fn test_sql_cell() {
        let nb = parse_source("# MAGIC %sql\n# MAGIC SELECT 1", "n");
        assert_eq!(nb.cells.len(), 1);
        assert_eq!(nb.cells[0].cell_type(), CellType::Code);
        assert_eq!(lines(&nb.cells[0]), ["%%sql", "SELECT 1"]);
    }

    #[test]
    fn test_repeated_marker_lines() {
        let nb = parse_source("# MAGIC %sql\n# MAGIC SELECT 1\n# MAGIC %sql", "n");
        assert_eq!(lines(&nb.cells[0]), ["%%sql", "SELECT 1", "%%sql"]);

        let nb = parse_source("# MAGIC %md\n# MAGIC Title\n# MAGIC %md\n# MAGIC body", "n");
        assert_eq!(lines(&nb.cells[0]), ["Title", "body"]);
    }

    #[test]
    fn test_two_code_cells() {
        let nb = parse_source(
            "# Databricks notebook source\n\nprint(1)\n\n# COMMAND ----------\n\nprint(2)",
            "n",
        );
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(lines(&nb.cells[0]), ["print(1)"]);
        assert_eq!(lines(&nb.cells[1]), ["print(2)"]);
        assert!(nb.cells.iter().all(|c| c.cell_type() == CellType::Code));
    }

    #[test]
    fn test_header_only_has_no_cells() {
        assert!(parse_source("# Databricks notebook source", "n").cells.is_empty());
        assert!(parse_source("# Databricks notebook source\n\n", "n").cells.is_empty());
        assert!(parse_source(
            "# Databricks notebook source\n\n# COMMAND ----------\n\n",
            "n"
        )
        .cells
        .is_empty());
    }

    #[test]
    fn test_empty_segments_dropped() {
        let nb = parse_source(
            "a = 1\n# COMMAND ----------\n   \n# COMMAND ----------\nb = 2",
            "n",
        );
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(lines(&nb.cells[1]), ["b = 2"]);
    }

    #[test]
    fn test_header_removed_anywhere_in_first_segment() {
        let nb = parse_source("x = 1\n# Databricks notebook source\ny = 2", "n");
        assert_eq!(lines(&nb.cells[0]), ["x = 1", "", "y = 2"]);
    }

    #[test]
    fn test_unprefixed_lines_kept_verbatim() {
        let nb = parse_source("# MAGIC %md\n# MAGIC Title\nplain\n# MAGIC", "n");
        assert_eq!(lines(&nb.cells[0]), ["Title", "plain", "# MAGIC"]);
    }

    #[test]
    fn test_markdown_sandbox_is_markdown() {
        assert_eq!(
            SegmentKind::classify("# MAGIC %md-sandbox\n# MAGIC <b>x</b>"),
            SegmentKind::Markdown
        );
    }

    #[test]
    fn test_magic_not_on_first_line_is_code() {
        let nb = parse_source("x = 1\n# MAGIC %md\n# MAGIC text", "n");
        assert_eq!(nb.cells[0].cell_type(), CellType::Code);
        assert_eq!(lines(&nb.cells[0]), ["x = 1", "# MAGIC %md", "# MAGIC text"]);
    }

    #[test]
    fn test_code_cell_keeps_inner_blank_lines() {
        let nb = parse_source("\n\ndef f():\n\n    return 1\n\n", "n");
        assert_eq!(lines(&nb.cells[0]), ["def f():", "", "    return 1"]);
    }

    #[test]
    fn test_notebook_name_in_metadata() {
        let nb = parse_source("x", "etl_job");
        assert_eq!(nb.metadata.databricks.notebook_name, "etl_job");
    }

    #[test]
    fn test_segment_kinds() {
        let kinds: Vec<SegmentKind> = split_segments(
            "# Databricks notebook source\n# MAGIC %md\n# MAGIC a\n\
             # COMMAND ----------\n# MAGIC %sql\n# MAGIC SELECT 1\n\
             # COMMAND ----------\nx = 1",
        )
        .iter()
        .map(|s| s.kind)
        .collect();
        assert_eq!(
            kinds,
            [SegmentKind::Markdown, SegmentKind::Sql, SegmentKind::Code]
        );
    }

    #[test]
    fn test_render_markdown_and_code() {
        let nb = ParsedNotebook {
            cells: vec![
                NotebookCell {
                    cell_type: CellType::Markdown,
                    source: "Hello".to_string(),
                },
                NotebookCell {
                    cell_type: CellType::Code,
                    source: "x = 1".to_string(),
                },
            ],
        };
        assert_eq!(
            render_source(&nb),
            "# Databricks notebook source\n\n# MAGIC %md\n# MAGIC Hello\n# COMMAND ----------\n\nx = 1"
        );
    }

    #[test]
    fn test_render_empty_notebook() {
        assert_eq!(
            render_source(&ParsedNotebook::default()),
            "# Databricks notebook source\n"
        );
    }

    #[test]
    fn test_render_multiline_markdown() {
        let nb = ParsedNotebook {
            cells: vec![NotebookCell {
                cell_type: CellType::Markdown,
                source: "# Title\nbody\n".to_string(),
            }],
        };
        assert_eq!(
            render_source(&nb),
            "# Databricks notebook source\n\n# MAGIC %md\n# MAGIC # Title\n# MAGIC body\n# MAGIC "
        );
    }

    #[test]
    fn test_render_raw_cell_keeps_delimiter_only() {
        let nb = ParsedNotebook {
            cells: vec![
                NotebookCell {
                    cell_type: CellType::Code,
                    source: "a".to_string(),
                },
                NotebookCell {
                    cell_type: CellType::Raw,
                    source: "ignored".to_string(),
                },
            ],
        };
        let text = render_source(&nb);
        assert_eq!(text, "# Databricks notebook source\n\na\n# COMMAND ----------\n");
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn test_sql_cell_comes_back_as_code() {
        let nb = parse_source("# MAGIC %sql\n# MAGIC SELECT 1", "n");
        let text = render_source(&ParsedNotebook::from(&nb));
        assert_eq!(text, "# Databricks notebook source\n\n%%sqlSELECT 1");
        assert!(!text.contains(SQL_MAGIC));
    }

    #[test]
    fn test_single_line_cells_round_trip() {
        let original =
            "# Databricks notebook source\n\n# MAGIC %md\n# MAGIC Hello\n# COMMAND ----------\n\nx = 1";
        let nb = parse_source(original, "n");
        assert_eq!(render_source(&ParsedNotebook::from(&nb)), original);
    }
}
