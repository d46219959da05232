//! Jupyter notebook (ipynb) model
//!
//! Two views of the structured format live here:
//! - [`Notebook`] is what the converter writes: nbformat 4.5 with a fixed
//!   Python/Databricks metadata envelope and output-free cells.
//! - [`ParsedNotebook`] is what the converter reads: only the cell kinds and
//!   their joined source text, tolerant of the shapes real notebooks use.

use crate::error::{NotebookError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Major nbformat version written by the converter
pub const NBFORMAT: u32 = 4;
/// Minor nbformat version written by the converter
pub const NBFORMAT_MINOR: u32 = 5;

/// Structured notebook document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Ordered cells
    pub cells: Vec<Cell>,
    /// Notebook-level metadata envelope
    pub metadata: NotebookMetadata,
    /// Major format version
    pub nbformat: u32,
    /// Minor format version
    pub nbformat_minor: u32,
}

impl Notebook {
    /// Create a notebook with the standard metadata envelope
    #[must_use]
    pub fn new(notebook_name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: NotebookMetadata::python(notebook_name),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Serialize as indented JSON using `indent` spaces per level
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, indent: usize) -> Result<String> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf)
            .map_err(|e| NotebookError::Json(serde::ser::Error::custom(e)))
    }
}

/// A single structured cell, tagged by `cell_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Markdown documentation cell
    Markdown {
        /// Per-cell metadata (always empty when written)
        metadata: Map<String, Value>,
        /// Text lines without terminators
        source: Vec<String>,
    },
    /// Code cell, never executed
    Code {
        /// Always `None` (serialized as `null`)
        execution_count: Option<i32>,
        /// Per-cell metadata (always empty when written)
        metadata: Map<String, Value>,
        /// Source lines without terminators
        source: Vec<String>,
        /// Always empty
        outputs: Vec<Value>,
    },
}

impl Cell {
    /// Create a markdown cell
    #[must_use]
    pub fn markdown(source: Vec<String>) -> Self {
        Self::Markdown {
            metadata: Map::new(),
            source,
        }
    }

    /// Create an unexecuted code cell with no outputs
    #[must_use]
    pub fn code(source: Vec<String>) -> Self {
        Self::Code {
            execution_count: None,
            metadata: Map::new(),
            source,
            outputs: Vec::new(),
        }
    }

    /// Kind of this cell
    #[inline]
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        match self {
            Self::Markdown { .. } => CellType::Markdown,
            Self::Code { .. } => CellType::Code,
        }
    }

    /// Source lines of this cell
    #[inline]
    #[must_use]
    pub fn source(&self) -> &[String] {
        match self {
            Self::Markdown { source, .. } | Self::Code { source, .. } => source,
        }
    }
}

/// Notebook metadata envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Databricks import metadata
    #[serde(rename = "application/vnd.databricks.v1+notebook")]
    pub databricks: DatabricksMetadata,
    /// Kernel identity
    pub kernelspec: KernelSpec,
    /// Display language information
    pub language_info: LanguageInfo,
}

impl NotebookMetadata {
    /// The fixed Python 3 envelope, carrying only the notebook name
    #[must_use]
    pub fn python(notebook_name: impl Into<String>) -> Self {
        Self {
            databricks: DatabricksMetadata {
                notebook_name: notebook_name.into(),
                dashboards: Vec::new(),
                notebook_metadata: DatabricksNotebookSettings {
                    python_indent_unit: 4,
                },
                language: "python".to_string(),
                widgets: Map::new(),
                notebook_orig_id: 0,
            },
            kernelspec: KernelSpec {
                display_name: "Python 3".to_string(),
                language: "python".to_string(),
                name: "python3".to_string(),
            },
            language_info: LanguageInfo {
                codemirror_mode: CodemirrorMode {
                    name: "ipython".to_string(),
                    version: 3,
                },
                file_extension: ".py".to_string(),
                mimetype: "text/x-python".to_string(),
                name: "python".to_string(),
                nbconvert_exporter: "python".to_string(),
                pygments_lexer: "ipython3".to_string(),
                version: "3.8.10".to_string(),
            },
        }
    }
}

/// Databricks-specific notebook metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabricksMetadata {
    /// Notebook name shown in the workspace
    pub notebook_name: String,
    /// Dashboards (always empty)
    pub dashboards: Vec<Value>,
    /// Editor settings
    pub notebook_metadata: DatabricksNotebookSettings,
    /// Default notebook language
    pub language: String,
    /// Widgets (always empty)
    pub widgets: Map<String, Value>,
    /// Original notebook id (always 0)
    #[serde(rename = "notebookOrigID")]
    pub notebook_orig_id: u64,
}

/// Databricks editor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabricksNotebookSettings {
    /// Indentation width for Python cells
    pub python_indent_unit: u32,
}

/// Kernel specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelSpec {
    /// Human readable kernel name
    pub display_name: String,
    /// Kernel language
    pub language: String,
    /// Kernel identifier
    pub name: String,
}

/// Language information for front ends
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Editor highlighting mode
    pub codemirror_mode: CodemirrorMode,
    /// Script file extension
    pub file_extension: String,
    /// Script MIME type
    pub mimetype: String,
    /// Language name
    pub name: String,
    /// nbconvert exporter name
    pub nbconvert_exporter: String,
    /// Pygments lexer name
    pub pygments_lexer: String,
    /// Language version
    pub version: String,
}

/// `CodeMirror` mode descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodemirrorMode {
    /// Mode name
    pub name: String,
    /// Mode version
    pub version: u32,
}

/// Notebook content as read from an arbitrary ipynb file
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParsedNotebook {
    /// List of cells in the notebook
    pub cells: Vec<NotebookCell>,
}

/// Individual notebook cell as read
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NotebookCell {
    /// Type of cell (code, markdown, raw)
    pub cell_type: CellType,
    /// Source lines concatenated with no separator
    pub source: String,
}

/// Type of notebook cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Executable code cell
    #[default]
    Code,
    /// Markdown documentation cell
    Markdown,
    /// Raw cell, or any cell type the converter does not carry
    Raw,
}

impl std::fmt::Display for CellType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "markdown" => Ok(Self::Markdown),
            "raw" => Ok(Self::Raw),
            _ => Err(format!(
                "Unknown cell type '{s}'. Expected: code, markdown, raw"
            )),
        }
    }
}

impl From<&Cell> for NotebookCell {
    fn from(cell: &Cell) -> Self {
        Self {
            cell_type: cell.cell_type(),
            source: cell.source().concat(),
        }
    }
}

impl From<&Notebook> for ParsedNotebook {
    fn from(notebook: &Notebook) -> Self {
        Self {
            cells: notebook.cells.iter().map(NotebookCell::from).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Deserialize)]
struct RawCell {
    #[serde(default)]
    cell_type: Option<String>,
    #[serde(default)]
    source: RawSource,
}

/// nbformat allows `source` as a list of lines or a single string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for RawSource {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text,
        }
    }
}

/// Parse a Jupyter notebook from a file path
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The notebook JSON is malformed
pub fn parse_notebook<P: AsRef<Path>>(path: P) -> Result<ParsedNotebook> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| NotebookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_notebook_from_str(&content)
}

/// Parse a Jupyter notebook from a string
///
/// Missing `cells` means an empty notebook. Cells whose `cell_type` is
/// neither `code` nor `markdown` are kept as [`CellType::Raw`].
///
/// # Errors
///
/// Returns an error if the notebook JSON is malformed.
pub fn parse_notebook_from_str(content: &str) -> Result<ParsedNotebook> {
    let raw: RawNotebook = serde_json::from_str(content)?;

    let cells = raw
        .cells
        .into_iter()
        .map(|cell| {
            let cell_type = match cell.cell_type.as_deref() {
                Some(kind) => kind.parse::<CellType>().unwrap_or_else(|e| {
                    log::warn!("{e}; cell will be left empty");
                    CellType::Raw
                }),
                None => {
                    log::warn!("Cell without cell_type; cell will be left empty");
                    CellType::Raw
                }
            };
            NotebookCell {
                cell_type,
                source: cell.source.into_text(),
            }
        })
        .collect();

    Ok(ParsedNotebook { cells })
}
