//! File-level conversions between the two notebook formats
//!
//! Each conversion reads the whole input, converts in memory, and performs at
//! most one write. Nothing is written if reading or parsing fails.

use crate::error::{NotebookError, Result};
use crate::ipynb::{parse_notebook, Notebook};
use crate::source::{parse_source, render_source};
use std::fs;
use std::path::{Path, PathBuf};

/// Default JSON indentation width for written notebooks
pub const DEFAULT_INDENT: usize = 2;

/// Notebook name used when the input path has no usable file stem
const UNTITLED: &str = "Untitled";

/// Output settings shared by both conversion directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConvertOptions {
    /// Spaces per indentation level in written ipynb JSON
    pub indent: usize,
    /// Append a final newline to written source notebooks
    pub trailing_newline: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            trailing_newline: false,
        }
    }
}

/// Result of a conversion: the written path, or the converted value when no
/// destination was given
#[derive(Debug, Clone, PartialEq)]
pub enum Converted<T> {
    /// The result was written to this path
    Written(PathBuf),
    /// The result, kept in memory
    InMemory(T),
}

impl<T> Converted<T> {
    /// Path the result was written to, if any
    #[must_use]
    pub fn written_path(&self) -> Option<&Path> {
        match self {
            Self::Written(path) => Some(path),
            Self::InMemory(_) => None,
        }
    }

    /// The in-memory result, if no destination was given
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Written(_) => None,
            Self::InMemory(value) => Some(value),
        }
    }
}

/// Convert a Databricks source notebook into a Jupyter notebook
///
/// The notebook name in the metadata is the file stem of `input`.
///
/// # Errors
///
/// Returns an error if `input` cannot be read or `output` cannot be written.
pub fn source_to_ipynb(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<Converted<Notebook>> {
    let content = read_text(input)?;
    let name = input
        .file_stem()
        .map_or_else(|| UNTITLED.to_string(), |s| s.to_string_lossy().into_owned());

    let notebook = parse_source(&content, &name);
    log::debug!(
        "{}: {} cells from source notebook",
        input.display(),
        notebook.cells.len()
    );

    match output {
        Some(path) => {
            let json = notebook.to_json(options.indent)?;
            write_text(path, &json)?;
            Ok(Converted::Written(path.to_path_buf()))
        }
        None => Ok(Converted::InMemory(notebook)),
    }
}

/// Convert a Jupyter notebook into a Databricks source notebook
///
/// # Errors
///
/// Returns an error if `input` cannot be read, is not valid notebook JSON, or
/// `output` cannot be written.
pub fn ipynb_to_source(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<Converted<String>> {
    let notebook = parse_notebook(input)?;
    log::debug!(
        "{}: {} cells from ipynb notebook",
        input.display(),
        notebook.cells.len()
    );

    let text = render_source(&notebook);

    match output {
        Some(path) => {
            if options.trailing_newline {
                write_text(path, &format!("{text}\n"))?;
            } else {
                write_text(path, &text)?;
            }
            Ok(Converted::Written(path.to_path_buf()))
        }
        None => Ok(Converted::InMemory(text)),
    }
}

/// Read a text file with universal newlines
fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| NotebookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.contains('\r') {
        Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(content)
    }
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| NotebookError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
