//! # nbbridge-notebook
//!
//! Conversion between Databricks notebook source files and Jupyter notebooks.
//!
//! This crate provides:
//! - A segmenter for the comment-delimited source format
//!   (`# COMMAND ----------` separators, `# MAGIC %md` / `# MAGIC %sql` cells)
//! - An nbformat 4.5 writer with a fixed Python metadata envelope
//! - A lenient ipynb reader that keeps only cell kinds and source text
//! - File-level conversions in both directions
//!
//! The two directions are not exact inverses. SQL cells become `%%sql` code
//! cells and come back as plain code, and multi-line sources written by this
//! crate carry no line terminators, so they are concatenated on the way back.
//!
//! ## Example
//!
//! ```
//! use nbbridge_notebook::{parse_source, render_source, CellType, ParsedNotebook};
//!
//! let notebook = parse_source("# MAGIC %md\n# MAGIC # Title", "example");
//! assert_eq!(notebook.cells[0].cell_type(), CellType::Markdown);
//!
//! let text = render_source(&ParsedNotebook::from(&notebook));
//! assert!(text.starts_with("# Databricks notebook source"));
//! ```

/// File-level conversions
pub mod convert;
/// Error types for notebook conversion
pub mod error;
/// Jupyter notebook (ipynb) model, reader and writer
pub mod ipynb;
/// Databricks source notebook segmenter and renderer
pub mod source;

pub use convert::{ipynb_to_source, source_to_ipynb, ConvertOptions, Converted, DEFAULT_INDENT};
pub use error::{NotebookError, Result};
pub use ipynb::{
    parse_notebook, parse_notebook_from_str, Cell, CellType, Notebook, NotebookCell,
    NotebookMetadata, ParsedNotebook,
};
pub use source::{parse_source, render_source, split_segments, Segment, SegmentKind};
