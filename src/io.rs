//! Graph documents and format dispatch
//!
//! A graph document lists the nodes and edges to lay out, plus optional
//! layout options:
//!
//! ```yaml
//! nodes:
//!   - { id: center, type: hub }
//!   - { id: data1, type: data }
//! edges:
//!   - { source: data1, target: center }
//! options:
//!   link_distance: 100
//! ```
//!
//! The format is picked from the file extension: `.json`, `.yaml` or `.yml`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::LayoutOptions;
use crate::graph::{EdgeSpec, NodeSpec};

/// Errors that can occur while reading a graph document
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for document operations
pub type IoResult<T> = Result<T, IoError>;

/// Serialization formats a graph document can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Look up a format by file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Determine the format of `path` from its extension
    pub fn from_path(path: &Path) -> IoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        Self::from_extension(ext).ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }
}

/// Nodes, edges and options of one layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub options: LayoutOptions,
}

impl GraphDocument {
    /// Parse a document from text in the given format
    pub fn parse(text: &str, format: DocumentFormat) -> IoResult<Self> {
        match format {
            DocumentFormat::Json => {
                serde_json::from_str(text).map_err(|e| IoError::Parse(e.to_string()))
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| IoError::Parse(e.to_string()))
            }
        }
    }

    /// Read a document, picking the format from the file extension
    pub fn read(path: &Path) -> IoResult<Self> {
        let format = DocumentFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        let document = Self::parse(&text, format)?;
        debug!(
            path = %path.display(),
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "graph document loaded"
        );
        Ok(document)
    }
}
