//! Error types for layout construction and graph access.

use thiserror::Error;

/// Errors that can occur while building or querying a layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An edge names a node id that is not part of the graph.
    #[error("edge {edge} references unknown node '{id}'")]
    InvalidReference {
        /// Position of the offending edge in the input list
        edge: usize,
        /// The id that could not be resolved
        id: String,
    },

    /// Two nodes share the same id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// The container has a non-positive (or non-finite) size.
    #[error("invalid bounds {width}x{height}: width and height must be positive")]
    InvalidBounds {
        /// Requested container width
        width: f64,
        /// Requested container height
        height: f64,
    },

    /// A layout option is out of range.
    #[error("invalid option: {0}")]
    InvalidOptions(String),

    /// No node with the given id exists.
    #[error("node '{0}' not found")]
    NotFound(String),
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = LayoutError::InvalidReference {
            edge: 3,
            id: "ghost".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"edge 3 references unknown node 'ghost'");

        let err = LayoutError::InvalidBounds {
            width: 0.0,
            height: 300.0,
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid bounds 0x300: width and height must be positive"
        );
    }
}
