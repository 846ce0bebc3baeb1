//! Error types for OBJ to GLB conversion
//!
//! This module provides the error taxonomy of the conversion pipeline. All
//! user-visible errors carry an error code for categorization.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: Source reading and output I/O errors
//! - **E2xxx**: Container encoding errors
//! - **E3xxx**: Export tier errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: Source geometry file cannot be read
//! - `E1002`: I/O error while committing output
//! - `E2001`: Scene contains nothing to encode
//! - `E2002`: Triangle references a vertex that does not exist
//! - `E2003`: Vertex coordinate is NaN or infinite
//! - `E2004`: Per-triangle color count does not match triangle count
//! - `E2005`: Binary buffer exceeds 32-bit addressing
//! - `E2006`: Scene document cannot be serialized
//! - `E3001`: A single export tier failed
//! - `E3002`: Every export tier failed
//!
//! Line-level problems in the source are not errors at all. They are reported
//! as [`GeometryWarning`] values and the offending line or face is skipped.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::converter::Tier;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by the conversion entry points
#[derive(Error, Debug)]
pub enum Error {
    /// The source geometry could not be read
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No export tier produced an output file
    #[error(transparent)]
    Export(#[from] ExportError),

    /// I/O error outside of source reading
    ///
    /// **Error Code**: E1002
    #[error("[E1002] I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Fatal failures while reading source geometry
#[derive(Error, Debug)]
pub enum ParseError {
    /// The source cannot be opened or read at all
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    /// - Read failure part way through the stream
    #[error("[E1001] Cannot read geometry source '{}': {source}", .path.display())]
    Unreadable {
        /// Path (or pseudo-path for in-memory readers) of the source
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    /// Create an `Unreadable` error for the given source
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ParseError::Unreadable {
            path: path.into(),
            source,
        }
    }
}

/// Recoverable problems found while parsing
///
/// Warnings never stop parsing. They are collected on the parse result so
/// callers can report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryWarning {
    /// A directive line could not be interpreted and was skipped
    MalformedLine {
        /// 1-based source line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A face kept fewer than 3 vertex references after filtering and was dropped
    DegenerateFace {
        /// 1-based source line number
        line: usize,
        /// Number of references that survived filtering
        valid_indices: usize,
    },
}

impl GeometryWarning {
    /// Source line the warning refers to
    pub fn line(&self) -> usize {
        match self {
            GeometryWarning::MalformedLine { line, .. }
            | GeometryWarning::DegenerateFace { line, .. } => *line,
        }
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::MalformedLine { line, reason } => {
                write!(f, "line {}: malformed directive skipped: {}", line, reason)
            }
            GeometryWarning::DegenerateFace {
                line,
                valid_indices,
            } => write!(
                f,
                "line {}: face dropped, only {} valid vertex reference(s)",
                line, valid_indices
            ),
        }
    }
}

/// Failures raised by the container encoder
///
/// An encoder failure fails the export tier that hit it; the controller then
/// escalates to the next tier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Nothing to encode
    ///
    /// **Error Code**: E2001
    #[error("[E2001] Scene has no encodable geometry: {0}")]
    EmptyScene(String),

    /// A triangle references a vertex outside its mesh
    ///
    /// **Error Code**: E2002
    #[error("[E2002] Mesh '{mesh}' triangle {triangle} references vertex {index}, but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Mesh label
        mesh: String,
        /// Triangle position within the mesh
        triangle: usize,
        /// Offending vertex index
        index: usize,
        /// Vertex count of the mesh
        vertex_count: usize,
    },

    /// A coordinate is NaN or infinite
    ///
    /// **Error Code**: E2003
    #[error("[E2003] Mesh '{mesh}' vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Mesh label
        mesh: String,
        /// Offending vertex index
        vertex: usize,
    },

    /// Per-triangle color array does not line up with the triangles
    ///
    /// **Error Code**: E2004
    #[error("[E2004] Mesh '{mesh}' has {colors} triangle colors for {triangles} triangles")]
    ColorCountMismatch {
        /// Mesh label
        mesh: String,
        /// Number of colors supplied
        colors: usize,
        /// Number of triangles
        triangles: usize,
    },

    /// Buffer or element count exceeds 32-bit addressing
    ///
    /// **Error Code**: E2005
    #[error("[E2005] Binary buffer too large: {0}")]
    BufferTooLarge(String),

    /// JSON document could not be serialized
    ///
    /// **Error Code**: E2006
    #[error("[E2006] Failed to serialize scene document: {0}")]
    Document(String),
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Document(err.to_string())
    }
}

/// Export tier failures
#[derive(Error, Debug)]
pub enum ExportError {
    /// One tier could not produce valid output
    ///
    /// **Error Code**: E3001
    ///
    /// Recovered by escalating to the next tier.
    #[error("[E3001] Export tier '{tier}' failed: {reason}")]
    TierFailed {
        /// Tier that failed
        tier: Tier,
        /// Why it failed
        reason: String,
    },

    /// All tiers failed
    ///
    /// **Error Code**: E3002
    ///
    /// **Suggestions**:
    /// - Check the parse warnings; the source may contain no usable faces
    /// - Verify the output directory exists and is writable
    #[error("[E3002] All export tiers failed ({} attempted){}", .attempts.len(), summarize(.attempts))]
    Exhausted {
        /// Per-tier failures in the order they were attempted
        attempts: Vec<ExportError>,
    },
}

impl ExportError {
    /// Create a `TierFailed` error
    pub fn tier_failed(tier: Tier, reason: impl fmt::Display) -> Self {
        ExportError::TierFailed {
            tier,
            reason: reason.to_string(),
        }
    }

    /// Tier this error belongs to, if it is a single-tier failure
    pub fn tier(&self) -> Option<Tier> {
        match self {
            ExportError::TierFailed { tier, .. } => Some(*tier),
            ExportError::Exhausted { .. } => None,
        }
    }
}

fn summarize(attempts: &[ExportError]) -> String {
    attempts
        .iter()
        .map(|attempt| format!("\n  - {}", attempt))
        .collect()
}
