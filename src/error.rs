//! Error types for value conversion and schema compilation

use thiserror::Error;

use crate::path::Path;
use crate::wire::WireType;

/// Result type for conversion and compilation operations
pub type Result<T> = std::result::Result<T, AttrError>;

/// Conversion and schema-compilation errors
///
/// Every recursive conversion step wraps child failures with the element
/// index, map key, or attribute name where they occurred, so the `path` on a
/// returned error names the exact location of the failure inside the value
/// tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttrError {
    /// The wire value's declared type is not the type this attribute type
    /// projects to.
    #[error("wire type mismatch at `{path}`: expected {expected}, got {actual}")]
    WireTypeMismatch {
        path: Path,
        expected: WireType,
        actual: WireType,
    },

    /// A composite value's observed member set does not match its declared
    /// type (wrong cardinality, or a missing attribute).
    #[error("schema mismatch at `{path}`: {detail}")]
    SchemaMismatch { path: Path, detail: String },

    /// The schema definition itself is invalid. Compilation stops at the
    /// first definition error; a partially compiled schema is never returned.
    #[error("invalid attribute definition at `{path}`: {reason}")]
    Definition { path: Path, reason: String },

    /// An encoded value failed re-validation against its declared wire type
    /// during emission.
    #[error("validation failed at `{path}`: {detail}")]
    Validation { path: Path, detail: String },

    /// The caller cancelled the operation through its [`Context`].
    ///
    /// [`Context`]: crate::context::Context
    #[error("operation cancelled")]
    Cancelled,
}

impl AttrError {
    /// The location inside the value tree where the error occurred, if the
    /// error carries one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            AttrError::WireTypeMismatch { path, .. }
            | AttrError::SchemaMismatch { path, .. }
            | AttrError::Definition { path, .. }
            | AttrError::Validation { path, .. } => Some(path),
            AttrError::Cancelled => None,
        }
    }
}
