//! Error types for capture, restore and persistence.

use thiserror::Error;

/// The category of a [`PersistError`], for callers that branch on failure
/// class rather than on the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullTarget,
    EmptyPayload,
    EmptyInput,
    Underrun,
    InvalidProxy,
    ClassNotFound,
    SpawnFailed,
    NotCompressed,
    UnserializableField,
    UnresolvedReference,
    Corrupt,
    DiskReadFailure,
    DiskWriteFailure,
    Config,
}

/// Errors returned by every public save/load operation.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The target object is missing or already destroyed.
    #[error("target '{target}' is null or destroyed")]
    NullTarget { target: String },

    /// A container holds no field bytes.
    #[error("no serialized data to apply to '{target}'")]
    EmptyPayload { target: String },

    /// The object list handed to the sequencer is empty.
    #[error("object list is empty")]
    EmptyInput,

    /// A read needed more bytes than the buffer had left.
    #[error("buffer underrun reading {what}: needed {needed} bytes, {remaining} remaining")]
    Underrun {
        what: String,
        needed: usize,
        remaining: usize,
    },

    /// An actor proxy is missing its class path or its field data.
    #[error("invalid actor proxy: {reason}")]
    InvalidProxy { reason: String },

    /// Neither the class registry nor the class loader knows the type path.
    #[error("actor class '{class}' not found")]
    ClassNotFound { class: String },

    /// The world refused to instantiate an actor.
    #[error("failed to spawn actor '{name}' of class '{class}'")]
    SpawnFailed { class: String, name: String },

    /// The bytes are not a zlib stream, or the stream is damaged.
    #[error("data is not a valid compressed stream: {reason}")]
    NotCompressed { reason: String },

    /// A field value has no representation in the byte stream.
    #[error("field '{field}' cannot be serialized: {reason}")]
    UnserializableField { field: String, reason: String },

    /// A stored object reference names no object in the current table.
    #[error("reference to {type_path} '{name}' does not resolve")]
    UnresolvedReference { type_path: String, name: String },

    /// The bytes decode to an impossible value.
    #[error("corrupt data in {what}: {reason}")]
    Corrupt { what: String, reason: String },

    #[error("failed to read '{path}': {reason}")]
    DiskReadFailure { path: String, reason: String },

    #[error("failed to write '{path}': {reason}")]
    DiskWriteFailure { path: String, reason: String },

    /// The save configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PersistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullTarget { .. } => ErrorKind::NullTarget,
            Self::EmptyPayload { .. } => ErrorKind::EmptyPayload,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::Underrun { .. } => ErrorKind::Underrun,
            Self::InvalidProxy { .. } => ErrorKind::InvalidProxy,
            Self::ClassNotFound { .. } => ErrorKind::ClassNotFound,
            Self::SpawnFailed { .. } => ErrorKind::SpawnFailed,
            Self::NotCompressed { .. } => ErrorKind::NotCompressed,
            Self::UnserializableField { .. } => ErrorKind::UnserializableField,
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::Corrupt { .. } => ErrorKind::Corrupt,
            Self::DiskReadFailure { .. } => ErrorKind::DiskReadFailure,
            Self::DiskWriteFailure { .. } => ErrorKind::DiskWriteFailure,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Qualify a decode or encode failure with the field it happened in.
    ///
    /// Other variants pass through unchanged.
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            Self::Underrun {
                what,
                needed,
                remaining,
            } => Self::Underrun {
                what: format!("{field}: {what}"),
                needed,
                remaining,
            },
            Self::Corrupt { what, reason } => Self::Corrupt {
                what: format!("{field}: {what}"),
                reason,
            },
            Self::UnserializableField { field: inner, reason } if inner.is_empty() => {
                Self::UnserializableField {
                    field: field.to_owned(),
                    reason,
                }
            }
            Self::UnserializableField { field: inner, reason } => Self::UnserializableField {
                field: format!("{field}.{inner}"),
                reason,
            },
            other => other,
        }
    }
}

/// Result type for save/load operations.
pub type PersistResult<T> = Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(PersistError::EmptyInput.kind(), ErrorKind::EmptyInput);
        let err = PersistError::ClassNotFound {
            class: "game::Door".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ClassNotFound);
        assert_eq!(err.to_string(), "actor class 'game::Door' not found");
    }

    #[test]
    fn in_field_prefixes_underrun_only() {
        let err = PersistError::Underrun {
            what: "u32".into(),
            needed: 4,
            remaining: 1,
        }
        .in_field("health");
        assert!(err.to_string().contains("health: u32"));

        let untouched = PersistError::EmptyInput.in_field("health");
        assert_eq!(untouched.kind(), ErrorKind::EmptyInput);
    }
}
