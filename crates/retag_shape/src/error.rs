use alloc::string::String;

use retag_tag::TagError;
use thiserror::Error;

use crate::TypePath;

/// Errors returned by the tag transformer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransformError {
    /// The mutator failed on a field.
    #[error("cannot rewrite the tag of field `{field}` in `{ty}`: {source}")]
    Tag {
        ty: TypePath,
        field: String,
        source: TagError,
    },

    /// A struct contains itself through its fields.
    #[error("cyclic type: `{path}` is reached again while being rewritten")]
    CyclicType { path: TypePath },
}

impl TransformError {
    /// Returns the underlying tag error, if any.
    pub fn tag_error(&self) -> Option<&TagError> {
        match self {
            Self::Tag { source, .. } => Some(source),
            Self::CyclicType { .. } => None,
        }
    }
}
