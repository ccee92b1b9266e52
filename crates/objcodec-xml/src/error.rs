//! Error types for the XML object codec.
//!
//! Only structural mapping failures reported by the serde engine are wrapped
//! into [`SerializationError`]. Malformed documents and I/O failures keep their
//! own variants so infrastructure problems are never disguised as mapping
//! problems.

use std::fmt;
use std::io;

/// Direction of the failed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rust value to XML.
    Serialize,
    /// XML to Rust value.
    Deserialize,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize => f.write_str("serialize"),
            Self::Deserialize => f.write_str("deserialize"),
        }
    }
}

/// The engine failure behind a [`SerializationError`].
#[derive(Debug, thiserror::Error)]
pub enum MappingFailure {
    /// The value's shape cannot be represented as XML.
    #[error(transparent)]
    Serialize(#[from] quick_xml::se::SeError),

    /// The document does not match the requested type.
    #[error(transparent)]
    Deserialize(#[from] quick_xml::de::DeError),
}

/// Structural mapping between a Rust type and XML failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to {direction} type `{type_name}`: {source}")]
pub struct SerializationError {
    type_name: &'static str,
    direction: Direction,
    #[source]
    source: MappingFailure,
}

impl SerializationError {
    pub(crate) fn new(
        type_name: &'static str,
        direction: Direction,
        source: impl Into<MappingFailure>,
    ) -> Self {
        Self {
            type_name,
            direction,
            source: source.into(),
        }
    }

    /// Fully qualified name of the implicated type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the failure happened while writing or reading.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The original engine failure.
    #[must_use]
    pub fn failure(&self) -> &MappingFailure {
        &self.source
    }
}

/// The input is not a well-formed XML document.
#[derive(Debug, thiserror::Error)]
pub enum MalformedXml {
    /// Rejected by the XML reader.
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// The bytes are not valid in the detected encoding.
    #[error("document is not valid {encoding}")]
    Decode {
        /// Encoding the bytes were decoded as.
        encoding: &'static str,
    },

    /// The declaration names an encoding this codec cannot read.
    #[error("unsupported document encoding: {0}")]
    UnsupportedEncoding(String),

    /// The declared encoding differs from the one detected from the bytes.
    #[error("document declares {declared} but is encoded as {detected}")]
    EncodingMismatch {
        /// Label from the XML declaration.
        declared: String,
        /// Encoding detected from the byte order mark.
        detected: &'static str,
    },

    /// A `<!DOCTYPE>` was found while DTD processing is prohibited.
    #[error("DTD is prohibited in this document")]
    DtdProhibited,

    /// No root element was found.
    #[error("document has no root element")]
    MissingRoot,

    /// Content was found after the root element closed.
    #[error("document has more than one root element")]
    MultipleRoots,

    /// Non-whitespace text appears outside the root element.
    #[error("text content outside the root element")]
    StrayText,

    /// The document ended while an element was still open.
    #[error("element `{0}` is not closed")]
    UnclosedElement(String),

    /// The document exceeds the configured size limit.
    #[error("document exceeds the limit of {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Errors returned by the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A required argument is absent or cannot be honoured.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Mapping between the type and XML failed.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The document is not well-formed XML.
    #[error("malformed XML document: {0}")]
    Malformed(#[from] MalformedXml),

    /// Reading from or writing to the stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Malformed(MalformedXml::Syntax(err))
    }
}

/// Convenience result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use serde::ser::Error as _;

    use super::*;

    #[test]
    fn test_should_format_serialization_error_with_type_name() {
        let err = SerializationError::new(
            "my_crate::Person",
            Direction::Serialize,
            quick_xml::se::SeError::custom("boom"),
        );
        let message = err.to_string();
        assert!(message.contains("serialize"));
        assert!(message.contains("`my_crate::Person`"));
        assert!(message.contains("boom"));
        assert_eq!(err.type_name(), "my_crate::Person");
        assert_eq!(err.direction(), Direction::Serialize);
    }

    #[test]
    fn test_should_preserve_engine_cause() {
        let err = SerializationError::new(
            "u32",
            Direction::Deserialize,
            quick_xml::de::DeError::Custom("bad int".to_owned()),
        );
        assert!(matches!(err.failure(), MappingFailure::Deserialize(_)));
        let source = err.source().expect("cause should be preserved");
        assert!(source.to_string().contains("bad int"));
    }

    #[test]
    fn test_should_keep_serialization_error_transparent() {
        let err: CodecError = SerializationError::new(
            "u32",
            Direction::Deserialize,
            quick_xml::de::DeError::Custom("bad int".to_owned()),
        )
        .into();
        assert!(err.to_string().starts_with("failed to deserialize type `u32`"));
    }

    #[test]
    fn test_should_format_invalid_argument() {
        let err = CodecError::invalid_argument("encoding", "must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid argument `encoding`: must not be empty"
        );
    }

    #[test]
    fn test_should_format_malformed_variants() {
        let err: CodecError = MalformedXml::UnclosedElement("Person".to_owned()).into();
        assert_eq!(
            err.to_string(),
            "malformed XML document: element `Person` is not closed"
        );
        let err: CodecError = MalformedXml::TooLarge { limit: 16 }.into();
        assert!(err.to_string().contains("16 bytes"));
    }
}
