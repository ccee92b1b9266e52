//! The XML object codec.
//!
//! [`XmlCodec`] binds serde's derive-generated mapping to `quick-xml`, applies
//! the configured encoding and indentation, and narrows engine failures into
//! [`SerializationError`].

use std::any::type_name;
use std::io::{Read, Write};

use quick_xml::de::DeError;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CodecError, CodecResult, Direction, SerializationError};
use crate::reader::ScopedReader;
use crate::settings::{Encoding, ReaderSettings, WriterSettings};
use crate::writer::{self, ScopedWriter};

/// Object serializer that writes and reads XML documents on byte streams.
///
/// Implemented by [`XmlCodec`]; code that only needs the contract can be
/// generic over this trait.
pub trait XmlSerializer {
    /// Encoding used for written documents.
    fn encoding(&self) -> Encoding;

    /// Whether written documents are indented.
    fn indent(&self) -> bool;

    /// Write `value` to `stream` as an XML document.
    ///
    /// # Errors
    ///
    /// See [`XmlCodec::serialize`].
    fn serialize<W, T>(&self, stream: &mut W, value: &T) -> CodecResult<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized;

    /// Read a `T` from the XML document on `stream`.
    ///
    /// # Errors
    ///
    /// See [`XmlCodec::deserialize`].
    fn deserialize<T, R>(&self, stream: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized;
}

/// XML codec with immutable reader and writer settings.
///
/// A codec holds no per-call state, so one instance can be reused for any
/// number of calls and shared between threads.
///
/// # Examples
///
/// ```
/// use objcodec_xml::XmlCodec;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let codec = XmlCodec::new();
/// let ada = Person { name: "Ada".into(), age: 36 };
///
/// let mut buf = Vec::new();
/// codec.serialize(&mut buf, &ada).unwrap();
/// let back: Person = codec.deserialize(&mut buf.as_slice()).unwrap();
/// assert_eq!(back, ada);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlCodec {
    writer_settings: WriterSettings,
    reader_settings: ReaderSettings,
}

impl XmlCodec {
    /// Codec with UTF-8 output, indentation, and default reader settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with explicit writer and reader settings, stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] when a setting cannot be honoured:
    /// indentation with a zero width or a non-whitespace indent character, or a
    /// zero document size limit.
    pub fn with_settings(
        writer_settings: WriterSettings,
        reader_settings: ReaderSettings,
    ) -> CodecResult<Self> {
        if writer_settings.indent {
            if writer_settings.indent_size == 0 {
                return Err(CodecError::invalid_argument(
                    "writer_settings",
                    "indent_size must be positive when indentation is enabled",
                ));
            }
            if !matches!(writer_settings.indent_char, ' ' | '\t') {
                return Err(CodecError::invalid_argument(
                    "writer_settings",
                    format!(
                        "indent_char must be a space or a tab, got {:?}",
                        writer_settings.indent_char
                    ),
                ));
            }
        }
        if reader_settings.max_document_bytes == Some(0) {
            return Err(CodecError::invalid_argument(
                "reader_settings",
                "max_document_bytes must be positive",
            ));
        }

        Ok(Self {
            writer_settings,
            reader_settings,
        })
    }

    /// Codec for an encoding label such as `"utf-8"` or `"utf-16be"`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] when the label is empty or not
    /// a supported encoding.
    pub fn with_encoding(encoding: &str, indent: bool) -> CodecResult<Self> {
        if encoding.trim().is_empty() {
            return Err(CodecError::invalid_argument(
                "encoding",
                "must not be empty",
            ));
        }
        let encoding = encoding
            .parse::<Encoding>()
            .map_err(|e| CodecError::invalid_argument("encoding", e.to_string()))?;
        Ok(Self::from_encoding(encoding, indent))
    }

    /// Codec for a known encoding.
    #[must_use]
    pub fn from_encoding(encoding: Encoding, indent: bool) -> Self {
        Self {
            writer_settings: WriterSettings::builder()
                .encoding(encoding)
                .indent(indent)
                .build(),
            reader_settings: ReaderSettings::default(),
        }
    }

    /// Encoding used for written documents.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.writer_settings.encoding
    }

    /// Whether written documents are indented.
    #[must_use]
    pub fn indent(&self) -> bool {
        self.writer_settings.indent
    }

    /// Settings applied when writing.
    #[must_use]
    pub fn writer_settings(&self) -> &WriterSettings {
        &self.writer_settings
    }

    /// Settings applied when reading.
    #[must_use]
    pub fn reader_settings(&self) -> &ReaderSettings {
        &self.reader_settings
    }

    /// Write `value` to `stream` as an XML document.
    ///
    /// The document is rendered in full before the stream is written, and the
    /// stream is flushed on every exit path once writing starts. The stream is
    /// not closed.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArgument`] if `value` has no XML representation
    ///   (e.g. `None`); nothing is written.
    /// - [`CodecError::Serialization`] if the value's shape cannot be mapped to
    ///   XML; nothing is written.
    /// - [`CodecError::Io`] if writing to the stream fails.
    pub fn serialize<W, T>(&self, stream: &mut W, value: &T) -> CodecResult<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        let type_name = type_name::<T>();

        let body = writer::render(value, &self.writer_settings).map_err(|e| {
            tracing::warn!(type_name, error = %e, "failed to map value to XML");
            SerializationError::new(type_name, Direction::Serialize, e)
        })?;
        if body.is_empty() {
            return Err(CodecError::invalid_argument(
                "value",
                format!("`{type_name}` has no XML representation"),
            ));
        }

        let mut writer = ScopedWriter::new(stream, &self.writer_settings);
        let written = writer.write_document(&body)?;
        writer.finish()?;

        tracing::debug!(
            type_name,
            encoding = %self.encoding(),
            bytes = written,
            "serialized value to XML"
        );
        Ok(())
    }

    /// Read a `T` from the XML document on `stream`.
    ///
    /// Consumes the stream to its end. The stream is not closed.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Malformed`] if the document is not well-formed, is too
    ///   large, or cannot be decoded.
    /// - [`CodecError::Serialization`] if the document does not match `T`.
    /// - [`CodecError::Io`] if reading from the stream fails.
    pub fn deserialize<T, R>(&self, stream: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized,
    {
        let type_name = type_name::<T>();

        let document = ScopedReader::new(stream, &self.reader_settings)
            .read_document()
            .inspect_err(|e| {
                if let CodecError::Malformed(e) = e {
                    tracing::debug!(type_name, error = %e, "rejected malformed XML document");
                }
            })?;

        let value = quick_xml::de::from_str::<T>(&document).map_err(|e| match e {
            DeError::InvalidXml(e) => CodecError::from(e),
            e => {
                tracing::warn!(type_name, error = %e, "failed to map XML to type");
                SerializationError::new(type_name, Direction::Deserialize, e).into()
            }
        })?;

        tracing::debug!(type_name, bytes = document.len(), "deserialized value from XML");
        Ok(value)
    }

    /// Serialize `value` into a new buffer.
    ///
    /// # Errors
    ///
    /// See [`XmlCodec::serialize`].
    pub fn to_vec<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(512);
        self.serialize(&mut buf, value)?;
        Ok(buf)
    }

    /// Deserialize a `T` from an in-memory document.
    ///
    /// # Errors
    ///
    /// See [`XmlCodec::deserialize`].
    pub fn from_slice<T: DeserializeOwned>(&self, mut bytes: &[u8]) -> CodecResult<T> {
        self.deserialize(&mut bytes)
    }
}

impl XmlSerializer for XmlCodec {
    fn encoding(&self) -> Encoding {
        Self::encoding(self)
    }

    fn indent(&self) -> bool {
        Self::indent(self)
    }

    fn serialize<W, T>(&self, stream: &mut W, value: &T) -> CodecResult<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        Self::serialize(self, stream, value)
    }

    fn deserialize<T, R>(&self, stream: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized,
    {
        Self::deserialize(self, stream)
    }
}
