//! Typed XML object codec.
//!
//! This crate serializes serde-enabled Rust values to XML documents on byte
//! streams and reads them back, with a configurable encoding and indentation.
//! The structural mapping is generated at compile time by
//! `#[derive(Serialize, Deserialize)]` and driven by the `quick-xml` serde
//! backend.
//!
//! # Key components
//!
//! - [`XmlCodec`] and the [`XmlSerializer`] trait for stream serialization
//! - [`WriterSettings`] / [`ReaderSettings`] for immutable configuration
//! - [`CodecError`] separating argument, mapping, well-formedness, and I/O failures
//!
//! # Wire conventions
//!
//! - XML declaration: `<?xml version="1.0" encoding="utf-8"?>` (or `utf-16`)
//! - Root element named after the Rust type, one child element per field
//! - UTF-16 output carries a byte order mark; UTF-8 output does not

pub mod codec;
pub mod error;
mod reader;
pub mod settings;
mod writer;

pub use codec::{XmlCodec, XmlSerializer};
pub use error::{
    CodecError, CodecResult, Direction, MalformedXml, MappingFailure, SerializationError,
};
pub use settings::{DtdProcessing, Encoding, ReaderSettings, UnknownEncoding, WriterSettings};
