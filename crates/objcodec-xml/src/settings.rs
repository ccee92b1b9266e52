//! Reader and writer configuration for the XML codec.
//!
//! Both settings types are plain immutable values. They derive serde so they can
//! be embedded in an application configuration file, and `TypedBuilder` for
//! programmatic construction with defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Character encoding of a serialized document.
///
/// Serialized with the same labels [`FromStr`] accepts: `utf-8`, `utf-16le`,
/// `utf-16be`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8 without a byte order mark.
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// UTF-16 little endian, written with a byte order mark.
    #[serde(rename = "utf-16le", alias = "utf-16", alias = "utf16le", alias = "utf16-le")]
    Utf16Le,
    /// UTF-16 big endian, written with a byte order mark.
    #[serde(rename = "utf-16be", alias = "utf16be", alias = "utf16-be")]
    Utf16Be,
}

impl Encoding {
    /// Canonical name, as written into the XML declaration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le | Self::Utf16Be => "utf-16",
        }
    }

    /// Byte order mark emitted in front of the document.
    #[must_use]
    pub fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8 => &[],
            Self::Utf16Le => &[0xFF, 0xFE],
            Self::Utf16Be => &[0xFE, 0xFF],
        }
    }

    /// Encode `text` into bytes, BOM included.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(self.bom());
                text.encode_utf16().for_each(|u| out.extend_from_slice(&u.to_le_bytes()));
                out
            }
            Self::Utf16Be => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(self.bom());
                text.encode_utf16().for_each(|u| out.extend_from_slice(&u.to_be_bytes()));
                out
            }
        }
    }

    /// Detect the encoding of a raw document from its byte order mark.
    ///
    /// Returns the encoding and the length of the BOM, or `None` when the
    /// document carries no BOM.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<(Self, usize)> {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => Some((Self::Utf8, 3)),
            [0xFF, 0xFE, ..] => Some((Self::Utf16Le, 2)),
            [0xFE, 0xFF, ..] => Some((Self::Utf16Be, 2)),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an encoding label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding label: {0:?}")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            // Unqualified UTF-16 is little endian.
            "utf-16" | "utf16" | "utf-16le" | "utf16le" => Ok(Self::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Self::Utf16Be),
            _ => Err(UnknownEncoding(label.to_owned())),
        }
    }
}

/// How a document type declaration in the input is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DtdProcessing {
    /// Reject any document that contains a `<!DOCTYPE>`.
    #[default]
    Prohibit,
    /// Accept the declaration and skip it.
    Ignore,
}

/// Settings applied when writing a document.
///
/// # Examples
///
/// ```
/// use objcodec_xml::{Encoding, WriterSettings};
///
/// let settings = WriterSettings::default();
/// assert_eq!(settings.encoding, Encoding::Utf8);
/// assert!(settings.indent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct WriterSettings {
    /// Output character encoding.
    #[builder(default)]
    pub encoding: Encoding,

    /// Whether child elements are placed on their own indented lines.
    #[builder(default = true)]
    pub indent: bool,

    /// Character repeated for each indentation level.
    #[builder(default = ' ')]
    pub indent_char: char,

    /// Number of `indent_char` per indentation level.
    #[builder(default = 2)]
    pub indent_size: usize,

    /// Skip the `<?xml ...?>` declaration.
    #[builder(default = false)]
    pub omit_xml_declaration: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            indent: true,
            indent_char: ' ',
            indent_size: 2,
            omit_xml_declaration: false,
        }
    }
}

/// Settings applied when reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    /// Treatment of `<!DOCTYPE>` declarations.
    #[builder(default)]
    pub dtd_processing: DtdProcessing,

    /// Upper bound on the raw document size in bytes.
    #[builder(default, setter(strip_option))]
    pub max_document_bytes: Option<usize>,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            dtd_processing: DtdProcessing::Prohibit,
            max_document_bytes: None,
        }
    }
}
