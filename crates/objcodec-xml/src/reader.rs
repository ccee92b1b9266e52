//! Document input: reading, decoding, and well-formedness checking.
//!
//! The whole document is read into memory, decoded according to its byte order
//! mark, and scanned once with [`quick_xml::Reader`] before any mapping is
//! attempted. A document that passes the scan is handed to the serde engine as
//! a string, so engine failures can only be structural.

use std::io::Read;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{CodecResult, MalformedXml};
use crate::settings::{DtdProcessing, Encoding, ReaderSettings};

/// Reader scoped to a single `deserialize` call.
///
/// Borrows the caller's stream; the stream is never closed.
pub(crate) struct ScopedReader<'a, R: Read + ?Sized> {
    stream: &'a mut R,
    settings: &'a ReaderSettings,
}

impl<'a, R: Read + ?Sized> ScopedReader<'a, R> {
    pub(crate) fn new(stream: &'a mut R, settings: &'a ReaderSettings) -> Self {
        Self { stream, settings }
    }

    /// Read the remaining stream content as a checked XML document.
    pub(crate) fn read_document(self) -> CodecResult<String> {
        let mut raw = Vec::new();
        match self.settings.max_document_bytes {
            Some(limit) => {
                let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
                (&mut *self.stream).take(cap).read_to_end(&mut raw)?;
                if raw.len() > limit {
                    return Err(MalformedXml::TooLarge { limit }.into());
                }
            }
            None => {
                self.stream.read_to_end(&mut raw)?;
            }
        }

        let (text, encoding) = decode(&raw)?;
        check_well_formed(&text, encoding, self.settings)?;
        Ok(text)
    }
}

/// Decode raw document bytes, honouring a leading byte order mark.
///
/// Documents without a BOM are read as UTF-8. Returns the text and the
/// encoding it was decoded from.
fn decode(raw: &[u8]) -> Result<(String, Encoding), MalformedXml> {
    let (encoding, bom_len) = Encoding::sniff(raw).unwrap_or((Encoding::Utf8, 0));
    let body = &raw[bom_len..];
    let invalid = || MalformedXml::Decode {
        encoding: encoding.name(),
    };

    let text = match encoding {
        Encoding::Utf8 => std::str::from_utf8(body)
            .map(str::to_owned)
            .map_err(|_| invalid()),
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(invalid());
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if encoding == Encoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                })
                .collect();
            String::from_utf16(&units).map_err(|_| invalid())
        }
    }?;
    Ok((text, encoding))
}

/// Verify that `text` is a single well-formed XML document.
///
/// `detected` is the encoding the bytes were decoded from; a declaration must
/// name the same encoding family. End tags must always match their start tag,
/// as the serde engine enforces the same rule.
fn check_well_formed(
    text: &str,
    detected: Encoding,
    settings: &ReaderSettings,
) -> Result<(), MalformedXml> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if open.is_empty() && seen_root {
                    return Err(MalformedXml::MultipleRoots);
                }
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                open.pop();
                if open.is_empty() {
                    seen_root = true;
                }
            }
            Event::Empty(_) if open.is_empty() => {
                if seen_root {
                    return Err(MalformedXml::MultipleRoots);
                }
                seen_root = true;
            }
            Event::Text(e) if open.is_empty() => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(MalformedXml::StrayText);
                }
            }
            Event::CData(_) | Event::GeneralRef(_) if open.is_empty() => {
                return Err(MalformedXml::StrayText);
            }
            Event::DocType(_) => {
                if settings.dtd_processing == DtdProcessing::Prohibit {
                    return Err(MalformedXml::DtdProhibited);
                }
            }
            Event::Decl(decl) => {
                if let Some(label) = decl.encoding() {
                    let label = label.map_err(quick_xml::Error::from)?;
                    let label = String::from_utf8_lossy(&label);
                    let Ok(declared) = label.parse::<Encoding>() else {
                        return Err(MalformedXml::UnsupportedEncoding(label.into_owned()));
                    };
                    // Byte order comes from the BOM, so only the family must agree.
                    if declared.name() != detected.name() {
                        return Err(MalformedXml::EncodingMismatch {
                            declared: label.into_owned(),
                            detected: detected.name(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(MalformedXml::UnclosedElement(name));
    }
    if !seen_root {
        return Err(MalformedXml::MissingRoot);
    }
    Ok(())
}
