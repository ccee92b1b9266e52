//! Document output: rendering values through serde and writing them to a stream.
//!
//! Rendering happens entirely in memory before the stream is touched, so a value
//! that fails to map leaves the stream unchanged.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::se::{SeError, Serializer};
use serde::Serialize;

use crate::settings::WriterSettings;

/// Render `value` as an XML element tree, without a declaration.
///
/// The root element is named after the value's type. Returns an empty string
/// when the value has no XML representation at all (e.g. `None`).
pub(crate) fn render<T: Serialize + ?Sized>(
    value: &T,
    settings: &WriterSettings,
) -> Result<String, SeError> {
    let mut body = String::with_capacity(256);
    let mut serializer = Serializer::new(&mut body);
    if settings.indent {
        serializer.indent(settings.indent_char, settings.indent_size);
    }
    value.serialize(serializer)?;
    Ok(body)
}

/// Writer scoped to a single `serialize` call.
///
/// Borrows the caller's stream and flushes it on every exit path. The stream
/// itself is never closed.
pub(crate) struct ScopedWriter<'a, W: Write + ?Sized> {
    stream: &'a mut W,
    settings: &'a WriterSettings,
    flushed: bool,
}

impl<'a, W: Write + ?Sized> ScopedWriter<'a, W> {
    pub(crate) fn new(stream: &'a mut W, settings: &'a WriterSettings) -> Self {
        Self {
            stream,
            settings,
            flushed: false,
        }
    }

    /// Write the declaration and `body` in the configured encoding.
    ///
    /// Returns the number of bytes written.
    pub(crate) fn write_document(&mut self, body: &str) -> io::Result<usize> {
        let mut text = String::with_capacity(body.len() + 64);
        if !self.settings.omit_xml_declaration {
            text.push_str(&self.declaration()?);
            if self.settings.indent {
                text.push('\n');
            }
        }
        text.push_str(body);

        let bytes = self.settings.encoding.encode(&text);
        self.stream.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Flush the stream and release it.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        self.flushed = true;
        self.stream.flush()
    }

    fn declaration(&self) -> io::Result<String> {
        let mut buf = Vec::with_capacity(64);
        let mut writer = Writer::new(&mut buf);
        writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some(self.settings.encoding.name()),
            None,
        )))?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<W: Write + ?Sized> Drop for ScopedWriter<'_, W> {
    fn drop(&mut self) {
        if !self.flushed {
            if let Err(e) = self.stream.flush() {
                tracing::warn!(error = %e, "failed to flush XML output stream");
            }
        }
    }
}
