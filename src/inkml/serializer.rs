//! Renders captured strokes as an ink trace document.

use super::source::SourceDocument;
use crate::{
    constants::{COORDINATE_PRECISION, INKML_NAMESPACE},
    stroke::{Point, StrokeStore},
    Error, Result,
};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io::Write;

/// Format one segment's points as `x y, x y, ...`
#[must_use]
pub fn format_trace(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.prec$} {:.prec$}", p.x, p.y, prec = COORDINATE_PRECISION))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes a stroke store plus metadata carried from a source document
pub struct TraceSerializer<'a> {
    source: &'a SourceDocument,
}

impl<'a> TraceSerializer<'a> {
    /// Serializer carrying metadata from `source`
    #[must_use]
    pub const fn new(source: &'a SourceDocument) -> Self {
        Self { source }
    }

    /// Render the document as a string
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be written
    pub fn to_string(&self, store: &StrokeStore) -> Result<String> {
        let bytes = self.to_bytes(store)?;
        String::from_utf8(bytes).map_err(|e| Error::Export(format!("document is not UTF-8: {e}")))
    }

    /// Render the document as UTF-8 bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be written
    pub fn to_bytes(&self, store: &StrokeStore) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer, store)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Write the document to `writer`
    ///
    /// Carried elements keep their original inner whitespace, so only the
    /// top-level layout is indented here.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails
    pub fn write<W: Write>(&self, writer: &mut Writer<W>, store: &StrokeStore) -> Result<()> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        newline(writer, 0)?;
        writer.write_event(Event::Start(
            BytesStart::new("ink").with_attributes([("xmlns", INKML_NAMESPACE)]),
        ))?;

        newline(writer, 1)?;
        writer.write_event(Event::Start(BytesStart::new("traceFormat")))?;
        for channel in ["X", "Y"] {
            newline(writer, 2)?;
            writer.write_event(Event::Empty(
                BytesStart::new("channel").with_attributes([("name", channel), ("type", "decimal")]),
            ))?;
        }
        newline(writer, 1)?;
        writer.write_event(Event::End(BytesEnd::new("traceFormat")))?;

        for annotation in self.source.passthrough_annotations() {
            newline(writer, 1)?;
            annotation.write_to(writer)?;
        }
        for annotation_xml in self.source.annotation_xml() {
            newline(writer, 1)?;
            annotation_xml.write_to(writer)?;
        }

        for (index, points) in store.non_empty() {
            newline(writer, 1)?;
            let id = index.to_string();
            writer.write_event(Event::Start(
                BytesStart::new("trace").with_attributes([("id", id.as_str())]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(&format_trace(points))))?;
            writer.write_event(Event::End(BytesEnd::new("trace")))?;
        }

        if let Some(group) = self.source.trace_group() {
            newline(writer, 1)?;
            group.write_to(writer)?;
        }

        newline(writer, 0)?;
        writer.write_event(Event::End(BytesEnd::new("ink")))?;
        Ok(())
    }
}

fn newline<W: Write>(writer: &mut Writer<W>, level: usize) -> Result<()> {
    let indent = format!("\n{}", "  ".repeat(level));
    writer.write_event(Event::Text(BytesText::new(&indent)))?;
    Ok(())
}
