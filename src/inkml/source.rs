//! Reference documents that exported traces are compared against.
//!
//! Parsing keeps the elements an export carries over: every annotation and
//! `annotationXML` block wherever it appears, and the first `traceGroup`.
//! Each is stored as its raw event sequence so it can be written back
//! unchanged.
//! Element names are matched on their local part, so both default-namespace
//! and prefixed documents are accepted.

use crate::{
    constants::{EXCLUDED_ANNOTATION_TYPES, TRUTH_ANNOTATION_TYPE},
    Error, Result,
};
use log::{debug, info};
use quick_xml::{
    events::{BytesStart, Event},
    Reader, Writer,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

const INK: &[u8] = b"ink";
const ANNOTATION: &[u8] = b"annotation";
const ANNOTATION_XML: &[u8] = b"annotationXML";
const TRACE_GROUP: &[u8] = b"traceGroup";

/// An element copied verbatim from a source document
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughElement {
    annotation_type: Option<String>,
    events: Vec<Event<'static>>,
}

impl PassthroughElement {
    /// Value of the `type` attribute, if the element has one
    #[must_use]
    pub fn annotation_type(&self) -> Option<&str> {
        self.annotation_type.as_deref()
    }

    /// Whether this annotation must not be carried into an export
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.annotation_type.as_deref().is_some_and(|kind| {
            EXCLUDED_ANNOTATION_TYPES
                .iter()
                .any(|excluded| kind.eq_ignore_ascii_case(excluded))
        })
    }

    /// Concatenated text content of the element
    ///
    /// # Errors
    ///
    /// Returns an error if the text holds an invalid escape
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        for event in &self.events {
            match event {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        Ok(text)
    }

    /// Write the element's events unchanged
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        for event in &self.events {
            writer.write_event(event.clone())?;
        }
        Ok(())
    }
}

/// Parsed reference document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    path: Option<PathBuf>,
    annotations: Vec<PassthroughElement>,
    annotation_xml: Vec<PassthroughElement>,
    trace_group: Option<PassthroughElement>,
    truth: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureKind {
    Annotation,
    AnnotationXml,
    TraceGroup,
}

/// An element still open in the document, with its slot in the capture lists
struct Capture {
    kind: CaptureKind,
    index: usize,
    depth: usize,
}

impl SourceDocument {
    /// Read and parse a document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an ink document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading source document: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let mut document = Self::parse(&text)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Parse a document from text
    ///
    /// Annotations and `annotationXML` elements are collected at any depth,
    /// in document order, including those inside a trace group. The trace
    /// group itself also keeps them in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is malformed or the root is not `ink`
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut document = Self::default();
        let mut open: Vec<Capture> = Vec::new();
        let mut seen_root = false;

        loop {
            let event = reader.read_event()?;

            if let Event::Eof = event {
                break;
            }

            if !seen_root {
                match &event {
                    Event::Start(e) | Event::Empty(e) => {
                        if e.local_name().as_ref() != INK {
                            return Err(Error::SourceDocument(format!(
                                "root element is <{}>, expected <ink>",
                                String::from_utf8_lossy(e.name().as_ref())
                            )));
                        }
                        seen_root = true;
                    }
                    _ => {}
                }
                continue;
            }

            let event = event.into_owned();

            // Every open capture records the event, then depths follow the nesting
            for capture in &open {
                if let Some(element) = document.element_mut(capture.kind, capture.index) {
                    element.events.push(event.clone());
                }
            }
            match &event {
                Event::Start(_) => open.iter_mut().for_each(|c| c.depth += 1),
                Event::End(_) => {
                    if open.last().is_some_and(|c| c.depth == 0) {
                        open.pop();
                    }
                    open.iter_mut().for_each(|c| c.depth = c.depth.saturating_sub(1));
                }
                _ => {}
            }

            let (e, is_start) = match &event {
                Event::Start(e) => (e, true),
                Event::Empty(e) => (e, false),
                _ => continue,
            };
            if let Some(kind) = document.capture_kind(e) {
                let element = PassthroughElement {
                    annotation_type: annotation_type(e)?,
                    events: vec![event.clone()],
                };
                let index = document.insert(kind, element);
                if is_start {
                    open.push(Capture { kind, index, depth: 0 });
                }
            }
        }

        if !seen_root {
            return Err(Error::SourceDocument("document has no root element".to_string()));
        }
        if !open.is_empty() {
            return Err(Error::SourceDocument("document ended inside an element".to_string()));
        }

        document.truth = document
            .annotations
            .iter()
            .find(|a| {
                a.annotation_type()
                    .is_some_and(|t| t.eq_ignore_ascii_case(TRUTH_ANNOTATION_TYPE))
            })
            .map(|a| a.text().map(|t| t.trim().to_string()))
            .transpose()?;

        debug!(
            "Parsed source document: {} annotations, {} annotationXML, trace group: {}",
            document.annotations.len(),
            document.annotation_xml.len(),
            document.trace_group.is_some()
        );
        Ok(document)
    }

    fn capture_kind(&self, e: &BytesStart<'_>) -> Option<CaptureKind> {
        match e.local_name().as_ref() {
            ANNOTATION => Some(CaptureKind::Annotation),
            ANNOTATION_XML => Some(CaptureKind::AnnotationXml),
            TRACE_GROUP if self.trace_group.is_none() => Some(CaptureKind::TraceGroup),
            _ => None,
        }
    }

    fn insert(&mut self, kind: CaptureKind, element: PassthroughElement) -> usize {
        match kind {
            CaptureKind::Annotation => {
                self.annotations.push(element);
                self.annotations.len() - 1
            }
            CaptureKind::AnnotationXml => {
                self.annotation_xml.push(element);
                self.annotation_xml.len() - 1
            }
            CaptureKind::TraceGroup => {
                self.trace_group = Some(element);
                0
            }
        }
    }

    fn element_mut(&mut self, kind: CaptureKind, index: usize) -> Option<&mut PassthroughElement> {
        match kind {
            CaptureKind::Annotation => self.annotations.get_mut(index),
            CaptureKind::AnnotationXml => self.annotation_xml.get_mut(index),
            CaptureKind::TraceGroup => self.trace_group.as_mut(),
        }
    }

    /// File the document was loaded from
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name without the `.inkml` extension, used to name exports
    #[must_use]
    pub fn base_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    /// All top-level annotations in document order
    #[must_use]
    pub fn annotations(&self) -> &[PassthroughElement] {
        &self.annotations
    }

    /// Annotations an export carries over
    pub fn passthrough_annotations(&self) -> impl Iterator<Item = &PassthroughElement> {
        self.annotations.iter().filter(|a| !a.is_excluded())
    }

    /// `annotationXML` elements in document order
    #[must_use]
    pub fn annotation_xml(&self) -> &[PassthroughElement] {
        &self.annotation_xml
    }

    /// The first trace group, if any
    #[must_use]
    pub const fn trace_group(&self) -> Option<&PassthroughElement> {
        self.trace_group.as_ref()
    }

    /// Reference formula from the `truth` annotation
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAnnotation`] when the document has none
    pub fn truth(&self) -> Result<&str> {
        self.truth
            .as_deref()
            .ok_or_else(|| Error::MissingAnnotation(TRUTH_ANNOTATION_TYPE.to_string()))
    }
}

fn annotation_type(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"type" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ink xmlns="http://www.w3.org/2003/InkML">
  <traceFormat>
    <channel name="X" type="decimal"/>
    <channel name="Y" type="decimal"/>
  </traceFormat>
  <annotation type="truth">$x^2$</annotation>
  <annotation type="UI">2011_IVC_DEPT_F01_E01</annotation>
  <annotation type="copyright">LUNAM/IRCCyN</annotation>
  <annotation type="writer">w1</annotation>
  <annotationXML href="x.lg"/>
  <trace id="0">1 2, 3 4</trace>
  <traceGroup xml:id="5">
    <annotation type="truth">Segmentation</annotation>
    <traceGroup xml:id="6">
      <annotation type="truth">x</annotation>
      <traceView traceDataRef="0"/>
    </traceGroup>
  </traceGroup>
</ink>"#;

    #[test]
    fn test_parse_sample() {
        let doc = SourceDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.truth().unwrap(), "$x^2$");
        assert_eq!(doc.annotations().len(), 6);
        assert_eq!(doc.annotation_xml().len(), 1);
        assert!(doc.trace_group().is_some());

        let kept: Vec<_> = doc.passthrough_annotations().filter_map(|a| a.annotation_type()).collect();
        assert_eq!(kept, vec!["truth", "UI", "truth", "truth"]);
    }

    #[test]
    fn test_nested_annotations_collected_in_document_order() {
        let doc = SourceDocument::parse(SAMPLE).unwrap();
        let texts: Vec<_> = doc
            .passthrough_annotations()
            .map(|a| a.text().unwrap())
            .collect();
        assert_eq!(texts, vec!["$x^2$", "2011_IVC_DEPT_F01_E01", "Segmentation", "x"]);

        // The first truth in document order is the formula
        assert_eq!(doc.truth().unwrap(), "$x^2$");
    }

    #[test]
    fn test_annotation_xml_inside_trace_group() {
        let text = r#"<ink>
  <traceGroup>
    <annotationXML href="a.lg"><node>1</node></annotationXML>
    <traceGroup><annotationXML href="b.lg"/></traceGroup>
  </traceGroup>
  <traceGroup><annotation type="truth">late</annotation></traceGroup>
</ink>"#;
        let doc = SourceDocument::parse(text).unwrap();
        assert_eq!(doc.annotation_xml().len(), 2);
        assert_eq!(doc.annotation_xml()[0].text().unwrap(), "1");

        // Only the first group is kept, but annotations in later groups still count
        let group = doc.trace_group().unwrap();
        assert!(!group.text().unwrap().contains("late"));
        assert_eq!(doc.truth().unwrap(), "late");
    }

    #[test]
    fn test_trace_group_captures_nested_groups() {
        let doc = SourceDocument::parse(SAMPLE).unwrap();
        let group = doc.trace_group().unwrap();
        let text = group.text().unwrap();
        assert!(text.contains("Segmentation"));
        assert!(text.contains('x'));
    }

    #[test]
    fn test_missing_truth() {
        let doc = SourceDocument::parse(r#"<ink><annotation type="UI">a</annotation></ink>"#).unwrap();
        assert!(matches!(doc.truth(), Err(Error::MissingAnnotation(_))));
    }

    #[test]
    fn test_rejects_wrong_root() {
        assert!(matches!(
            SourceDocument::parse("<svg></svg>"),
            Err(Error::SourceDocument(_))
        ));
        assert!(SourceDocument::parse("").is_err());
    }

    #[test]
    fn test_prefixed_elements() {
        let text = r#"<inkml:ink xmlns:inkml="http://www.w3.org/2003/InkML">
  <inkml:annotation type="truth">y</inkml:annotation>
</inkml:ink>"#;
        let doc = SourceDocument::parse(text).unwrap();
        assert_eq!(doc.truth().unwrap(), "y");
    }

    #[test]
    fn test_annotation_without_type_is_kept() {
        let doc = SourceDocument::parse("<ink><annotation>note</annotation></ink>").unwrap();
        assert_eq!(doc.passthrough_annotations().count(), 1);
    }
}
