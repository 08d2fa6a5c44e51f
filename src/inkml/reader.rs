//! Reads traces back out of an ink document.

use crate::{stroke::Point, Error, Result};
use log::{debug, warn};
use quick_xml::{events::Event, Reader};
use std::path::Path;

/// One trace element read from a document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrace {
    /// Value of the `id` attribute, or `"unknown"`
    pub id: String,
    /// Points in document order
    pub points: Vec<Point>,
}

/// Parse the text content of a trace into points
///
/// Each comma-separated entry needs at least two numbers; values past the
/// second belong to other channels and are ignored.
///
/// # Errors
///
/// Returns an error if the trace is empty or any entry cannot be parsed
pub fn parse_trace_points(text: &str) -> Result<Vec<Point>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput("trace is empty".to_string()));
    }

    text.split(',')
        .map(|entry| {
            let values = entry
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::InvalidInput(format!("bad value in '{}': {e}", entry.trim())))?;
            match values.as_slice() {
                [x, y, ..] => Ok(Point::new(*x, *y)),
                _ => Err(Error::InvalidInput(format!(
                    "point '{}' needs two coordinates",
                    entry.trim()
                ))),
            }
        })
        .collect()
}

/// Read every well-formed trace from document text
///
/// Traces that are empty or fail to parse are logged and skipped.
///
/// # Errors
///
/// Returns an error only if the document markup itself is malformed
pub fn read_traces(text: &str) -> Result<Vec<ParsedTrace>> {
    let mut reader = Reader::from_str(text);
    let mut traces = Vec::new();
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if e.local_name().as_ref() == b"trace" => {
                current = Some((trace_id(&e)?, String::new()));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"trace" => {
                warn!("Trace {} is empty, skipping", trace_id(&e)?);
            }
            Event::Text(t) => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(&t.unescape()?);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"trace" => {
                if let Some((id, body)) = current.take() {
                    match parse_trace_points(&body) {
                        Ok(points) => traces.push(ParsedTrace { id, points }),
                        Err(e) => warn!("Skipping trace {id}: {e}"),
                    }
                }
            }
            _ => {}
        }
    }

    debug!("Read {} traces", traces.len());
    Ok(traces)
}

/// Read every well-formed trace from a file
///
/// # Errors
///
/// Returns an error if the file cannot be read or its markup is malformed
pub fn read_trace_file<P: AsRef<Path>>(path: P) -> Result<Vec<ParsedTrace>> {
    let text = std::fs::read_to_string(path)?;
    read_traces(&text)
}

fn trace_id(e: &quick_xml::events::BytesStart<'_>) -> Result<String> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Ok("unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_points() {
        let points = parse_trace_points(" 1.5 2.5, 3 4 ").unwrap();
        assert_eq!(points, vec![Point::new(1.5, 2.5), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_trace_points_extra_channels() {
        let points = parse_trace_points("1 2 100, 3 4 200").unwrap();
        assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_trace_points_errors() {
        assert!(parse_trace_points("").is_err());
        assert!(parse_trace_points("1 2, 3").is_err());
        assert!(parse_trace_points("1 a").is_err());
        assert!(parse_trace_points("1 2,").is_err());
    }

    #[test]
    fn test_malformed_traces_are_skipped() {
        let text = r#"<ink>
  <trace id="0">1 2, 3 4</trace>
  <trace id="1">oops</trace>
  <trace id="2"></trace>
  <trace id="3"/>
  <trace id="4">5 6</trace>
</ink>"#;
        let traces = read_traces(text).unwrap();
        let ids: Vec<&str> = traces.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "4"]);
        assert_eq!(traces[0].points.len(), 2);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(read_traces("<ink><trace id=\"0\">1 2</ink>").is_err());
    }
}
