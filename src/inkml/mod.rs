//! Ink markup documents: reading reference sources, writing captured
//! traces, and reading traces back.

/// Reference documents and the metadata carried from them
pub mod source;

/// Stroke store to trace document rendering
pub mod serializer;

/// Trace read-back from exported documents
pub mod reader;

pub use reader::{parse_trace_points, read_trace_file, read_traces, ParsedTrace};
pub use serializer::{format_trace, TraceSerializer};
pub use source::{PassthroughElement, SourceDocument};
