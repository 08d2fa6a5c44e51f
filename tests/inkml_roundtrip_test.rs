//! Export and read-back tests for ink trace documents

mod test_helpers;

use air_ink::{
    config::Config,
    export::Exporter,
    inkml::{read_trace_file, read_traces, SourceDocument, TraceSerializer},
    stroke::{Point, StrokeStore},
};
use chrono::{TimeZone, Utc};
use rand::Rng;
use std::{fs, path::PathBuf, time::Instant};
use tempfile::TempDir;
use test_helpers::{hand_with_fingers, SAMPLE_SOURCE};

fn write_source(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("formulaire001-equation002.inkml");
    fs::write(&path, SAMPLE_SOURCE).unwrap();
    path
}

fn random_store(segments: usize) -> StrokeStore {
    let mut rng = rand::thread_rng();
    let mut store = StrokeStore::new();
    for _ in 0..segments {
        for _ in 0..rng.gen_range(1..20) {
            store.push_point(Point::new(rng.gen_range(0.8..1.8), rng.gen_range(6.4..6.8)));
        }
        store.finalize();
    }
    store
}

#[test]
fn test_scenario_session_exports_one_trace() {
    let dir = TempDir::new().unwrap();
    let source = SourceDocument::load(write_source(&dir)).unwrap();

    let mut machine = Config::default().create_state_machine().unwrap();
    let start = Instant::now();
    let frames = [(5, (50, 50)), (1, (100, 100)), (1, (110, 100)), (1, (120, 100)), (2, (120, 100))];
    for (step, &(fingers, tip)) in frames.iter().enumerate() {
        machine.update_raw(
            Some(&hand_with_fingers(fingers, tip)),
            start + std::time::Duration::from_millis(10 * step as u64),
        );
    }

    let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
    let path = Exporter::new(dir.path().join("air_data"))
        .export(machine.store(), &source, &at)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("<trace ").count(), 1);
    assert!(text.contains(r#"<trace id="0">0.971875 6.483333, 0.987500 6.483333</trace>"#));

    let traces = read_trace_file(&path).unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].id, "0");
    assert_eq!(traces[0].points.len(), 2);
}

#[test]
fn test_export_filters_annotations() {
    let source = SourceDocument::parse(SAMPLE_SOURCE).unwrap();
    let mut store = StrokeStore::new();
    store.push_point(Point::new(1.0, 6.5));

    let text = TraceSerializer::new(&source).to_string(&store).unwrap();

    assert!(!text.contains("LUNAM/IRCCyN"));
    assert!(!text.contains("w123"));
    assert!(text.contains(r#"<annotation type="truth">$a+b$</annotation>"#));
    assert!(text.contains(r#"<annotation type="UI" lang="en">2011_IVC_DEPT_F01_E01</annotation>"#));
    assert!(text.contains(r#"<annotationXML type="truth" encoding="Content-MathML">"#));
    assert!(text.contains(r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mi>a</mi></math>"#));

    // Source traces are replaced by the captured ones
    assert!(!text.contains("0.1 0.2, 0.3 0.4"));
}

#[test]
fn test_nested_annotations_carried_to_top_level() {
    let source = SourceDocument::parse(SAMPLE_SOURCE).unwrap();
    let mut store = StrokeStore::new();
    store.push_point(Point::new(1.0, 6.5));
    let text = TraceSerializer::new(&source).to_string(&store).unwrap();

    let label = r#"<annotation type="truth">Segmentation</annotation>"#;
    assert_eq!(text.matches(label).count(), 2);

    // One copy sits with the top-level annotations, the other stays in the group
    let first_label = text.find(label).unwrap();
    let first_trace = text.find("<trace ").unwrap();
    let group = text.find("<traceGroup").unwrap();
    assert!(first_label < first_trace);
    assert!(text.rfind(label).unwrap() > group);
}

#[test]
fn test_trace_group_follows_traces() {
    let source = SourceDocument::parse(SAMPLE_SOURCE).unwrap();
    let text = TraceSerializer::new(&source).to_string(&random_store(3)).unwrap();

    let last_trace = text.rfind("<trace ").unwrap();
    let group = text.find(r#"<traceGroup xml:id="7">"#).unwrap();
    assert!(group > last_trace);
    assert!(text.contains(r#"<traceView traceDataRef="0"/>"#));
    assert!(text.trim_end().ends_with("</ink>"));
}

#[test]
fn test_export_is_a_valid_source() {
    let source = SourceDocument::parse(SAMPLE_SOURCE).unwrap();
    let text = TraceSerializer::new(&source).to_string(&random_store(2)).unwrap();

    let reparsed = SourceDocument::parse(&text).unwrap();
    assert_eq!(reparsed.truth().unwrap(), "$a+b$");
    // truth, UI and the carried Segmentation label, plus the one kept inside the group
    assert_eq!(reparsed.passthrough_annotations().count(), 4);
    assert!(reparsed.trace_group().is_some());
}

#[test]
fn test_read_back_matches_store() {
    let source = SourceDocument::parse(SAMPLE_SOURCE).unwrap();

    for segments in [0, 1, 5] {
        let store = random_store(segments);
        let text = TraceSerializer::new(&source).to_string(&store).unwrap();
        let traces = read_traces(&text).unwrap();

        let expected: Vec<_> = store.non_empty().collect();
        assert_eq!(traces.len(), expected.len());
        for (trace, (index, points)) in traces.iter().zip(expected) {
            assert_eq!(trace.id, index.to_string());
            assert_eq!(trace.points.len(), points.len());
            for (read, written) in trace.points.iter().zip(points) {
                assert!((read.x - written.x).abs() <= 1e-6);
                assert!((read.y - written.y).abs() <= 1e-6);
            }
        }
    }
}

#[test]
fn test_read_back_skips_malformed_traces() {
    let text = r#"<ink xmlns="http://www.w3.org/2003/InkML">
  <trace id="0">1.0 2.0, 3.0 4.0</trace>
  <trace id="1">not numbers</trace>
  <trace id="2"></trace>
  <trace id="3"/>
  <trace id="4">5.0 6.0 0.25, 7.0 8.0 0.5</trace>
  <trace id="5">9.0</trace>
</ink>"#;

    let traces = read_traces(text).unwrap();
    let ids: Vec<_> = traces.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["0", "4"]);
    assert_eq!(traces[1].points, vec![Point::new(5.0, 6.0), Point::new(7.0, 8.0)]);
}

#[test]
fn test_read_back_rejects_broken_markup() {
    assert!(read_traces("<ink><trace id=\"0\">1 2</ink>").is_err());
}
