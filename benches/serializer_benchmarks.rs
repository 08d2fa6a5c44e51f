//! Benchmarks for trace document writing and reading

use air_ink::{
    inkml::{read_traces, SourceDocument, TraceSerializer},
    stroke::{Point, StrokeStore},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SOURCE: &str = r#"<ink xmlns="http://www.w3.org/2003/InkML">
  <annotation type="truth">$\frac{a}{b}$</annotation>
  <annotation type="UI">bench</annotation>
  <annotation type="writer">w1</annotation>
  <traceGroup xml:id="1"><annotation type="truth">Segmentation</annotation></traceGroup>
</ink>"#;

fn session(segments: usize, points_per_segment: usize) -> StrokeStore {
    let mut store = StrokeStore::new();
    for _ in 0..segments {
        for _ in 0..points_per_segment {
            store.push_point(Point::new(
                0.8 + rand::random::<f64>(),
                6.4 + 0.4 * rand::random::<f64>(),
            ));
        }
        store.finalize();
    }
    store
}

fn benchmark_serializer(c: &mut Criterion) {
    let mut group = c.benchmark_group("inkml");
    let source = SourceDocument::parse(SOURCE).unwrap();

    group.bench_function("parse_source", |b| b.iter(|| black_box(SourceDocument::parse(black_box(SOURCE)))));

    for segments in [1, 10, 50] {
        let store = session(segments, 40);
        group.throughput(Throughput::Elements((segments * 40) as u64));

        group.bench_with_input(BenchmarkId::new("write", segments), &store, |b, store| {
            b.iter(|| black_box(TraceSerializer::new(&source).to_bytes(store)))
        });

        let text = TraceSerializer::new(&source).to_string(&store).unwrap();
        group.bench_with_input(BenchmarkId::new("read_back", segments), &text, |b, text| {
            b.iter(|| black_box(read_traces(text)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_serializer);
criterion_main!(benches);
