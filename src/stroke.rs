//! Stroke storage for one capture session.
//!
//! The store is an ordered list of segments whose last element is the
//! active segment. Finalizing only opens a new segment when the active one
//! holds points, so the list never contains two empty segments in a row.

/// A point in domain coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal domain coordinate
    pub x: f64,
    /// Vertical domain coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous pen-down polyline
pub type StrokeSegment = Vec<Point>;

/// Ordered stroke segments; the last one is active
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStore {
    segments: Vec<StrokeSegment>,
}

impl Default for StrokeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeStore {
    /// Create a store holding a single empty active segment
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: vec![Vec::new()],
        }
    }

    /// The segment currently receiving points
    #[must_use]
    pub fn active(&self) -> &[Point] {
        self.segments.last().map_or(&[], Vec::as_slice)
    }

    /// Append a point to the active segment
    pub fn push_point(&mut self, point: Point) {
        match self.segments.last_mut() {
            Some(active) => active.push(point),
            None => self.segments.push(vec![point]),
        }
    }

    /// Close the active segment and open a new one, if the active one has points
    ///
    /// Returns `true` when a segment was closed.
    pub fn finalize(&mut self) -> bool {
        if self.active().is_empty() {
            return false;
        }
        self.segments.push(Vec::new());
        true
    }

    /// Discard everything and start over with one empty segment
    pub fn reset(&mut self) {
        self.segments.clear();
        self.segments.push(Vec::new());
    }

    /// All segments in drawing order, the active one last
    #[must_use]
    pub fn segments(&self) -> &[StrokeSegment] {
        &self.segments
    }

    /// Segments that hold at least one point, paired with their session index
    pub fn non_empty(&self) -> impl Iterator<Item = (usize, &[Point])> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| !segment.is_empty())
            .map(|(index, segment)| (index, segment.as_slice()))
    }

    /// Whether any point has been captured
    #[must_use]
    pub fn has_strokes(&self) -> bool {
        self.segments.iter().any(|segment| !segment.is_empty())
    }

    /// Total number of captured points
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}
