//! Stroke-capture state machine for the signature pad.
//!
//! Generic over the snapshot payload `S` so the machine runs in plain unit
//! tests; the client instantiates it with `web_sys::ImageData`.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

pub struct SignatureState<S> {
    drawing: bool,
    last_point: Option<Point>,
    has_ink: bool,
    snapshots: Vec<S>,
}

impl<S> Default for SignatureState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SignatureState<S> {
    pub fn new() -> Self {
        Self {
            drawing: false,
            last_point: None,
            has_ink: false,
            snapshots: Vec::new(),
        }
    }

    /// Starts a stroke at `point`. The snapshot is the bitmap as it was just
    /// before this stroke; `None` means capture failed, in which case drawing
    /// continues and only undo for this stroke is lost.
    pub fn begin_stroke(&mut self, point: Point, snapshot: Option<S>) {
        if let Some(snapshot) = snapshot {
            self.snapshots.push(snapshot);
        }
        self.drawing = true;
        self.has_ink = true;
        self.last_point = Some(point);
    }

    /// Extends the current stroke to `point`, returning the segment the
    /// caller should paint. Not drawing (missed down, cancelled stroke,
    /// resize mid-gesture) means nothing to paint.
    pub fn extend_stroke(&mut self, point: Point) -> Option<Segment> {
        if !self.drawing {
            return None;
        }
        let from = self.last_point?;
        self.last_point = Some(point);
        Some(Segment { from, to: point })
    }

    /// Ends or abandons the current stroke. Safe on pointerup, pointercancel
    /// and pointer-leave alike; never mutates the bitmap.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
        self.last_point = None;
    }

    /// Pops the most recent pre-stroke snapshot for the caller to restore.
    /// An empty stack is a no-op. Once the stack runs dry the bitmap itself
    /// is the source of truth for remaining ink, so `has_ink` stays set.
    pub fn undo(&mut self) -> Option<S> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.drawing = false;
        self.last_point = None;
        self.has_ink = false;
    }

    /// Gate for serialization: with no committed ink the payload must be
    /// empty regardless of bitmap contents.
    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }
}
