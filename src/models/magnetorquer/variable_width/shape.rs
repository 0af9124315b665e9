use uom::si::f64::Length;

/// A point in the board plane.
///
/// Shapes produced by a [`VariableWidthSpiral`](super::VariableWidthSpiral)
/// measure from the corner of the spiral's bounding square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    #[must_use]
    pub fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    /// Reflects the point across the diagonal `x = y`.
    #[must_use]
    pub fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

/// One ring of a variable-width square spiral.
///
/// The five corners trace the ring from where the previous ring ended to
/// where the next ring starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coil {
    /// Copper width of the ring.
    pub width: Length,

    /// Corners of the ring, on the centerline of the trace.
    pub points: [Point; 5],
}

impl Coil {
    /// Consecutive corner pairs, one per straight segment.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Drawable outline of a variable-width spiral, outermost coil first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiralShape {
    coils: Vec<Coil>,
}

impl SpiralShape {
    pub(crate) fn push(&mut self, coil: Coil) {
        self.coils.push(coil);
    }

    #[must_use]
    pub fn coils(&self) -> &[Coil] {
        &self.coils
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coils.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coils.is_empty()
    }

    /// Outer end of the trace.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.coils.first().map(|coil| coil.points[0])
    }

    /// Inner end of the trace.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.coils.last().map(|coil| coil.points[4])
    }
}
