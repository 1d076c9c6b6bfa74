use super::Point;

/// An oriented side of the polygon, from `src` to `dst`. The edge is present
/// in a [`super::Geometer`] iff the cycle maps `src` to `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectedEdge {
  pub src: Point,
  pub dst: Point,
}

impl DirectedEdge {
  pub const fn new(src: Point, dst: Point) -> DirectedEdge {
    DirectedEdge { src, dst }
  }

  pub fn rev(&self) -> DirectedEdge {
    DirectedEdge::new(self.dst, self.src)
  }

  pub fn endpoints(&self) -> (Point, Point) {
    (self.src, self.dst)
  }

  pub fn is_loop(&self) -> bool {
    self.src == self.dst
  }

  pub fn squared_length(&self) -> i128 {
    self.src.squared_distance(&self.dst)
  }

  /// This edge's term of the running shoelace sum,
  /// `(src.x + dst.x) * (src.y - dst.y)`. Summed around a cycle this is
  /// twice the enclosed area, negative for counterclockwise rings.
  pub fn double_area_term(&self) -> i128 {
    (self.src.x as i128 + self.dst.x as i128) * (self.src.y as i128 - self.dst.y as i128)
  }
}

/// Change of the running shoelace sum when `add` edges appear and `del`
/// edges vanish. The counterclockwise-signed area changes by the negated
/// half of this value.
pub fn double_area_change(add: &[DirectedEdge], del: &[DirectedEdge]) -> i128 {
  let added: i128 = add.iter().map(|e| e.double_area_term()).sum();
  let deleted: i128 = del.iter().map(|e| e.double_area_term()).sum();
  added - deleted
}
