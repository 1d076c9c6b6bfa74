/// A planar point with integer coordinates. Points are their own identity
/// throughout the solver: the polygon cycle, the spatial index, and the
/// candidate queues all key on the coordinates. The derived lexicographic
/// order (x, then y) makes every ordered collection of points deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
  pub x: i64,
  pub y: i64,
}

impl Point {
  pub const fn new(x: i64, y: i64) -> Point {
    Point { x, y }
  }

  /// Squared Euclidean distance, exact in `i128`.
  pub fn squared_distance(&self, other: &Point) -> i128 {
    let dx = self.x as i128 - other.x as i128;
    let dy = self.y as i128 - other.y as i128;
    dx * dx + dy * dy
  }

  pub fn distance(&self, other: &Point) -> f64 {
    (self.squared_distance(other) as f64).sqrt()
  }
}

impl From<(i64, i64)> for Point {
  fn from((x, y): (i64, i64)) -> Point {
    Point::new(x, y)
  }
}
