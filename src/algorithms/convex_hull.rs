use crate::data::{Point, Polygon};
use crate::Orientation;

// https://en.wikipedia.org/wiki/Graham_scan

/// Convex hull that keeps colinear boundary points: a chain vertex is only
/// popped on a strictly counterclockwise turn, so points lying on a hull
/// edge survive, in order. The result winds counterclockwise.
///
/// Unlike a proper convex hull this is total: fewer than three points, or
/// points on a common line, yield a ring with zero signed area (possibly
/// with repeated vertices) that callers must reject via the area sign.
pub fn hull_with_boundary_points(pts: &[Point]) -> Polygon {
  if pts.is_empty() {
    return Polygon::new(Vec::new());
  }
  let mut sorted = pts.to_vec();
  sorted.sort_unstable();
  let upper = half_chain(&sorted);
  sorted.reverse();
  let lower = half_chain(&sorted);

  let mut ring = Vec::with_capacity(upper.len() + lower.len());
  ring.extend_from_slice(&upper[..upper.len() - 1]);
  ring.extend_from_slice(&lower[..lower.len() - 1]);
  Polygon::new(ring)
}

fn half_chain(sorted: &[Point]) -> Vec<Point> {
  let mut chain: Vec<Point> = Vec::new();
  for &p in sorted {
    while chain.len() >= 2
      && Orientation::new(&p, &chain[chain.len() - 1], &chain[chain.len() - 2])
        == Orientation::CounterClockWise
    {
      chain.pop();
    }
    chain.push(p);
  }
  chain
}

/// Polygon area divided by the area of its convex hull, in `[0, 1]`.
pub fn score(poly: &Polygon) -> f64 {
  poly.area() / hull_with_boundary_points(poly.points()).area()
}
