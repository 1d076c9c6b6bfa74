use crate::algorithms::convex_hull::score;
use crate::data::{double_area_change, DirectedEdge, Geometer, Point, Polygon};
use crate::Params;

use std::collections::BTreeSet;
use tracing::debug;

/// A rerouting move: detach a short vertex path from the cycle and splice
/// it, reversed, across another edge. `gain` is the doubled area improvement
/// (positive means the move shifts the counterclockwise-signed area up,
/// which improves both optimization directions given their orientations).
#[derive(Debug, Clone)]
struct Move {
  gain: i128,
  add: Vec<DirectedEdge>,
  del: Vec<DirectedEdge>,
}

/// One local-search sweep: enumerate every rerouting move of up to
/// `params.hops` consecutive vertices against every present edge, then
/// greedily commit the recorded improvements in order of descending gain,
/// revalidating each against the mutated polygon.
pub fn step(poly: &Polygon, params: &Params) -> Polygon {
  let mut geo = Geometer::new(poly.points());
  geo.add_polygon(poly);

  let mut moves: Vec<Move> = Vec::new();
  let edges: Vec<DirectedEdge> = geo.edges().collect();
  for e in &edges {
    let starts: BTreeSet<Point> = match params.hood {
      Some(delta) => geo.points_near_segment(e, delta),
      None => geo.vertices().collect(),
    };
    for start in starts {
      let mut path: Vec<Point> = Vec::new();
      let mut at = start;
      for _ in 0..params.hops {
        if at == e.src || at == e.dst {
          break;
        }
        path.push(at);
        if let Some(found) = reroute(&geo, e, &path) {
          moves.push(found);
        }
        match geo.next_vertex(&at) {
          Some(next) => at = next,
          None => break,
        }
      }
    }
  }

  moves.sort_unstable_by(|a, b| (b.gain, &b.add, &b.del).cmp(&(a.gain, &a.add, &a.del)));

  let mut committed = 0usize;
  for m in &moves {
    if geo.valid_change(&m.add, &m.del) {
      geo.apply_change(&m.add, &m.del);
      committed += 1;
    }
  }
  debug!(candidates = moves.len(), committed, "local search sweep");

  geo.polygon()
}

/// Build the move that detaches `path` and re-attaches it, reversed, across
/// `e`. Recorded only when the area strictly improves and the edit is valid
/// against the unmodified polygon.
fn reroute(geo: &Geometer, e: &DirectedEdge, path: &[Point]) -> Option<Move> {
  let first = *path.first()?;
  let last = *path.last()?;
  let before = geo.prev_vertex(&first)?;
  let after = geo.next_vertex(&last)?;

  let mut add = vec![
    DirectedEdge::new(e.src, last),
    DirectedEdge::new(first, e.dst),
    DirectedEdge::new(before, after),
  ];
  let mut del = vec![
    DirectedEdge::new(before, first),
    DirectedEdge::new(last, after),
    *e,
  ];
  for pair in path.windows(2) {
    add.push(DirectedEdge::new(pair[1], pair[0]));
    del.push(DirectedEdge::new(pair[0], pair[1]));
  }

  let gain = -double_area_change(&add, &del);
  if gain > 0 && geo.valid_change(&add, &del) {
    Some(Move { gain, add, del })
  } else {
    None
  }
}

/// Refine until a sweep changes the score by less than `params.optgain`.
pub fn refine(mut poly: Polygon, params: &Params) -> Polygon {
  let mut delta = f64::INFINITY;
  while delta >= params.optgain {
    let before = score(&poly);
    poly = step(&poly, params);
    let after = score(&poly);
    delta = (before - after).abs();
    debug!(score = after, "refined");
  }
  poly
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn already_optimal_square_is_left_alone() {
    let square = Polygon::new(vec![
      Point::new(0, 0),
      Point::new(10, 0),
      Point::new(10, 10),
      Point::new(0, 10),
    ]);
    let refined = refine(square.clone(), &Params::default());
    assert_eq!(refined.area(), square.area());
  }

  #[test]
  fn sweep_never_loses_area() {
    // Counterclockwise square with a notch to the center cut into the
    // bottom edge. Every polygon on these five vertices encloses the same
    // area, so no move has positive gain and the sweep must leave the
    // area untouched rather than commit a lossy reroute.
    let notched = Polygon::new(vec![
      Point::new(0, 0),
      Point::new(5, 5),
      Point::new(10, 0),
      Point::new(10, 10),
      Point::new(0, 10),
    ]);
    assert_eq!(notched.area(), 75.0);
    let refined = refine(notched, &Params::default());
    assert_eq!(refined.validate(), Ok(()));
    assert!(refined.area() >= 75.0);
  }

  #[test]
  fn clockwise_rings_only_shrink() {
    // Clockwise pentagon, positive shoelace sum: committed moves raise the
    // counterclockwise-signed area, which for this orientation can only
    // shrink the enclosed area.
    let pentagon = Polygon::new(vec![
      Point::new(0, 0),
      Point::new(0, 10),
      Point::new(10, 10),
      Point::new(5, 5),
      Point::new(10, 0),
    ]);
    assert!(pentagon.signed_area_2x() > 0);
    let area = pentagon.area();
    let refined = refine(pentagon, &Params::default());
    assert_eq!(refined.validate(), Ok(()));
    assert!(refined.area() <= area);
  }
}
