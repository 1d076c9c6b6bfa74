use super::{double_area_change, DirectedEdge, Grid, Point, Polygon};
use crate::orientation::{segments_intersect, segments_properly_intersect};
use std::collections::{BTreeMap, BTreeSet};

/// The polygon store. Maintains the current polygon as a directed cycle
/// (`next`/`prev` vertex maps), the exact running shoelace sum, and the
/// spatial index of present edges. Built once per polygon-building attempt
/// and mutated only through [`Geometer::add`], [`Geometer::remove`] and
/// [`Geometer::apply_change`]; [`Geometer::valid_change`] is the single
/// consistency gate in front of every edit.
#[derive(Debug, Clone)]
pub struct Geometer {
  next_vertex: BTreeMap<Point, Point>,
  prev_vertex: BTreeMap<Point, Point>,
  double_area: i128,
  points: BTreeSet<Point>,
  grid: Grid,
}

impl Geometer {
  pub fn new(points: &[Point]) -> Geometer {
    Geometer {
      next_vertex: BTreeMap::new(),
      prev_vertex: BTreeMap::new(),
      double_area: 0,
      points: points.iter().copied().collect(),
      grid: Grid::new(points),
    }
  }

  /// The complete input point set, polygon vertices or not.
  pub fn points(&self) -> &BTreeSet<Point> {
    &self.points
  }

  /// The running shoelace sum over all present edges. Its sign encodes the
  /// polygon orientation and must not flip across accepted edits.
  pub fn double_area(&self) -> i128 {
    self.double_area
  }

  pub fn contains(&self, e: &DirectedEdge) -> bool {
    self.next_vertex.get(&e.src) == Some(&e.dst)
  }

  pub fn next_vertex(&self, p: &Point) -> Option<Point> {
    self.next_vertex.get(p).copied()
  }

  pub fn prev_vertex(&self, p: &Point) -> Option<Point> {
    self.prev_vertex.get(p).copied()
  }

  pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
    self.next_vertex.keys().copied()
  }

  pub fn edges(&self) -> impl Iterator<Item = DirectedEdge> + '_ {
    self
      .next_vertex
      .iter()
      .map(|(&src, &dst)| DirectedEdge::new(src, dst))
  }

  /// Record the edge: cycle maps, area sum, spatial index. The endpoints
  /// must be distinct and `src` must not already have a successor.
  pub fn add(&mut self, e: DirectedEdge) {
    debug_assert!(!e.is_loop());
    debug_assert!(!self.next_vertex.contains_key(&e.src));
    debug_assert!(!self.prev_vertex.contains_key(&e.dst));
    self.next_vertex.insert(e.src, e.dst);
    self.prev_vertex.insert(e.dst, e.src);
    self.double_area += e.double_area_term();
    self.grid.insert_edge(e);
  }

  /// Exact inverse of [`Geometer::add`]. The edge must be present.
  pub fn remove(&mut self, e: DirectedEdge) {
    debug_assert!(self.contains(&e));
    self.next_vertex.remove(&e.src);
    self.prev_vertex.remove(&e.dst);
    self.double_area -= e.double_area_term();
    self.grid.remove_edge(e);
  }

  pub fn add_polygon(&mut self, poly: &Polygon) {
    for e in poly.iter_edges() {
      self.add(e);
    }
    self.grid.sort_long_edges();
  }

  /// Extract the cycle, starting from the smallest vertex.
  pub fn polygon(&self) -> Polygon {
    let mut ring = Vec::with_capacity(self.next_vertex.len());
    if let Some((&start, _)) = self.next_vertex.iter().next() {
      let mut at = start;
      loop {
        ring.push(at);
        match self.next_vertex(&at) {
          Some(next) if next != start => at = next,
          _ => break,
        }
      }
    }
    Polygon::new(ring)
  }

  /// Every present edge intersecting `e`, long edges first. An edge indexed
  /// in several traversed cells is yielded once per cell; callers either
  /// dedupe or short-circuit.
  pub fn intersections(&self, e: DirectedEdge) -> impl Iterator<Item = DirectedEdge> + '_ {
    let cells = self.grid.segment_cells(&e);
    self
      .grid
      .long_edges()
      .iter()
      .copied()
      .chain(cells.into_iter().flat_map(move |c| self.grid.edges_in(c)))
      .filter(move |s| segments_intersect(s.endpoints(), e.endpoints()))
  }

  pub fn intersects(&self, e: DirectedEdge) -> bool {
    self.intersections(e).next().is_some()
  }

  /// True iff some present edge intersects `e` without sharing an endpoint
  /// with it.
  pub fn proper_intersects(&self, e: DirectedEdge) -> bool {
    self
      .intersections(e)
      .any(|s| s.src != e.src && s.dst != e.src && s.src != e.dst && s.dst != e.dst)
  }

  /// Gate for a proposed edit: delete `del`, then insert `add`. Accepts iff
  /// every deleted edge is present, neither list has duplicates, no added
  /// edge is a loop, no two added edges properly intersect each other, the
  /// orientation sign survives, and every added edge that is not the
  /// reversal of a present edge avoids proper intersections with the
  /// current polygon.
  pub fn valid_change(&self, add: &[DirectedEdge], del: &[DirectedEdge]) -> bool {
    for e in del {
      if !self.contains(e) {
        return false;
      }
    }

    let distinct_add: BTreeSet<&DirectedEdge> = add.iter().collect();
    let distinct_del: BTreeSet<&DirectedEdge> = del.iter().collect();
    if distinct_add.len() != add.len() || distinct_del.len() != del.len() {
      return false;
    }

    if add.iter().any(DirectedEdge::is_loop) {
      return false;
    }

    for (i, e1) in add.iter().enumerate() {
      for e2 in &add[i + 1..] {
        if segments_properly_intersect(e1.endpoints(), e2.endpoints()) {
          return false;
        }
      }
    }

    // Orientation gate: the sum plus the signed area change must not land
    // on the opposite strict sign. Kept in doubled form so the comparison
    // stays exact; crossings through zero are allowed.
    let shifted = 2 * self.double_area - double_area_change(add, del);
    if (shifted > 0 && self.double_area < 0) || (shifted < 0 && self.double_area > 0) {
      return false;
    }

    for e in add {
      if !self.contains(&e.rev()) && self.proper_intersects(*e) {
        return false;
      }
    }
    true
  }

  /// Apply an edit without any checking; callers must have validated.
  pub fn apply_change(&mut self, add: &[DirectedEdge], del: &[DirectedEdge]) {
    for e in del {
      self.remove(*e);
    }
    for e in add {
      self.add(*e);
    }
  }

  /// Input points within the `(2*delta+1)^2` cell blocks around the
  /// segment's traversal. Degenerates to the full point set while the grid
  /// is too coarsely populated for the neighborhood to restrict anything.
  pub fn points_near_segment(&self, e: &DirectedEdge, delta: u32) -> BTreeSet<Point> {
    if self.grid.occupied_cells() <= (1 + 2 * delta as usize).pow(2) {
      return self.points.clone();
    }
    let mut near = BTreeSet::new();
    for c in self.grid.cells_near_segment(e, delta) {
      near.extend(self.grid.points_in(c));
    }
    near
  }
}
