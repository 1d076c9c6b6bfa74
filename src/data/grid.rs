use super::{DirectedEdge, Point};
use crate::orientation::segments_intersect;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

pub type Cell = (i64, i64);

/// An edge is bucketed per traversed cell only while the traversal stays
/// this short; longer edges go to the linear `long_edges` list instead.
const SHORT_EDGE_CELLS: usize = 4;

/// Uniform grid over the input points, doubling as the edge index of the
/// polygon store. Short edges are registered in every cell they traverse,
/// which gives constant-time candidate lookup for intersection queries; the
/// rare long edges (hull chords, seed-triangle sides) would blow up the cell
/// count and are kept in a list sorted by descending length, so the longest
/// rejector is consulted first and short-circuits most queries.
#[derive(Debug, Clone)]
pub struct Grid {
  cell_size: i64,
  cell_points: HashMap<Cell, BTreeSet<Point>>,
  cell_edges: HashMap<Cell, HashSet<DirectedEdge>>,
  long_edges: Vec<DirectedEdge>,
}

impl Grid {
  /// The cell width balances cells-per-edge against edges-per-cell for
  /// evenly distributed inputs: the bounding box is split into roughly
  /// `4 * n^(1/4)` columns, rounded up to an even width of at least 2.
  pub fn new(points: &[Point]) -> Grid {
    let cell_size = match (
      points.iter().map(|p| p.x).min(),
      points.iter().map(|p| p.x).max(),
      points.iter().map(|p| p.y).min(),
      points.iter().map(|p| p.y).max(),
    ) {
      (Some(xmin), Some(xmax), Some(ymin), Some(ymax)) => {
        let extent = (xmax - xmin).max(ymax - ymin) as f64;
        let columns = 4.0 * (points.len() as f64).powf(0.25);
        (2 * (extent / columns / 2.0).ceil() as i64).max(2)
      }
      _ => 2,
    };

    let mut grid = Grid {
      cell_size,
      cell_points: HashMap::new(),
      cell_edges: HashMap::new(),
      long_edges: Vec::new(),
    };
    for &p in points {
      let c = grid.cell(p);
      grid.cell_points.entry(c).or_default().insert(p);
    }
    grid
  }

  pub fn cell_size(&self) -> i64 {
    self.cell_size
  }

  pub fn cell(&self, p: Point) -> Cell {
    (p.x.div_euclid(self.cell_size), p.y.div_euclid(self.cell_size))
  }

  fn cell_box(&self, c: Cell) -> (Point, Point) {
    (
      Point::new(c.0 * self.cell_size, c.1 * self.cell_size),
      Point::new((c.0 + 1) * self.cell_size, (c.1 + 1) * self.cell_size),
    )
  }

  /// The ordered sequence of cells the segment visits, walking from the
  /// lexicographically smaller endpoint: advance +1 in x whenever the
  /// segment crosses the current cell's right wall, otherwise step in y
  /// along the segment's vertical direction. Duplicates cannot occur.
  pub fn segment_cells(&self, e: &DirectedEdge) -> Vec<Cell> {
    let (a, b) = if e.src > e.dst {
      (e.dst, e.src)
    } else {
      (e.src, e.dst)
    };
    let target = self.cell(b);
    let upwards = b.y > a.y;
    let mut at = self.cell(a);
    let mut cells = vec![at];
    while at != target {
      let (lo, hi) = self.cell_box(at);
      let right_wall = (Point::new(hi.x, lo.y), Point::new(hi.x, hi.y));
      at = if segments_intersect((a, b), right_wall) {
        (at.0 + 1, at.1)
      } else if upwards {
        (at.0, at.1 + 1)
      } else {
        (at.0, at.1 - 1)
      };
      cells.push(at);
    }
    cells
  }

  pub fn insert_edge(&mut self, e: DirectedEdge) {
    let cells = self.segment_cells(&e);
    if cells.len() <= SHORT_EDGE_CELLS {
      for c in cells {
        self.cell_edges.entry(c).or_default().insert(e);
      }
    } else {
      self.long_edges.push(e);
    }
  }

  pub fn remove_edge(&mut self, e: DirectedEdge) {
    let cells = self.segment_cells(&e);
    if cells.len() <= SHORT_EDGE_CELLS {
      for c in cells {
        if let Some(bucket) = self.cell_edges.get_mut(&c) {
          bucket.remove(&e);
          if bucket.is_empty() {
            self.cell_edges.remove(&c);
          }
        }
      }
    } else if let Some(at) = self.long_edges.iter().position(|le| le == &e) {
      self.long_edges.remove(at);
    }
  }

  /// Longest first, so that intersection queries hit the most likely
  /// rejector early. Called after bulk insertion; single insertions append.
  pub fn sort_long_edges(&mut self) {
    self.long_edges.sort_unstable_by_key(|e| Reverse(e.squared_length()));
  }

  pub fn long_edges(&self) -> &[DirectedEdge] {
    &self.long_edges
  }

  pub fn edges_in(&self, c: Cell) -> impl Iterator<Item = DirectedEdge> + '_ {
    self.cell_edges.get(&c).into_iter().flatten().copied()
  }

  pub fn points_in(&self, c: Cell) -> impl Iterator<Item = Point> + '_ {
    self.cell_points.get(&c).into_iter().flatten().copied()
  }

  pub fn occupied_cells(&self) -> usize {
    self.cell_points.len()
  }

  /// All cells within Chebyshev distance `delta` of any cell the segment
  /// traverses: the union of `(2*delta+1)^2` blocks along the traversal.
  pub fn cells_near_segment(&self, e: &DirectedEdge, delta: u32) -> BTreeSet<Cell> {
    let delta = delta as i64;
    let mut near = BTreeSet::new();
    for c in self.segment_cells(e) {
      for i in -delta..=delta {
        for j in -delta..=delta {
          near.insert((c.0 + i, c.1 + j));
        }
      }
    }
    near
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn grid_with_cell_size(points: &[Point], want: i64) -> Grid {
    let grid = Grid::new(points);
    assert_eq!(grid.cell_size(), want);
    grid
  }

  #[test]
  fn cell_size_is_even_and_clamped() {
    // A tiny extent clamps to the minimum width.
    grid_with_cell_size(&[Point::new(0, 0), Point::new(3, 3), Point::new(1, 2)], 2);
    // 100x100 box with 4 points: 100 / (4 * 4^(1/4)) ~ 17.7 -> even ceil 18.
    grid_with_cell_size(
      &[
        Point::new(0, 0),
        Point::new(100, 0),
        Point::new(100, 100),
        Point::new(0, 100),
      ],
      18,
    );
  }

  #[test]
  fn horizontal_walk() {
    let pts: Vec<Point> = (0..16).map(|i| Point::new(i * 10, i * 10)).collect();
    let grid = Grid::new(&pts);
    let cs = grid.cell_size();
    let e = DirectedEdge::new(Point::new(0, 0), Point::new(3 * cs, 0));
    assert_eq!(grid.segment_cells(&e), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
  }

  #[test]
  fn walk_is_direction_independent() {
    let pts: Vec<Point> = (0..16).map(|i| Point::new(i * 10, i * 10)).collect();
    let grid = Grid::new(&pts);
    let cs = grid.cell_size();
    let e = DirectedEdge::new(Point::new(1, 1), Point::new(2 * cs + 1, cs + 1));
    assert_eq!(grid.segment_cells(&e), grid.segment_cells(&e.rev()));
  }

  #[test]
  fn diagonal_walk_visits_contiguous_cells() {
    let pts: Vec<Point> = (0..16).map(|i| Point::new(i * 10, i * 10)).collect();
    let grid = Grid::new(&pts);
    let cs = grid.cell_size();
    let e = DirectedEdge::new(Point::new(1, 2 * cs + 1), Point::new(2 * cs + 1, 1));
    let cells = grid.segment_cells(&e);
    assert_eq!(cells.first(), Some(&(0, 2)));
    assert_eq!(cells.last(), Some(&(2, 0)));
    for pair in cells.windows(2) {
      let steps = (pair[0].0 - pair[1].0).abs() + (pair[0].1 - pair[1].1).abs();
      assert_eq!(steps, 1);
    }
  }

  #[test]
  fn long_edges_sorted_by_descending_length() {
    let pts: Vec<Point> = (0..100).map(|i| Point::new(i * 100, (i % 10) * 1000)).collect();
    let mut grid = Grid::new(&pts);
    let short = DirectedEdge::new(Point::new(0, 0), Point::new(5000, 0));
    let long = DirectedEdge::new(Point::new(0, 0), Point::new(9900, 9000));
    assert!(grid.segment_cells(&short).len() > SHORT_EDGE_CELLS);
    grid.insert_edge(short);
    grid.insert_edge(long);
    grid.sort_long_edges();
    assert_eq!(grid.long_edges(), &[long, short]);
    grid.remove_edge(long);
    assert_eq!(grid.long_edges(), &[short]);
  }

  #[test]
  fn neighborhood_covers_the_block() {
    let pts: Vec<Point> = (0..16).map(|i| Point::new(i * 10, i * 10)).collect();
    let grid = Grid::new(&pts);
    let e = DirectedEdge::new(Point::new(1, 1), Point::new(2, 2));
    let near = grid.cells_near_segment(&e, 1);
    assert_eq!(near.len(), 9);
    assert!(near.contains(&(-1, -1)) && near.contains(&(1, 1)));
  }
}
