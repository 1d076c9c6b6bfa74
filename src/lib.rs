//! Heuristic area-optimal polygonization.
//!
//! Given a finite set of planar points with integer coordinates, compute a
//! simple polygon whose vertex set is exactly that point set and whose
//! enclosed area is as large (or as small) as the heuristics manage. The
//! problem is NP-hard; the solver runs a greedy constructive phase followed
//! by local-search refinement. See [`solver::solve_many`] for the entry
//! point and [`data::Geometer`] for the polygon store that backs both
//! phases.
//!
//! All predicates are exact: coordinates are `i64` and every determinant is
//! evaluated in `i128`.

pub mod algorithms;
pub mod data;
pub mod instance;
mod orientation;
pub mod solver;

pub use data::{DirectedEdge, Geometer, Point, Polygon};
pub use orientation::{
  point_on_segment, segments_intersect, segments_properly_intersect, signed_area_2x, Orientation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  InsufficientVertices,
  DuplicatePoints,
  SelfIntersections,
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::InsufficientVertices => write!(f, "a polygon needs at least three vertices"),
      Error::DuplicatePoints => write!(f, "duplicate points"),
      Error::SelfIntersections => write!(f, "polygon edges properly intersect"),
    }
  }
}

impl std::error::Error for Error {}

/// Solver parameters. Field names follow the conventional knobs of the
/// two-phase heuristic: `pen` is the inverse weight of the perimeter term in
/// the greedy score, `hood` the half-width (in grid cells) of the candidate
/// neighborhood around an edge (`None` means unbounded), `hops` the longest
/// vertex path a single local-search move may relocate.
#[derive(Debug, Clone)]
pub struct Params {
  pub maximize: bool,
  pub pen: f64,
  pub hood: Option<u32>,
  pub opt: bool,
  pub optgain: f64,
  pub hops: u32,
  pub multirun: bool,
  pub sigma: f64,
  pub seed: u64,
  pub timeout: f64,
  pub nmin: usize,
  pub nmax: usize,
}

impl Default for Params {
  fn default() -> Params {
    Params {
      maximize: true,
      pen: 90.0,
      hood: Some(2),
      opt: true,
      optgain: 0.001,
      hops: 1,
      multirun: false,
      sigma: 0.0,
      seed: 1,
      timeout: 150.0,
      nmin: 0,
      nmax: 100_000,
    }
  }
}

impl Params {
  /// Output-file extension encoding the parameters that shaped the solution,
  /// e.g. `maxhood2opt` for the defaults.
  pub fn extension(&self) -> String {
    let mut ext = String::from(if self.maximize { "max" } else { "min" });
    if self.pen != 90.0 {
      ext.push_str(&format!("pen{}", self.pen));
    }
    if self.sigma != 0.0 {
      ext.push_str(&format!("sigma{}", (100.0 * self.sigma) as i64));
    }
    if let Some(hood) = self.hood {
      ext.push_str(&format!("hood{}", hood));
    }
    if self.opt {
      ext.push_str("opt");
      if self.hops > 1 {
        ext.push_str(&format!("{}", self.hops));
      }
    }
    ext
  }
}
