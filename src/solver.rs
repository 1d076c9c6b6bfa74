use crate::algorithms::convex_hull::{hull_with_boundary_points, score};
use crate::algorithms::{greedy, local_search};
use crate::data::{Geometer, Point, Polygon};
use crate::{Orientation, Params};

use ordered_float::OrderedFloat;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info};

/// Statistics captured after greedy construction, before local search runs.
/// Recorded in the solution file's comment header.
#[derive(Debug, Clone, Copy)]
pub struct BeforeOpt {
  pub seconds: f64,
  pub score: f64,
}

/// A finished solving attempt.
#[derive(Debug, Clone)]
pub struct Run {
  pub polygon: Polygon,
  pub before_opt: Option<BeforeOpt>,
}

/// Solve once, or keep re-solving until the timeout when `multirun` is set,
/// returning the best polygon found. `started` anchors both the timeout and
/// the reported timings; the deadline is only consulted between full runs,
/// never mid-run. Returns `None` when no attempt produced a polygon.
pub fn solve_many(points: &[Point], params: &Params, started: Instant) -> Option<Run> {
  let mut rng = SmallRng::seed_from_u64(params.seed);

  if !params.multirun {
    info!("started greedy solver");
    let poly = solve_one(points, params, &mut rng)?;
    if !params.opt {
      return Some(Run {
        polygon: poly,
        before_opt: None,
      });
    }
    let before = BeforeOpt {
      seconds: started.elapsed().as_secs_f64(),
      score: score(&poly),
    };
    info!(score = before.score, "started refining");
    return Some(Run {
      polygon: local_search::refine(poly, params),
      before_opt: Some(before),
    });
  }

  let mut best: Option<Polygon> = None;
  loop {
    if let Some(poly) = solve_one(points, params, &mut rng) {
      let poly = local_search::refine(poly, params);
      let improved = match &best {
        None => true,
        Some(current) => {
          if params.maximize {
            poly.area() > current.area()
          } else {
            poly.area() < current.area()
          }
        }
      };
      if improved {
        info!(
          seconds = started.elapsed().as_secs_f64(),
          score = score(&poly),
          "improved best solution"
        );
        best = Some(poly);
      }
    }
    if started.elapsed().as_secs_f64() > params.timeout {
      break;
    }
  }
  best.map(|polygon| Run {
    polygon,
    before_opt: None,
  })
}

/// One greedy construction from a fresh seed polygon.
fn solve_one(points: &[Point], params: &Params, rng: &mut SmallRng) -> Option<Polygon> {
  let seed = if params.maximize {
    // Start from the hull with colinear boundary points included.
    hull_with_boundary_points(points)
  } else {
    seed_triangle(points, rng)?
  };
  // A zero-area seed means the chosen points are on one line; for the hull
  // that is every input point, for the triangle it would send a degenerate
  // cycle through the whole run and end in a NaN score.
  if seed.signed_area_2x() == 0 {
    return None;
  }
  debug!(vertices = seed.len(), "seed polygon");

  let mut geo = Geometer::new(points);
  geo.add_polygon(&seed);
  greedy::construct(&mut geo, params, rng)
}

/// Seed for minimization: a short-perimeter triangle around a random point,
/// ordered clockwise so the running shoelace sum starts positive. The
/// construction itself does not check the three points for colinearity; a
/// colinear triple yields a zero-area cycle that [`solve_one`] rejects.
fn seed_triangle(points: &[Point], rng: &mut SmallRng) -> Option<Polygon> {
  let p1 = *points.choose(rng)?;
  let p2 = points
    .iter()
    .copied()
    .filter(|p| *p != p1)
    .min_by_key(|p| p.squared_distance(&p1))?;
  let p3 = points
    .iter()
    .copied()
    .filter(|p| *p != p1 && *p != p2)
    .min_by_key(|p| OrderedFloat(p.distance(&p1) + p.distance(&p2)))?;

  let ring = if Orientation::is_ccw(&p1, &p2, &p3) {
    vec![p2, p1, p3]
  } else {
    vec![p1, p2, p3]
  };
  Some(Polygon::new(ring))
}
