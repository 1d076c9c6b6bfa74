use crate::data::{DirectedEdge, Geometer, Point, Polygon};
use crate::signed_area_2x;
use crate::Params;

use ordered_float::OrderedFloat;
use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::Normal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::debug;

type Weight = OrderedFloat<f64>;

/// One entry of the global candidate heap: the best remaining `(point,
/// weight)` for an edge, or an infinite-weight sentinel when the edge's
/// queue is exhausted. Popped smallest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
  weight: Weight,
  point: Option<Point>,
  edge: DirectedEdge,
}

/// Grow the polygon held by `geo` until every input point is a vertex:
/// repeatedly absorb the cheapest feasible point `p` into an edge `(u, v)`,
/// replacing it with `(u, p)` and `(p, v)`. Returns `None` when no feasible
/// absorption exists even with an unbounded candidate neighborhood.
pub fn construct(geo: &mut Geometer, params: &Params, rng: &mut SmallRng) -> Option<Polygon> {
  grow(geo, params, params.hood, rng)
}

fn grow(
  geo: &mut Geometer,
  params: &Params,
  hood: Option<u32>,
  rng: &mut SmallRng,
) -> Option<Polygon> {
  let on_ring: BTreeSet<Point> = geo.vertices().collect();
  let mut todo: BTreeSet<Point> = geo.points().difference(&on_ring).copied().collect();

  let mut queues: BTreeMap<DirectedEdge, Vec<(Weight, Point)>> = BTreeMap::new();
  let edges: Vec<DirectedEdge> = geo.edges().collect();
  for e in edges {
    let queue = build_queue(geo, &e, &todo, hood, params, rng);
    queues.insert(e, queue);
  }

  while !todo.is_empty() {
    // Rebuild the heap from the per-edge bests each round; stale queue
    // entries are skipped lazily against `todo`.
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    for (e, queue) in queues.iter_mut() {
      heap.push(Reverse(best_candidate(*e, queue, &todo)));
    }

    loop {
      let Some(Reverse(cand)) = heap.pop() else {
        return None;
      };
      let Some(p) = cand.point else {
        // Every queue is exhausted. With a bounded neighborhood that just
        // means the candidate pools were too local; retry unbounded.
        if hood.is_some() {
          debug!(remaining = todo.len(), "neighborhood exhausted, retrying unbounded");
          return grow(geo, params, None, rng);
        }
        return None;
      };
      let e = cand.edge;
      let add = [DirectedEdge::new(e.src, p), DirectedEdge::new(p, e.dst)];
      let del = [e];
      if geo.valid_change(&add, &del) {
        todo.remove(&p);
        geo.apply_change(&add, &del);
        queues.remove(&e);
        for ne in add {
          let queue = build_queue(geo, &ne, &todo, hood, params, rng);
          queues.insert(ne, queue);
        }
        break;
      }
      // Infeasible with this specific edge: drop the entry and offer the
      // edge's next best so one blocked edge cannot starve the others.
      if let Some(queue) = queues.get_mut(&e) {
        queue.pop();
        heap.push(Reverse(best_candidate(e, queue, &todo)));
      }
    }
  }

  Some(geo.polygon())
}

/// Weight of absorbing `p` into `(u, v)`: the signed area of the cut-off
/// triangle plus a perimeter penalty scaled by `1/pen`. Smaller is better.
/// With `sigma > 0` the weight is inflated by `1 + |N(0, sigma)|` for
/// exploration.
fn weight(p: Point, e: &DirectedEdge, params: &Params, rng: &mut SmallRng) -> f64 {
  let (u, v) = e.endpoints();
  let mut w = signed_area_2x(&p, &u, &v) as f64 / 2.0
    + (p.squared_distance(&u) - u.squared_distance(&v) + v.squared_distance(&p)) as f64
      / params.pen;
  if params.sigma > 0.0 {
    if let Ok(noise) = Normal::new(0.0, params.sigma) {
      let gauss: f64 = rng.sample(noise);
      w += w * gauss.abs();
    }
  }
  w
}

/// Candidate queue for one edge, sorted descending so the best (smallest)
/// entry sits at the tail. For minimization only points on the outside of
/// the edge qualify.
fn build_queue(
  geo: &Geometer,
  e: &DirectedEdge,
  todo: &BTreeSet<Point>,
  hood: Option<u32>,
  params: &Params,
  rng: &mut SmallRng,
) -> Vec<(Weight, Point)> {
  let pool: BTreeSet<Point> = match hood {
    Some(delta) => geo
      .points_near_segment(e, delta)
      .intersection(todo)
      .copied()
      .collect(),
    None => todo.clone(),
  };
  let mut queue: Vec<(Weight, Point)> = pool
    .into_iter()
    .filter(|p| params.maximize || signed_area_2x(p, &e.src, &e.dst) > 0)
    .map(|p| (OrderedFloat(weight(p, e, params, rng)), p))
    .collect();
  queue.sort_unstable_by(|a, b| b.cmp(a));
  queue
}

/// The edge's current best candidate, discarding entries whose point has
/// been absorbed since the queue was built.
fn best_candidate(
  e: DirectedEdge,
  queue: &mut Vec<(Weight, Point)>,
  todo: &BTreeSet<Point>,
) -> Candidate {
  while let Some(&(weight, point)) = queue.last() {
    if todo.contains(&point) {
      return Candidate {
        weight,
        point: Some(point),
        edge: e,
      };
    }
    queue.pop();
  }
  Candidate {
    weight: OrderedFloat(f64::INFINITY),
    point: None,
    edge: e,
  }
}
