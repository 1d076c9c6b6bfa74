use criterion::{criterion_group, criterion_main, Criterion};
use polyarea::{solver, Params, Point};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::time::Instant;

fn random_points(n: usize, extent: i64, rng: &mut SmallRng) -> Vec<Point> {
  let mut seen = BTreeSet::new();
  let mut pts = Vec::new();
  while pts.len() < n {
    let p = Point::new(rng.gen_range(0..extent), rng.gen_range(0..extent));
    if seen.insert(p) {
      pts.push(p);
    }
  }
  pts
}

pub fn criterion_benchmark(c: &mut Criterion) {
  let mut rng = SmallRng::seed_from_u64(7);
  let pts = random_points(300, 10_000, &mut rng);

  let greedy_only = Params {
    opt: false,
    ..Params::default()
  };
  c.bench_function("greedy_max(300)", |b| {
    b.iter(|| solver::solve_many(&pts, &greedy_only, Instant::now()))
  });

  let with_opt = Params::default();
  c.bench_function("greedy_opt_max(300)", |b| {
    b.iter(|| solver::solve_many(&pts, &with_opt, Instant::now()))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
