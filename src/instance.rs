use crate::data::{Point, Polygon};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// A parsed `.instance` file: the point set plus the mapping back to the
/// external identifiers, which outlives the solver core.
#[derive(Debug, Clone)]
pub struct Instance {
  points: Vec<Point>,
  ids: HashMap<Point, u64>,
}

impl Instance {
  /// Parse an instance file: one `identifier x y` triple of non-negative
  /// integers per line, `#` lines and blank lines ignored. Duplicate
  /// coordinates are not expected and not checked.
  pub fn load(path: impl AsRef<Path>) -> Result<Instance> {
    let path = path.as_ref();
    let text =
      fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut points = Vec::new();
    let mut ids = HashMap::new();
    for (lineno, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let mut fields = line.split_whitespace();
      let (id, x, y) = match (fields.next(), fields.next(), fields.next()) {
        (Some(id), Some(x), Some(y)) => (id, x, y),
        _ => bail!("{}:{}: expected `identifier x y`", path.display(), lineno + 1),
      };
      let parse = |field: &str| -> Result<i64> {
        field
          .parse()
          .with_context(|| format!("{}:{}: invalid integer `{}`", path.display(), lineno + 1, field))
      };
      let p = Point::new(parse(x)?, parse(y)?);
      ids.insert(p, parse(id)? as u64);
      points.push(p);
    }
    Ok(Instance { points, ids })
  }

  pub fn points(&self) -> &[Point] {
    &self.points
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn id_of(&self, p: &Point) -> Option<u64> {
    self.ids.get(p).copied()
  }
}

/// Write the solution: `#`-prefixed comment lines, then one identifier per
/// line in polygon order.
pub fn write_solution(
  path: impl AsRef<Path>,
  polygon: &Polygon,
  instance: &Instance,
  comments: &[String],
) -> Result<()> {
  let path = path.as_ref();
  let mut out = String::new();
  for comment in comments {
    writeln!(out, "# {}", comment)?;
  }
  for p in polygon.points() {
    match instance.id_of(p) {
      Some(id) => writeln!(out, "{}", id)?,
      None => bail!("solution vertex ({}, {}) is not an instance point", p.x, p.y),
    }
  }
  fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn load_skips_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.instance");
    fs::write(&path, "# header\n0 0 0\n1 10 0\n\n2 10 10\n# trailing\n3 0 10\n").unwrap();

    let instance = Instance::load(&path).unwrap();
    assert_eq!(instance.len(), 4);
    assert_eq!(instance.points()[1], Point::new(10, 0));
    assert_eq!(instance.id_of(&Point::new(10, 10)), Some(2));
  }

  #[test]
  fn load_rejects_malformed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.instance");
    fs::write(&path, "0 0\n").unwrap();
    assert!(Instance::load(&path).is_err());

    fs::write(&path, "0 zero 0\n").unwrap();
    assert!(Instance::load(&path).is_err());
  }

  #[test]
  fn solution_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.instance");
    fs::write(&path, "7 0 0\n8 10 0\n9 5 8\n").unwrap();
    let instance = Instance::load(&path).unwrap();

    let poly = Polygon::new(vec![Point::new(0, 0), Point::new(10, 0), Point::new(5, 8)]);
    let out = dir.path().join("tiny.max.solution");
    write_solution(&out, &poly, &instance, &[String::from("Score: 1")]).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, "# Score: 1\n7\n8\n9\n");
  }

  #[test]
  fn unknown_vertex_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.instance");
    fs::write(&path, "7 0 0\n8 10 0\n9 5 8\n").unwrap();
    let instance = Instance::load(&path).unwrap();

    let poly = Polygon::new(vec![Point::new(0, 0), Point::new(10, 0), Point::new(4, 4)]);
    let out = dir.path().join("tiny.max.solution");
    assert!(write_solution(&out, &poly, &instance, &[]).is_err());
  }
}
