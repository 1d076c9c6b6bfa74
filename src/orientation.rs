use crate::data::Point;
use std::cmp::Ordering;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}
use Orientation::*;

impl Orientation {
  pub fn new(p: &Point, q: &Point, r: &Point) -> Orientation {
    match signed_area_2x(p, q, r).cmp(&0) {
      Ordering::Less => ClockWise,
      Ordering::Equal => CoLinear,
      Ordering::Greater => CounterClockWise,
    }
  }

  pub fn is_colinear(p: &Point, q: &Point, r: &Point) -> bool {
    Orientation::new(p, q, r) == CoLinear
  }

  pub fn is_ccw(p: &Point, q: &Point, r: &Point) -> bool {
    Orientation::new(p, q, r) == CounterClockWise
  }

  pub fn reverse(self) -> Orientation {
    match self {
      CounterClockWise => ClockWise,
      ClockWise => CounterClockWise,
      CoLinear => CoLinear,
    }
  }
}

/// Twice the signed area of the triangle `p`, `q`, `r`. Exact: the
/// determinant is evaluated in `i128`, so the sign is reliable for any `i64`
/// coordinates. Strictly positive iff the triangle winds counterclockwise.
pub fn signed_area_2x(p: &Point, q: &Point, r: &Point) -> i128 {
  let (px, py) = (p.x as i128, p.y as i128);
  let (qx, qy) = (q.x as i128, q.y as i128);
  let (rx, ry) = (r.x as i128, r.y as i128);
  (qx - px) * (ry - py) - (rx - px) * (qy - py)
}

/// True if `p` lies on the closed segment `s`, endpoints included.
pub fn point_on_segment(p: Point, s: (Point, Point)) -> bool {
  if !Orientation::is_colinear(&p, &s.0, &s.1) {
    return false;
  }
  let (xmin, xmax) = (s.0.x.min(s.1.x), s.0.x.max(s.1.x));
  let (ymin, ymax) = (s.0.y.min(s.1.y), s.0.y.max(s.1.y));
  xmin <= p.x && p.x <= xmax && ymin <= p.y && p.y <= ymax
}

/// True if the closed segments share at least one point. Touching endpoints
/// and overlapping colinear segments count as intersecting.
pub fn segments_intersect(s: (Point, Point), t: (Point, Point)) -> bool {
  let (s1, s2) = s;
  let (t1, t2) = t;

  let a1 = signed_area_2x(&s1, &s2, &t1);
  let a2 = signed_area_2x(&s1, &s2, &t2);
  let a3 = signed_area_2x(&t1, &t2, &s1);
  let a4 = signed_area_2x(&t1, &t2, &s2);

  if a1 == 0 || a2 == 0 || a3 == 0 || a4 == 0 {
    return point_on_segment(s1, t)
      || point_on_segment(s2, t)
      || point_on_segment(t1, s)
      || point_on_segment(t2, s);
  }

  (a1 > 0) != (a2 > 0) && (a3 > 0) != (a4 > 0)
}

/// True if the segments intersect somewhere that is not a shared endpoint.
pub fn segments_properly_intersect(s: (Point, Point), t: (Point, Point)) -> bool {
  segments_intersect(s, t) && s.0 != t.0 && s.0 != t.1 && s.1 != t.0 && s.1 != t.1
}

#[cfg(test)]
mod tests {
  use super::*;

  use test_strategy::proptest;

  //         P5
  //
  // P4  P2
  //
  // P1  P3  P6
  static P1: Point = Point::new(0, 0);
  static P2: Point = Point::new(1, 1);
  static P3: Point = Point::new(1, 0);
  static P4: Point = Point::new(0, 1);
  static P5: Point = Point::new(2, 2);
  static P6: Point = Point::new(2, 0);

  #[test]
  fn turn_directions() {
    assert_eq!(Orientation::new(&P1, &P3, &P2), Orientation::CounterClockWise);
    assert_eq!(Orientation::new(&P1, &P2, &P3), Orientation::ClockWise);
    assert_eq!(Orientation::new(&P1, &P2, &P5), Orientation::CoLinear);
  }

  #[test]
  fn signed_area_is_twice_triangle_area() {
    assert_eq!(signed_area_2x(&P1, &P3, &P2), 1);
    assert_eq!(signed_area_2x(&Point::new(0, 0), &Point::new(10, 0), &Point::new(0, 10)), 100);
  }

  #[test]
  fn on_segment_boundaries() {
    assert!(point_on_segment(P2, (P1, P5)));
    assert!(point_on_segment(P1, (P1, P5)));
    assert!(!point_on_segment(P5, (P1, P2)));
    assert!(!point_on_segment(P4, (P1, P5)));
  }

  #[test]
  fn crossing() {
    assert!(segments_intersect((P1, P2), (P3, P4)));
    assert!(segments_properly_intersect((P1, P2), (P3, P4)));
  }

  #[test]
  fn disjoint() {
    assert!(!segments_intersect((P1, P4), (P3, P6)));
  }

  #[test]
  fn touch_at_endpoint_is_not_proper() {
    assert!(segments_intersect((P1, P3), (P3, P6)));
    assert!(!segments_properly_intersect((P1, P3), (P3, P6)));
  }

  #[test]
  fn endpoint_in_segment_interior_is_proper() {
    // P3 sits in the interior of P1..P6.
    assert!(segments_intersect((P1, P6), (P3, P2)));
    assert!(segments_properly_intersect((P1, P6), (P3, P2)));
  }

  #[test]
  fn colinear_overlap() {
    assert!(segments_intersect((P1, P5), (P2, Point::new(3, 3))));
    assert!(!segments_intersect((P1, P2), (P5, Point::new(3, 3))));
  }

  #[proptest]
  fn intersect_is_symmetric(pts: [i8; 8]) {
    let [a, b, c, d, e, f, g, h] = pts.map(i64::from);
    let s = (Point::new(a, b), Point::new(c, d));
    let t = (Point::new(e, f), Point::new(g, h));
    assert_eq!(segments_intersect(s, t), segments_intersect(t, s));
    assert_eq!(
      segments_properly_intersect(s, t),
      segments_properly_intersect(t, s)
    );
  }

  #[proptest]
  fn orientation_flips_with_argument_swap(pts: [i8; 6]) {
    let [a, b, c, d, e, f] = pts.map(i64::from);
    let (p, q, r) = (Point::new(a, b), Point::new(c, d), Point::new(e, f));
    assert_eq!(Orientation::new(&p, &q, &r), Orientation::new(&p, &r, &q).reverse());
  }
}
