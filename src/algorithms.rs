pub mod convex_hull;
pub mod greedy;
pub mod local_search;

pub use convex_hull::{hull_with_boundary_points, score};
