//! Planar geometry shared by the simulation: points, rectangles and the
//! fixed enemy path.

use serde::{Deserialize, Serialize};

use crate::PathError;

/// Location on the board expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Upper-left corner of the rectangle.
    pub origin: Point,
    /// Horizontal extent in world units.
    pub width: f64,
    /// Vertical extent in world units.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }
}

/// Fixed polyline that enemies follow from the first to the last waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct PathModel {
    waypoints: Vec<Point>,
}

impl PathModel {
    /// Builds a path from its waypoints.
    ///
    /// At least two waypoints are required and no two consecutive waypoints
    /// may coincide.
    pub fn new(waypoints: Vec<Point>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        if let Some(index) = waypoints.windows(2).position(|pair| pair[0] == pair[1]) {
            return Err(PathError::RepeatedWaypoint { index: index + 1 });
        }

        Ok(Self { waypoints })
    }

    /// Waypoint stored at the provided index, if any.
    #[must_use]
    pub fn point_at(&self, index: usize) -> Option<Point> {
        self.waypoints.get(index).copied()
    }

    /// First waypoint, where enemies enter the board.
    #[must_use]
    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Iterator over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Shortest distance from `point` to any segment of the path.
    #[must_use]
    pub fn min_distance_to_path(&self, point: Point) -> f64 {
        self.segments()
            .map(|(start, end)| distance_to_segment(point, start, end))
            .fold(f64::INFINITY, f64::min)
    }

    /// Reports whether `point` lies strictly within `clearance` of the road.
    #[must_use]
    pub fn is_on_road(&self, point: Point, clearance: f64) -> bool {
        self.min_distance_to_path(point) < clearance
    }
}

fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let segment_x = end.x - start.x;
    let segment_y = end.y - start.y;
    let length_sq = segment_x * segment_x + segment_y * segment_y;
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point.x - start.x) * segment_x + (point.y - start.y) * segment_y) / length_sq;
    let t = t.clamp(0.0, 1.0);
    let projection = Point::new(start.x + t * segment_x, start.y + t * segment_y);
    point.distance(projection)
}
