use glam::DVec2;

use crate::{geometry::bisector_direction, Result, VoronoiError};

/// The line supporting a [`VoronoiEdge`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SupportLine {
    /// `y = slope·x + intercept`
    Sloped { slope: f64, intercept: f64 },
    /// `x = x`, the bisector of two sites at the same height.
    Vertical { x: f64 },
}

impl SupportLine {
    /// The line through `point` along `direction`.
    ///
    /// `point` may lie at infinity along `direction`.
    fn through(point: DVec2, direction: DVec2) -> Self {
        if direction.x == 0. {
            return SupportLine::Vertical { x: point.x };
        }
        let slope = direction.y / direction.x;
        // avoid 0·∞ for horizontal lines through a point at infinity
        let intercept = if slope == 0. {
            point.y
        } else {
            point.y - slope * point.x
        };
        SupportLine::Sloped { slope, intercept }
    }
}

/// A Voronoi edge between two neighbouring sites.
///
/// Every edge is a ray growing from `start` in `direction`. It is terminated
/// by a Voronoi vertex once the arc between its two sites vanishes from the
/// beachline; edges that never reconverge keep `end == None` and extend
/// indefinitely.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiEdge {
    start: DVec2,
    end: Option<DVec2>,
    left: usize,
    right: usize,
    line: SupportLine,
    direction: DVec2,
    adjacent: Option<usize>,
}

impl VoronoiEdge {
    /// The bisector of the sites `left` and `right` (as seen on the beachline),
    /// growing from `start`.
    pub(super) fn bisector(start: DVec2, left: usize, right: usize, sites: &[DVec2]) -> Self {
        let direction = bisector_direction(sites[left], sites[right]);
        Self {
            start,
            end: None,
            left,
            right,
            line: SupportLine::through(start, direction),
            direction,
            adjacent: None,
        }
    }

    /// Terminate this edge at a Voronoi vertex. An edge can only be closed once.
    pub(super) fn close(&mut self, end: DVec2) -> Result<()> {
        if self.end.is_some() {
            return Err(VoronoiError::InvariantViolation("edge closed twice"));
        }
        self.end = Some(end);
        Ok(())
    }

    pub(super) fn set_adjacent(&mut self, adjacent: Option<usize>) {
        self.adjacent = adjacent;
    }

    /// Whether `point` lies on the forward side of `start`, along both axes.
    fn is_ahead(&self, point: DVec2, tolerance: f64) -> bool {
        let d = point - self.start;
        let behind = |d: f64, dir: f64| dir != 0. && d * dir.signum() < -tolerance;
        !behind(d.x, self.direction.x) && !behind(d.y, self.direction.y)
    }

    /// Get the point where this edge starts.
    ///
    /// Edges between sites on the topmost row of the input start at
    /// `y = +∞`.
    pub fn start(&self) -> DVec2 {
        self.start
    }

    /// Get the Voronoi vertex terminating this edge, if any.
    pub fn end(&self) -> Option<DVec2> {
        self.end
    }

    /// Whether this edge has been terminated by a Voronoi vertex.
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Get the index of the site to the _left_ of this edge (looking along
    /// its direction the site is on the right hand side).
    pub fn left_site(&self) -> usize {
        self.left
    }

    /// Get the index of the site to the _right_ of this edge.
    pub fn right_site(&self) -> usize {
        self.right
    }

    pub fn line(&self) -> SupportLine {
        self.line
    }

    /// Slope of the supporting line, `None` for vertical edges.
    pub fn slope(&self) -> Option<f64> {
        match self.line {
            SupportLine::Sloped { slope, .. } => Some(slope),
            SupportLine::Vertical { .. } => None,
        }
    }

    /// Intercept of the supporting line with the y axis, `None` for vertical
    /// edges.
    pub fn intercept(&self) -> Option<f64> {
        match self.line {
            SupportLine::Sloped { intercept, .. } => Some(intercept),
            SupportLine::Vertical { .. } => None,
        }
    }

    /// Get the (unnormalized) direction in which this edge grows.
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    /// Get the index of the sibling edge born at the same breakpoint, if any.
    pub fn adjacent(&self) -> Option<usize> {
        self.adjacent
    }

    /// Rotate this edge rigidly with `f`, which must map directions as well as
    /// points.
    pub(super) fn map(self, f: impl Fn(DVec2) -> DVec2, adjacent: Option<usize>) -> Self {
        let start = f(self.start);
        let direction = f(self.direction);
        Self {
            start,
            end: self.end.map(&f),
            left: self.left,
            right: self.right,
            line: SupportLine::through(start, direction),
            direction,
            adjacent,
        }
    }
}

/// Intersection of the supporting lines of two edges, provided both edges are
/// actually growing towards it.
///
/// Returns `None` for parallel edges (including two vertical ones) and for
/// intersections behind the start of either edge.
pub(super) fn intersect(a: &VoronoiEdge, b: &VoronoiEdge, tolerance: f64) -> Option<DVec2> {
    let point = match (a.line, b.line) {
        (SupportLine::Vertical { .. }, SupportLine::Vertical { .. }) => return None,
        (SupportLine::Vertical { x }, SupportLine::Sloped { slope, intercept })
        | (SupportLine::Sloped { slope, intercept }, SupportLine::Vertical { x }) => {
            DVec2::new(x, slope * x + intercept)
        }
        (
            SupportLine::Sloped {
                slope: m_a,
                intercept: c_a,
            },
            SupportLine::Sloped {
                slope: m_b,
                intercept: c_b,
            },
        ) => {
            if m_a == m_b {
                return None;
            }
            let x = (c_b - c_a) / (m_a - m_b);
            let y = (m_a * c_b - m_b * c_a) / (m_a - m_b);
            DVec2::new(x, y)
        }
    };

    if !point.is_finite() || !a.is_ahead(point, tolerance) || !b.is_ahead(point, tolerance) {
        return None;
    }
    Some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn sites() -> Vec<DVec2> {
        vec![
            DVec2::new(0., 0.),
            DVec2::new(10., 0.),
            DVec2::new(5., 10.),
        ]
    }

    #[test]
    fn test_bisector() {
        let sites = sites();
        // left breakpoint after site 1 splits the arc of site 2
        let start = DVec2::new(10., 6.25);
        let edge = VoronoiEdge::bisector(start, 2, 1, &sites);
        assert!(edge.direction().x < 0.);
        assert_approx_eq!(f64, edge.slope().unwrap(), 0.5);
        assert_approx_eq!(f64, edge.intercept().unwrap(), 1.25);
        // every point on the line is equidistant from both sites
        let p = DVec2::new(-3., 0.5 * -3. + 1.25);
        assert_approx_eq!(f64, p.distance(sites[2]), p.distance(sites[1]), epsilon = 1e-9);

        let vertical = VoronoiEdge::bisector(DVec2::new(5., f64::INFINITY), 0, 1, &sites);
        assert_eq!(vertical.line(), SupportLine::Vertical { x: 5. });
        assert!(vertical.slope().is_none());
        assert!(vertical.direction().y < 0.);
    }

    #[test]
    fn test_close_once() {
        let sites = sites();
        let mut edge = VoronoiEdge::bisector(DVec2::new(0., 5.), 2, 0, &sites);
        assert!(!edge.is_closed());
        edge.close(DVec2::new(5., 3.75)).unwrap();
        assert!(edge.is_closed());
        assert_eq!(
            edge.close(DVec2::ZERO),
            Err(VoronoiError::InvariantViolation("edge closed twice"))
        );
        assert_eq!(edge.end(), Some(DVec2::new(5., 3.75)));
    }

    #[test]
    fn test_intersect_converging() {
        let sites = sites();
        // the two edges on both sides of the arc of site 2 after inserting
        // site 1 then site 0
        let right = VoronoiEdge::bisector(DVec2::new(10., 6.25), 2, 1, &sites);
        let left = VoronoiEdge::bisector(DVec2::new(0., 6.25), 0, 2, &sites);
        let p = intersect(&left, &right, 1e-9).unwrap();
        assert_approx_eq!(f64, p.x, 5.);
        assert_approx_eq!(f64, p.y, 3.75);
    }

    #[test]
    fn test_intersect_behind() {
        let sites = sites();
        // the edges growing away from each other
        let right = VoronoiEdge::bisector(DVec2::new(10., 6.25), 1, 2, &sites);
        let left = VoronoiEdge::bisector(DVec2::new(0., 6.25), 2, 0, &sites);
        assert!(intersect(&left, &right, 1e-9).is_none());
    }

    #[test]
    fn test_intersect_parallel() {
        let sites = vec![
            DVec2::new(0., 0.),
            DVec2::new(10., 0.),
            DVec2::new(20., 0.),
        ];
        let a = VoronoiEdge::bisector(DVec2::new(5., f64::INFINITY), 0, 1, &sites);
        let b = VoronoiEdge::bisector(DVec2::new(15., f64::INFINITY), 1, 2, &sites);
        assert!(intersect(&a, &b, 1e-9).is_none());

        let sites = vec![
            DVec2::new(0., 0.),
            DVec2::new(1., 1.),
            DVec2::new(2., 2.),
        ];
        let a = VoronoiEdge::bisector(DVec2::new(0., 1.), 1, 0, &sites);
        let b = VoronoiEdge::bisector(DVec2::new(1., 2.), 2, 1, &sites);
        assert!(intersect(&a, &b, 1e-9).is_none());
    }

    #[test]
    fn test_intersect_vertical() {
        let sites = vec![
            DVec2::new(0., 10.),
            DVec2::new(10., 10.),
            DVec2::new(10., 0.),
        ];
        let vertical = VoronoiEdge::bisector(DVec2::new(5., f64::INFINITY), 0, 1, &sites);
        let horizontal = VoronoiEdge::bisector(DVec2::new(10., 5.), 1, 2, &sites);
        let p = intersect(&vertical, &horizontal, 1e-9).unwrap();
        assert_eq!(p, DVec2::new(5., 5.));
    }
}
