//! A few general-purpose geometry functions and structs used by the sweep,
//! which might also be useful for users of this library.

use glam::DVec2;

use crate::{Result, VoronoiError};

/// A parabola `y = a·x² + b·x + c` with a horizontal directrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    /// The parabola of points equidistant from `focus` and the horizontal line
    /// `y = directrix`.
    ///
    /// Fails with [`VoronoiError::DegenerateParabola`] when the focus lies on
    /// the directrix (within `tolerance`): the parabola collapses to a
    /// vertical ray and has no quadratic form.
    pub fn from_focus_directrix(focus: DVec2, directrix: f64, tolerance: f64) -> Result<Self> {
        if focus_on_directrix(focus, directrix, tolerance) {
            return Err(VoronoiError::DegenerateParabola {
                site: focus,
                directrix,
            });
        }
        // p is the distance between the vertex and the focus (or the directrix)
        let p = 0.5 * (focus.y - directrix);
        let k = 0.5 * (focus.y + directrix);
        let one_over_4p = 0.25 / p;
        Ok(Self {
            a: one_over_4p,
            b: -focus.x * 2. * one_over_4p,
            c: focus.x * focus.x * one_over_4p + k,
        })
    }

    /// Evaluate the parabola at `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    /// The real roots of `self - (slope·x + intercept)`, in ascending order.
    ///
    /// A slightly negative discriminant is treated as a tangent line, since
    /// the breakpoints of a site lying just above the sweep line coincide up to
    /// rounding.
    pub fn intersect_line(&self, slope: f64, intercept: f64) -> (f64, f64) {
        let b = self.b - slope;
        let c = self.c - intercept;
        let sqrt_d = (b * b - 4. * self.a * c).max(0.).sqrt();
        let one_over_2a = 0.5 / self.a;
        let x0 = (-b - sqrt_d) * one_over_2a;
        let x1 = (-b + sqrt_d) * one_over_2a;
        (x0.min(x1), x0.max(x1))
    }
}

/// Whether the parabola with this focus and directrix has collapsed to a
/// vertical ray (also true for NaN input).
pub fn focus_on_directrix(focus: DVec2, directrix: f64, tolerance: f64) -> bool {
    !((focus.y - directrix).abs() > tolerance)
}

/// Convenience wrapper around [`Parabola::from_focus_directrix`] and
/// [`Parabola::y_at`].
pub fn parabola_y_at(focus: DVec2, directrix: f64, x: f64, tolerance: f64) -> Result<f64> {
    Ok(Parabola::from_focus_directrix(focus, directrix, tolerance)?.y_at(x))
}

/// A simple circle struct.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The circle centered at `center` passing through `point`.
    pub fn through(center: DVec2, point: DVec2) -> Self {
        Self::new(center, center.distance(point))
    }

    /// Circumscribed circle through three given points.
    ///
    /// Returns `None` for collinear points.
    ///
    /// See <https://www.wikiwand.com/en/Circumscribed_circle#Cartesian_coordinates_2>.
    pub fn from_three_points(a: DVec2, b: DVec2, c: DVec2) -> Option<Self> {
        let b = b - a;
        let c = c - a;
        let d = 2. * b.perp_dot(c);
        if d == 0. {
            return None;
        }
        let b_2 = b.length_squared();
        let c_2 = c.length_squared();
        let center = DVec2::new(c.y * b_2 - b.y * c_2, b.x * c_2 - c.x * b_2) / d;

        Some(Self::new(center + a, center.length()))
    }

    /// The lowest point of the circle, where a horizontal sweep line moving
    /// downwards last touches it.
    pub fn bottom(&self) -> DVec2 {
        DVec2::new(self.center.x, self.center.y - self.radius)
    }
}

/// Growth direction of the bisector between two sites that neighbour each
/// other on a horizontal line, `left` to the left of `right`.
///
/// Points downwards when `left` and `right` lie on the same height.
pub fn bisector_direction(left: DVec2, right: DVec2) -> DVec2 {
    DVec2::new(right.y - left.y, left.x - right.x)
}
