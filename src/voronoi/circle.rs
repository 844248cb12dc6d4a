use glam::DVec2;

use super::{
    beachline::{Beachline, NodeId},
    edge::{intersect, VoronoiEdge},
};
use crate::{geometry::Circle, Result};

/// A predicted disappearance of an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CircleEvent {
    /// Where the sweep line touches the bottom of the circle, i.e. when the
    /// event fires.
    pub point: DVec2,
    /// The center of the circle: the Voronoi vertex the arc shrinks into.
    pub vertex: DVec2,
}

/// Check whether the edges bounding `arc` converge ahead of the sweep line.
///
/// Returns the circle event to schedule for `arc`, or `None` if the arc is
/// at either end of the beachline, its edges diverge, or the event would lie
/// above `sweep_y`. An arc whose own site is the bottom of the circle has
/// just been born below a Voronoi vertex and never vanishes there.
pub(super) fn detect(
    beachline: &Beachline,
    arc: NodeId,
    sweep_y: f64,
    sites: &[DVec2],
    edges: &[VoronoiEdge],
    tolerance: f64,
) -> Result<Option<CircleEvent>> {
    let (Some(left), Some(right)) = (beachline.left_edge(arc)?, beachline.right_edge(arc)?) else {
        return Ok(None);
    };
    let Some(vertex) = intersect(&edges[left], &edges[right], tolerance) else {
        return Ok(None);
    };

    let site = sites[beachline.site(arc)?];
    let point = Circle::through(vertex, site).bottom();
    if point.y > sweep_y + tolerance || site.y - point.y <= tolerance {
        return Ok(None);
    }

    Ok(Some(CircleEvent { point, vertex }))
}
