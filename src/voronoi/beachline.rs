use glam::DVec2;

use super::{
    edge::{intersect, SupportLine, VoronoiEdge},
    event_queue::EventId,
};
use crate::{
    geometry::{focus_on_directrix, Parabola},
    Result, VoronoiError,
};

/// Handle of a node in the [`Beachline`] arena. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) struct NodeId(usize);

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    /// A parabolic arc of the site with the given index, with its pending
    /// circle event (if any).
    Arc {
        site: usize,
        circle: Option<EventId>,
    },
    /// A breakpoint tracing out the edge with the given index.
    Edge { edge: usize },
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// The result of [`Beachline::remove_arc`].
#[derive(Clone, Copy, Debug)]
pub(super) struct ArcRemoval {
    /// The arcs that became neighbours.
    pub left: NodeId,
    pub right: NodeId,
    /// The Voronoi vertex where the arc vanished.
    pub vertex: DVec2,
    /// The two edges terminated at `vertex`.
    pub closed: [usize; 2],
}

/// The beachline: an alternating sequence of arcs and breakpoints (edges),
/// stored as a doubly linked list in an arena.
///
/// The sequence always starts and ends with an arc, and every edge node lies
/// between the arcs of the two sites it separates.
#[derive(Clone, Debug, Default)]
pub(super) struct Beachline {
    nodes: Vec<Node>,
    head: Option<NodeId>,
}

impl Beachline {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Start the beachline with a single arc.
    pub fn init(&mut self, site: usize) -> NodeId {
        debug_assert!(self.is_empty(), "Beachline already initialized!");
        let arc = self.push(NodeKind::Arc { site, circle: None });
        self.head = Some(arc);
        arc
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            prev: None,
            next: None,
        });
        id
    }

    fn link(&mut self, left: NodeId, right: Option<NodeId>) {
        self.nodes[left.0].next = right;
        if let Some(right) = right {
            self.nodes[right.0].prev = Some(left);
        }
    }

    fn unlink(&mut self, node: NodeId) {
        self.nodes[node.0].prev = None;
        self.nodes[node.0].next = None;
    }

    fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].prev
    }

    fn next(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next
    }

    /// The site of an arc node.
    pub fn site(&self, arc: NodeId) -> Result<usize> {
        match self.nodes[arc.0].kind {
            NodeKind::Arc { site, .. } => Ok(site),
            NodeKind::Edge { .. } => Err(VoronoiError::InvariantViolation(
                "expected an arc node, found an edge node",
            )),
        }
    }

    fn edge(&self, node: NodeId) -> Result<usize> {
        match self.nodes[node.0].kind {
            NodeKind::Edge { edge } => Ok(edge),
            NodeKind::Arc { .. } => Err(VoronoiError::InvariantViolation(
                "expected an edge node, found an arc node",
            )),
        }
    }

    /// The edge bounding `arc` on the left, if any.
    pub fn left_edge(&self, arc: NodeId) -> Result<Option<usize>> {
        self.prev(arc).map(|node| self.edge(node)).transpose()
    }

    /// The edge bounding `arc` on the right, if any.
    pub fn right_edge(&self, arc: NodeId) -> Result<Option<usize>> {
        self.next(arc).map(|node| self.edge(node)).transpose()
    }

    /// The pending circle event of `arc`.
    pub fn circle(&self, arc: NodeId) -> Option<EventId> {
        match self.nodes[arc.0].kind {
            NodeKind::Arc { circle, .. } => circle,
            NodeKind::Edge { .. } => None,
        }
    }

    /// Attach a circle event to `arc`, which must not have one already.
    pub fn set_circle(&mut self, arc: NodeId, event: EventId) -> Result<()> {
        match &mut self.nodes[arc.0].kind {
            NodeKind::Arc {
                circle: circle @ None,
                ..
            } => {
                *circle = Some(event);
                Ok(())
            }
            NodeKind::Arc { .. } => Err(VoronoiError::InvariantViolation(
                "arc already has a pending circle event",
            )),
            NodeKind::Edge { .. } => Err(VoronoiError::InvariantViolation(
                "circle events can only be attached to arcs",
            )),
        }
    }

    /// Detach and return the pending circle event of `arc`.
    pub fn take_circle(&mut self, arc: NodeId) -> Option<EventId> {
        match &mut self.nodes[arc.0].kind {
            NodeKind::Arc { circle, .. } => circle.take(),
            NodeKind::Edge { .. } => None,
        }
    }

    /// Find the arc directly above `x`, for a sweep line at height `sweep_y`.
    ///
    /// Walks the beachline from left to right and returns the first arc whose
    /// right breakpoint lies to the right of `x`, or the last arc.
    pub fn locate_arc_above(
        &self,
        x: f64,
        sweep_y: f64,
        sites: &[DVec2],
        edges: &[VoronoiEdge],
        tolerance: f64,
    ) -> Result<NodeId> {
        let mut arc = self
            .head
            .ok_or(VoronoiError::InvariantViolation("empty beachline"))?;
        while let Some(edge_node) = self.next(arc) {
            let edge = &edges[self.edge(edge_node)?];
            let focus = sites[self.site(arc)?];
            if x < breakpoint_x(focus, edge, sweep_y, tolerance)? {
                return Ok(arc);
            }
            arc = self
                .next(edge_node)
                .ok_or(VoronoiError::InvariantViolation("beachline ends in an edge"))?;
        }
        Ok(arc)
    }

    /// Split `arc` by the arc of the new site `site`, whose event is being
    /// processed at `sweep_y`.
    ///
    /// The two new edges start at the point of `arc` directly above `site`
    /// and grow in opposite directions. The existing node becomes the left
    /// copy of the split arc and a fresh node the right copy; both are
    /// returned.
    ///
    /// If `arc` itself still lies on the sweep line (sites sharing the
    /// topmost y-coordinate), the new arc is placed beside it, separated by a
    /// single vertical edge.
    pub fn split_arc(
        &mut self,
        arc: NodeId,
        site: usize,
        sweep_y: f64,
        sites: &[DVec2],
        edges: &mut Vec<VoronoiEdge>,
        tolerance: f64,
    ) -> Result<[NodeId; 2]> {
        if self.circle(arc).is_some() {
            return Err(VoronoiError::InvariantViolation(
                "splitting an arc with a pending circle event",
            ));
        }
        let arc_site = self.site(arc)?;
        let focus = sites[arc_site];
        if focus_on_directrix(focus, sweep_y, tolerance) {
            return self.insert_beside(arc, site, sites, edges);
        }

        let new_site = sites[site];
        let parabola = Parabola::from_focus_directrix(focus, sweep_y, tolerance)?;
        let start = DVec2::new(new_site.x, parabola.y_at(new_site.x));

        let left_edge = edges.len();
        let right_edge = left_edge + 1;
        edges.push(VoronoiEdge::bisector(start, arc_site, site, sites));
        edges.push(VoronoiEdge::bisector(start, site, arc_site, sites));
        edges[left_edge].set_adjacent(Some(right_edge));
        edges[right_edge].set_adjacent(Some(left_edge));

        let next = self.next(arc);
        let left_node = self.push(NodeKind::Edge { edge: left_edge });
        let middle = self.push(NodeKind::Arc { site, circle: None });
        let right_node = self.push(NodeKind::Edge { edge: right_edge });
        let right_copy = self.push(NodeKind::Arc {
            site: arc_site,
            circle: None,
        });
        self.link(right_copy, next);
        self.link(right_node, Some(right_copy));
        self.link(middle, Some(right_node));
        self.link(left_node, Some(middle));
        self.link(arc, Some(left_node));

        Ok([arc, right_copy])
    }

    /// Place the arc of `site` next to `arc`, whose site lies on the sweep
    /// line as well. Only possible at either end of the beachline.
    fn insert_beside(
        &mut self,
        arc: NodeId,
        site: usize,
        sites: &[DVec2],
        edges: &mut Vec<VoronoiEdge>,
    ) -> Result<[NodeId; 2]> {
        let arc_site = self.site(arc)?;
        let (focus, new_site) = (sites[arc_site], sites[site]);
        let (left, right) = if new_site.x < focus.x && self.prev(arc).is_none() {
            (site, arc_site)
        } else if new_site.x > focus.x && self.next(arc).is_none() {
            (arc_site, site)
        } else {
            return Err(VoronoiError::DegenerateInput {
                site,
                reason: "site lies on the sweep line next to an inner arc",
            });
        };

        // The bisector of two sites on the sweep line is vertical and reaches
        // up to infinity.
        let start = DVec2::new(0.5 * (focus.x + new_site.x), f64::INFINITY);
        let edge = edges.len();
        edges.push(VoronoiEdge::bisector(start, left, right, sites));

        let new_arc = self.push(NodeKind::Arc { site, circle: None });
        let edge_node = self.push(NodeKind::Edge { edge });
        if left == site {
            self.link(new_arc, Some(edge_node));
            self.link(edge_node, Some(arc));
            self.head = Some(new_arc);
        } else {
            self.link(arc, Some(edge_node));
            self.link(edge_node, Some(new_arc));
        }

        Ok([arc, new_arc])
    }

    /// Remove a vanishing arc from the beachline.
    ///
    /// Its two bounding edges are terminated at their intersection (the
    /// Voronoi vertex) and replaced by a single new edge between the arcs
    /// that become neighbours. The caller is responsible for the circle
    /// events of those arcs.
    pub fn remove_arc(
        &mut self,
        arc: NodeId,
        sites: &[DVec2],
        edges: &mut Vec<VoronoiEdge>,
        tolerance: f64,
    ) -> Result<ArcRemoval> {
        let missing = VoronoiError::InvariantViolation("vanishing arc is not bounded by two edges");
        let left_node = self.prev(arc).ok_or(missing.clone())?;
        let right_node = self.next(arc).ok_or(missing.clone())?;
        let left = self.prev(left_node).ok_or(missing.clone())?;
        let right = self.next(right_node).ok_or(missing)?;
        let (left_edge, right_edge) = (self.edge(left_node)?, self.edge(right_node)?);

        let vertex = intersect(&edges[left_edge], &edges[right_edge], tolerance).ok_or(
            VoronoiError::InvariantViolation("edges of a vanishing arc do not converge"),
        )?;
        edges[left_edge].close(vertex)?;
        edges[right_edge].close(vertex)?;

        let edge = edges.len();
        edges.push(VoronoiEdge::bisector(
            vertex,
            self.site(left)?,
            self.site(right)?,
            sites,
        ));
        let edge_node = self.push(NodeKind::Edge { edge });
        self.link(left, Some(edge_node));
        self.link(edge_node, Some(right));

        self.take_circle(arc);
        for node in [left_node, arc, right_node] {
            self.unlink(node);
        }

        Ok(ArcRemoval {
            left,
            right,
            vertex,
            closed: [left_edge, right_edge],
        })
    }

    /// Iterate over the arcs from left to right.
    #[cfg(test)]
    pub fn arcs(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut node = self.head;
        std::iter::from_fn(move || {
            let current = node?;
            node = self.next(current).and_then(|edge| self.next(edge));
            Some(current)
        })
    }

    /// Check the structure of the beachline: consistent links, strict
    /// alternation of arcs and edges, and edges lying between the arcs of
    /// their own sites.
    #[cfg(test)]
    pub fn check_links(&self, edges: &[VoronoiEdge]) -> Result<()> {
        let broken = VoronoiError::InvariantViolation("broken beachline");
        let Some(head) = self.head else {
            return Ok(());
        };
        if self.prev(head).is_some() {
            return Err(broken);
        }
        let mut arc = head;
        while let Some(edge_node) = self.next(arc) {
            let next_arc = self.next(edge_node).ok_or(broken.clone())?;
            if self.prev(edge_node) != Some(arc) || self.prev(next_arc) != Some(edge_node) {
                return Err(broken);
            }
            let edge = &edges[self.edge(edge_node)?];
            if edge.left_site() != self.site(arc)? || edge.right_site() != self.site(next_arc)? {
                return Err(broken);
            }
            arc = next_arc;
        }
        self.site(arc).map(|_| ())
    }
}

/// The x-coordinate of the breakpoint between the arc of `focus` and the
/// arc to its right, separated by `edge`.
fn breakpoint_x(focus: DVec2, edge: &VoronoiEdge, sweep_y: f64, tolerance: f64) -> Result<f64> {
    let (slope, intercept) = match edge.line() {
        SupportLine::Vertical { x } => return Ok(x),
        SupportLine::Sloped { slope, intercept } => (slope, intercept),
    };
    // The arc is still a vertical ray through its site.
    if focus_on_directrix(focus, sweep_y, tolerance) {
        return Ok(focus.x);
    }
    let parabola = Parabola::from_focus_directrix(focus, sweep_y, tolerance)?;
    let (min, max) = parabola.intersect_line(slope, intercept);
    Ok(if edge.direction().x < 0. { min } else { max })
}
