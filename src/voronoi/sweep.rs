use glam::DVec2;
use tracing::{debug, trace};

use super::{
    beachline::{Beachline, NodeId},
    circle,
    edge::VoronoiEdge,
    event_queue::{Event, EventId, EventQueue},
    options::VoronoiOptions,
};
use crate::{Result, VoronoiError};

/// What happened during one step of the sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SweepStepKind {
    /// The site with the given index was inserted into the beachline.
    Site { site: usize },
    /// An arc vanished at the given Voronoi vertex.
    Circle { vertex: DVec2 },
    /// A circle event whose arc no longer refers to it was discarded.
    StaleCircle,
}

/// A record of one processed event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepStep {
    pub kind: SweepStepKind,
    /// The position of the event.
    pub point: DVec2,
    /// The sweep coordinate after processing the event: the y-coordinate of
    /// the horizontal sweep line, or the x-coordinate of the vertical one for
    /// [`SweepDirection::LeftToRight`](crate::SweepDirection::LeftToRight).
    pub sweep: f64,
}

pub(super) struct SweepOutput {
    pub edges: Vec<VoronoiEdge>,
    pub steps: Vec<SweepStep>,
    pub processed_events: usize,
}

/// Fortune's sweep over a set of sites, in the frame where the sweep line is
/// horizontal and moves downwards.
pub(super) struct Sweep<'a> {
    sites: &'a [DVec2],
    options: &'a VoronoiOptions,
    tolerance: f64,
    queue: EventQueue,
    beachline: Beachline,
    edges: Vec<VoronoiEdge>,
    closed: Vec<usize>,
    sweep_y: f64,
    processed_events: usize,
    steps: Vec<SweepStep>,
}

impl<'a> Sweep<'a> {
    /// Set up the sweep, with one site event per site.
    pub fn new(sites: &'a [DVec2], options: &'a VoronoiOptions) -> Self {
        let mut queue = EventQueue::with_capacity(2 * sites.len());
        for (idx, &site) in sites.iter().enumerate() {
            queue.insert(site, Event::Site(idx));
        }
        let tolerance = options.tolerance_for(sites);
        debug!(tolerance, "Resolved sweep tolerance");
        Self {
            sites,
            options,
            tolerance,
            queue,
            beachline: Beachline::with_capacity(6 * sites.len()),
            edges: Vec::with_capacity(3 * sites.len()),
            closed: vec![],
            sweep_y: f64::INFINITY,
            processed_events: 0,
            steps: vec![],
        }
    }

    /// Drain the event queue.
    pub fn run(mut self) -> Result<SweepOutput> {
        debug!(
            sites = self.sites.len(),
            queued = self.queue.len(),
            "Starting sweep"
        );
        while self.step()?.is_some() {}
        debug!(
            edges = self.edges.len(),
            closed = self.closed.len(),
            events = self.processed_events,
            "Sweep finished"
        );
        Ok(self.finish())
    }

    /// Process the next event, returning `None` once the queue is empty.
    fn step(&mut self) -> Result<Option<SweepStep>> {
        let Some((id, point, event)) = self.queue.pop() else {
            return Ok(None);
        };
        self.process(id, point, event).map(Some)
    }

    fn process(&mut self, id: EventId, point: DVec2, event: Event) -> Result<SweepStep> {
        self.processed_events += 1;
        if let Some(limit) = self.options.max_events {
            if self.processed_events > limit {
                return Err(VoronoiError::EventBudgetExhausted { limit });
            }
        }
        // Circle events scheduled within the tolerance above the sweep line
        // must not move it back up.
        self.sweep_y = self.sweep_y.min(point.y);

        let kind = match event {
            Event::Site(site) => {
                trace!(site, x = point.x, y = point.y, "Site event");
                self.handle_site(site)?;
                SweepStepKind::Site { site }
            }
            Event::Circle { arc, vertex } => {
                if self.handle_circle(id, arc)? {
                    SweepStepKind::Circle { vertex }
                } else {
                    SweepStepKind::StaleCircle
                }
            }
        };
        let step = SweepStep {
            kind,
            point,
            sweep: self.sweep_y,
        };
        if self.options.record_trace {
            self.steps.push(step);
        }
        Ok(step)
    }

    fn handle_site(&mut self, site: usize) -> Result<()> {
        if self.beachline.is_empty() {
            self.beachline.init(site);
            return Ok(());
        }

        let tolerance = self.tolerance;
        let arc = self.beachline.locate_arc_above(
            self.sites[site].x,
            self.sweep_y,
            self.sites,
            &self.edges,
            tolerance,
        )?;
        self.invalidate(arc);
        let [left, right] = self.beachline.split_arc(
            arc,
            site,
            self.sweep_y,
            self.sites,
            &mut self.edges,
            tolerance,
        )?;
        self.check(left)?;
        self.check(right)
    }

    /// Remove the arc of a circle event. Returns `false` if the event was
    /// stale and has been discarded.
    fn handle_circle(&mut self, id: EventId, arc: NodeId) -> Result<bool> {
        if self.beachline.circle(arc) != Some(id) {
            debug!(?id, "Discarding stale circle event");
            return Ok(false);
        }
        self.beachline.take_circle(arc);

        let removal =
            self.beachline
                .remove_arc(arc, self.sites, &mut self.edges, self.tolerance)?;
        trace!(x = removal.vertex.x, y = removal.vertex.y, "Circle event");
        self.closed.extend(removal.closed);

        self.invalidate(removal.left);
        self.invalidate(removal.right);
        self.check(removal.left)?;
        self.check(removal.right)?;
        Ok(true)
    }

    /// Retract the pending circle event of `arc`, if any.
    fn invalidate(&mut self, arc: NodeId) {
        if let Some(id) = self.beachline.take_circle(arc) {
            trace!(?id, "Invalidating circle event");
            self.queue.remove(id);
        }
    }

    /// Schedule a circle event for `arc` if its edges converge below the sweep
    /// line.
    fn check(&mut self, arc: NodeId) -> Result<()> {
        let detected = circle::detect(
            &self.beachline,
            arc,
            self.sweep_y,
            self.sites,
            &self.edges,
            self.tolerance,
        )?;
        if let Some(event) = detected {
            trace!(x = event.point.x, y = event.point.y, "Scheduling circle event");
            let id = self.queue.insert(
                event.point,
                Event::Circle {
                    arc,
                    vertex: event.vertex,
                },
            );
            self.beachline.set_circle(arc, id)?;
        }
        Ok(())
    }

    /// Order the edges (closed edges in closing order, then the open ones in
    /// creation order) and rotate everything back into the frame of the
    /// caller.
    fn finish(self) -> SweepOutput {
        let mut order = self.closed;
        order.extend((0..self.edges.len()).filter(|&idx| !self.edges[idx].is_closed()));
        let mut new_idx = vec![0; self.edges.len()];
        for (new, &old) in order.iter().enumerate() {
            new_idx[old] = new;
        }

        let direction = self.options.direction;
        let edges = order
            .iter()
            .map(|&old| {
                let edge = self.edges[old].clone();
                let adjacent = edge.adjacent().map(|adjacent| new_idx[adjacent]);
                edge.map(|p| direction.from_sweep_frame(p), adjacent)
            })
            .collect();
        let steps = self
            .steps
            .into_iter()
            .map(|step| SweepStep {
                kind: match step.kind {
                    SweepStepKind::Circle { vertex } => SweepStepKind::Circle {
                        vertex: direction.from_sweep_frame(vertex),
                    },
                    kind => kind,
                },
                point: direction.from_sweep_frame(step.point),
                sweep: direction.sweep_position(step.sweep),
            })
            .collect();

        SweepOutput {
            edges,
            steps,
            processed_events: self.processed_events,
        }
    }
}
