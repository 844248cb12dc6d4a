use ahash::{AHashMap, AHashSet};
use glam::DVec2;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::{Result, VoronoiError};

mod beachline;
mod circle;
mod edge;
mod event_queue;
mod options;
mod sweep;
mod validation;


pub use edge::{SupportLine, VoronoiEdge};
pub use options::{SweepDirection, VoronoiOptions, DEFAULT_TOLERANCE};
pub use sweep::{SweepStep, SweepStepKind};
pub use validation::ValidationReport;

use sweep::Sweep;

/// The main Voronoi struct
#[derive(Clone, Debug)]
pub struct Voronoi {
    sites: Vec<DVec2>,
    edges: Vec<VoronoiEdge>,
    steps: Vec<SweepStep>,
    processed_events: usize,
    options: VoronoiOptions,
    tolerance: f64,
}

impl Voronoi {
    /// Construct the Voronoi diagram of `sites` with the default options.
    ///
    /// See [`Voronoi::build_with`].
    pub fn build(sites: &[DVec2]) -> Result<Self> {
        Self::build_with(sites, &VoronoiOptions::default())
    }

    /// Construct the Voronoi diagram of `sites` using Fortune's sweep line
    /// algorithm.
    ///
    /// The sites must be finite and pairwise distinct. Edges refer to the
    /// sites by their index in `sites`.
    pub fn build_with(sites: &[DVec2], options: &VoronoiOptions) -> Result<Self> {
        check_sites(sites)?;

        let direction = options.direction;
        let rotated: Vec<DVec2> = sites
            .iter()
            .map(|&site| direction.to_sweep_frame(site))
            .collect();
        let output = Sweep::new(&rotated, options).run()?;

        Ok(Voronoi {
            sites: sites.to_vec(),
            edges: output.edges,
            steps: output.steps,
            processed_events: output.processed_events,
            options: *options,
            tolerance: options.tolerance_for(sites),
        })
    }

    /// Construct the Voronoi diagrams of several independent sets of sites.
    /// This method runs in parallel if the `"rayon"` feature is enabled.
    pub fn build_many(site_sets: &[Vec<DVec2>], options: &VoronoiOptions) -> Vec<Result<Self>> {
        debug!(count = site_sets.len(), "Building Voronoi diagrams");
        #[cfg(feature = "rayon")]
        let diagrams = site_sets
            .par_iter()
            .map(|sites| Self::build_with(sites, options))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let diagrams = site_sets
            .iter()
            .map(|sites| Self::build_with(sites, options))
            .collect();
        diagrams
    }

    /// Get the sites.
    pub fn sites(&self) -> &[DVec2] {
        self.sites.as_ref()
    }

    /// Get the Voronoi edges: first the edges terminated by a Voronoi vertex,
    /// in the order in which they were closed, then the unbounded ones in the
    /// order in which they were created.
    pub fn edges(&self) -> &[VoronoiEdge] {
        self.edges.as_ref()
    }

    /// Get a vector of the Voronoi edges by consuming the Voronoi struct.
    pub fn into_edges(self) -> Vec<VoronoiEdge> {
        self.edges
    }

    pub fn options(&self) -> &VoronoiOptions {
        &self.options
    }

    /// The absolute tolerance the diagram was built with, see
    /// [`VoronoiOptions::tolerance_for`].
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The recorded sweep steps, empty unless
    /// [`VoronoiOptions::record_trace`] was set.
    pub fn sweep_steps(&self) -> &[SweepStep] {
        self.steps.as_ref()
    }

    /// The number of events taken from the event queue, including discarded
    /// stale circle events.
    pub fn processed_events(&self) -> usize {
        self.processed_events
    }

    /// The distinct Voronoi vertices, in the order in which they were found.
    ///
    /// Vertices closer to each other than the tolerance (e.g. the centers of
    /// four or more cocircular sites) are reported once.
    pub fn vertices(&self) -> Vec<DVec2> {
        let tolerance = self.tolerance.max(f64::MIN_POSITIVE);
        let cell = |p: DVec2| {
            (
                (p.x / tolerance).floor() as i64,
                (p.y / tolerance).floor() as i64,
            )
        };

        let mut grid: AHashMap<(i64, i64), Vec<usize>> = AHashMap::new();
        let mut vertices: Vec<DVec2> = vec![];
        for end in self.edges.iter().filter_map(|edge| edge.end()) {
            let (i, j) = cell(end);
            let duplicate = (i.saturating_sub(1)..=i.saturating_add(1))
                .flat_map(|i| (j.saturating_sub(1)..=j.saturating_add(1)).map(move |j| (i, j)))
                .filter_map(|key| grid.get(&key))
                .flatten()
                .any(|&idx| vertices[idx].distance(end) <= tolerance);
            if !duplicate {
                grid.entry((i, j)).or_default().push(vertices.len());
                vertices.push(end);
            }
        }
        vertices
    }
}

/// Reject input the sweep cannot handle: no sites, non-finite coordinates and
/// repeated sites.
fn check_sites(sites: &[DVec2]) -> Result<()> {
    if sites.is_empty() {
        return Err(VoronoiError::EmptyInput);
    }
    if let Some(index) = sites.iter().position(|site| !site.is_finite()) {
        return Err(VoronoiError::NonFiniteSite { index });
    }

    let mut seen = AHashMap::with_capacity(sites.len());
    for (second, site) in sites.iter().enumerate() {
        // adding 0 maps -0 to +0
        let key = [site.x + 0., site.y + 0.].map(f64::to_bits);
        if let Some(&first) = seen.get(&key) {
            return Err(VoronoiError::DuplicateSite { first, second });
        }
        seen.insert(key, second);
    }
    Ok(())
}

/// The distinct unordered pairs of sites separated by an edge.
fn site_pairs(edges: &[VoronoiEdge]) -> AHashSet<(usize, usize)> {
    edges
        .iter()
        .map(|edge| {
            let (a, b) = (edge.left_site(), edge.right_site());
            (a.min(b), a.max(b))
        })
        .collect()
}
