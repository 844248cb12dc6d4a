use std::fmt;

use glam::DVec2;
use rstar::RTree;

use super::{options::extent, site_pairs, Voronoi};

/// Relative tolerance of the geometric checks in [`Voronoi::validate`],
/// scaled by the extent of the sites.
const RELATIVE_TOLERANCE: f64 = 1e-6;

/// Outcome of [`Voronoi::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub num_sites: usize,
    pub num_edges: usize,
    /// Edges with a finite endpoint that is not equidistant from the two
    /// sites of the edge.
    pub non_equidistant_edges: usize,
    /// Edges whose adjacent edge does not point back to them.
    pub asymmetric_adjacency: usize,
    /// Voronoi vertices with a site strictly closer than the sites defining
    /// them, i.e. violating the empty circle property.
    pub encroached_vertices: usize,
    /// Number of distinct pairs of sites separated by an edge.
    pub site_pairs: usize,
}

impl ValidationReport {
    /// The number of neighbouring site pairs a planar diagram of this many
    /// sites can have, `None` below three sites.
    pub fn max_site_pairs(&self) -> Option<usize> {
        (self.num_sites >= 3).then(|| 3 * self.num_sites - 6)
    }

    pub fn is_valid(&self) -> bool {
        self.non_equidistant_edges == 0
            && self.asymmetric_adjacency == 0
            && self.encroached_vertices == 0
            && self
                .max_site_pairs()
                .map_or(true, |max| self.site_pairs <= max)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sites: {}, edges: {}", self.num_sites, self.num_edges)?;
        writeln!(f, "non-equidistant edges: {}", self.non_equidistant_edges)?;
        writeln!(f, "asymmetric adjacency: {}", self.asymmetric_adjacency)?;
        writeln!(f, "encroached vertices: {}", self.encroached_vertices)?;
        match self.max_site_pairs() {
            Some(max) => writeln!(f, "site pairs: {} (max {})", self.site_pairs, max)?,
            None => writeln!(f, "site pairs: {}", self.site_pairs)?,
        }
        write!(f, "valid: {}", self.is_valid())
    }
}

impl Voronoi {
    /// Check the computed diagram against the defining properties of a
    /// Voronoi diagram.
    pub fn validate(&self) -> ValidationReport {
        let sites = self.sites();
        let edges = self.edges();
        let tolerance = RELATIVE_TOLERANCE * extent(sites).max(f64::MIN_POSITIVE);

        let equidistant = |p: DVec2, a: DVec2, b: DVec2| {
            (p.distance(a) - p.distance(b)).abs() <= tolerance
        };
        let non_equidistant_edges = edges
            .iter()
            .filter(|edge| {
                let (a, b) = (sites[edge.left_site()], sites[edge.right_site()]);
                [Some(edge.start()), edge.end()]
                    .into_iter()
                    .flatten()
                    .filter(|p| p.is_finite())
                    .any(|p| !equidistant(p, a, b))
            })
            .count();

        let asymmetric_adjacency = edges
            .iter()
            .enumerate()
            .filter(|&(idx, edge)| match edge.adjacent() {
                Some(adjacent) => {
                    adjacent == idx
                        || edges.get(adjacent).and_then(|e| e.adjacent()) != Some(idx)
                }
                None => false,
            })
            .count();

        let rtree = RTree::bulk_load(sites.iter().map(|site| site.to_array()).collect());
        let encroached_vertices = edges
            .iter()
            .filter_map(|edge| edge.end().map(|end| (end, sites[edge.left_site()])))
            .filter(|&(vertex, site)| {
                rtree
                    .nearest_neighbor(&vertex.to_array())
                    .map_or(false, |&nearest| {
                        vertex.distance(DVec2::from_array(nearest))
                            < vertex.distance(site) - tolerance
                    })
            })
            .count();

        ValidationReport {
            num_sites: sites.len(),
            num_edges: edges.len(),
            non_equidistant_edges,
            asymmetric_adjacency,
            encroached_vertices,
            site_pairs: site_pairs(edges).len(),
        }
    }
}
