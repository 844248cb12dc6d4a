//! **An implementation of
//! [Fortune's sweep line algorithm](https://en.wikipedia.org/wiki/Fortune%27s_algorithm)
//! for planar [Voronoi diagrams](https://en.wikipedia.org/wiki/Voronoi_diagram)
//! in Rust.**
//!
//! A horizontal sweep line moves down over the sites. Above it, the diagram is
//! final; the boundary of that region (the *beachline*) is a sequence of
//! parabolic arcs, and the breakpoints between consecutive arcs trace out the
//! Voronoi edges. Two kinds of events change the beachline: a *site event*
//! splits the arc above a new site, and a *circle event* removes an arc that
//! shrinks to a point, creating a Voronoi vertex.
//!
//! ```
//! use fortune_voronoi::Voronoi;
//! use glam::DVec2;
//!
//! let sites = [DVec2::new(0., 0.), DVec2::new(10., 0.), DVec2::new(5., 10.)];
//! let voronoi = Voronoi::build(&sites).unwrap();
//! assert_eq!(voronoi.vertices().len(), 1);
//! // two edges end in the vertex, the other three extend indefinitely
//! assert_eq!(voronoi.edges().iter().filter(|e| e.is_closed()).count(), 2);
//! ```
//!
//! # Features
//!
//! - Construction of the full diagram, including the unbounded edges, in
//!   `O(n log n)`.
//!
//! - Horizontal (top to bottom) or vertical (left to right) sweep.
//!
//! - Parallel construction of many independent diagrams.
//!
//! - Validation of a computed diagram against the defining properties of a
//!   Voronoi diagram.
//!
//! - A trace of the processed events, for visualisation of the sweep.
//!
//! # Cargo Features
#![doc = document_features::document_features!()]

mod error;
pub mod geometry;
mod voronoi;

pub use error::{Result, VoronoiError};
pub use voronoi::{
    SupportLine, SweepDirection, SweepStep, SweepStepKind, ValidationReport, Voronoi,
    VoronoiEdge, VoronoiOptions, DEFAULT_TOLERANCE,
};
