//! Example that builds the Voronoi diagram of n random sites in a rectangle.
//!
//! Run with: `cargo run --release --example random_sites`
//!
//! The number of sites and the size of the rectangle can optionally be given as command line
//! arguments: `cargo run --release --example random_sites -- [n] [width] [height]`
//!
//! Their default values are:
//! - `n`: 1000
//! - `width`: 800
//! - `height`: 600
//!
//! Set `RUST_LOG=fortune_voronoi=trace` to follow the sweep event by event.

use std::env;

use fortune_voronoi::Voronoi;
use glam::DVec2;
use rand::{distributions::Uniform, prelude::*};

fn random_sites(count: usize, width: f64, height: f64) -> Vec<DVec2> {
    let mut rng = thread_rng();
    let x = Uniform::new(0., width);
    let y = Uniform::new(0., height);
    (0..count)
        .map(|_| DVec2::new(rng.sample(x), rng.sample(y)))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fortune_voronoi=debug".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let count = match args.next() {
        Some(n) => n
            .parse::<usize>()
            .expect("The first argument should be an integer denoting the number of sites!"),
        None => 1000,
    };
    let width = match args.next() {
        Some(w) => w
            .parse::<f64>()
            .expect("The second argument should be the width of the rectangle!"),
        None => 800.,
    };
    let height = match args.next() {
        Some(h) => h
            .parse::<f64>()
            .expect("The third argument should be the height of the rectangle!"),
        None => 600.,
    };

    let sites = random_sites(count, width, height);
    let voronoi = match Voronoi::build(&sites) {
        Ok(voronoi) => voronoi,
        Err(err) => {
            eprintln!("Failed to build the Voronoi diagram: {err}");
            std::process::exit(1);
        }
    };

    let closed = voronoi.edges().iter().filter(|e| e.is_closed()).count();
    println!(
        "{} sites, {} edges ({} closed), {} vertices, {} events",
        voronoi.sites().len(),
        voronoi.edges().len(),
        closed,
        voronoi.vertices().len(),
        voronoi.processed_events()
    );
    println!("{}", voronoi.validate());
}
