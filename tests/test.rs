use float_cmp::assert_approx_eq;
use fortune_voronoi::{SweepDirection, Voronoi, VoronoiError, VoronoiOptions};
use glam::DVec2;
use rand::prelude::*;
use rand::rngs::StdRng;

#[macro_export]
macro_rules! log_time {
    ($msg:expr, $x:expr) => {{
        let t0 = std::time::Instant::now();
        let _result = $x;
        let t1 = std::time::Instant::now();
        let dt = t1 - t0;
        println!("{}: {:?}", $msg, dt);
        _result
    }};
}

fn random_sites(count: usize, width: f64, height: f64, seed: u64) -> Vec<DVec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| DVec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}

/// Sites on a regular grid with a little noise, so that no four of them are
/// cocircular.
fn perturbed_grid(count: usize, pert: f64, seed: u64) -> Vec<DVec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count * count)
        .map(|n| {
            let (i, j) = (n / count, n % count);
            DVec2::new(
                i as f64 + 0.5 + pert * rng.gen_range(-0.5..0.5),
                j as f64 + 0.5 + pert * rng.gen_range(-0.5..0.5),
            )
        })
        .collect()
}

#[test]
fn test_random_sites() {
    let sites = random_sites(1000, 800., 600., 2);
    let voronoi = log_time!("Voronoi::build", Voronoi::build(&sites).unwrap());
    let report = voronoi.validate();
    assert!(report.is_valid(), "{report}");

    // the beachline starts with one arc and every site event adds two, every
    // vertex removes one (for points in general position)
    let vertices = voronoi.vertices();
    let closed = voronoi.edges().iter().filter(|e| e.is_closed()).count();
    assert_eq!(closed, 2 * vertices.len());
    assert_eq!(voronoi.edges().len(), 2 * (sites.len() - 1) + vertices.len());
    assert!(vertices.len() <= 2 * sites.len() - 5);
}

#[test]
fn test_vertices_are_circumcenters() {
    let sites = random_sites(300, 100., 100., 13);
    let voronoi = Voronoi::build(&sites).unwrap();
    for edge in voronoi.edges().iter().filter(|e| e.is_closed()) {
        let end = edge.end().unwrap();
        let (a, b) = (sites[edge.left_site()], sites[edge.right_site()]);
        assert_approx_eq!(f64, end.distance(a), end.distance(b), epsilon = 1e-7);
        // no site is closer to the vertex than the sites of the edge
        let nearest = sites
            .iter()
            .map(|site| end.distance(*site))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest > end.distance(a) - 1e-7);
    }
}

#[test]
fn test_sweep_directions_agree() {
    let sites = random_sites(500, 50., 50., 21);
    let top_to_bottom = Voronoi::build(&sites).unwrap();
    let options = VoronoiOptions::default().with_direction(SweepDirection::LeftToRight);
    let left_to_right = Voronoi::build_with(&sites, &options).unwrap();
    assert!(left_to_right.validate().is_valid());

    let mut a = top_to_bottom.vertices();
    let mut b = left_to_right.vertices();
    assert_eq!(a.len(), b.len());
    a.sort_by(|p, q| p.x.total_cmp(&q.x));
    b.sort_by(|p, q| p.x.total_cmp(&q.x));
    for (p, q) in a.iter().zip(b.iter()) {
        assert_approx_eq!(f64, p.x, q.x, epsilon = 1e-6);
        assert_approx_eq!(f64, p.y, q.y, epsilon = 1e-6);
    }
}

#[test]
fn test_perturbed_grid() {
    let sites = perturbed_grid(20, 0.5, 3);
    let voronoi = Voronoi::build(&sites).unwrap();
    let report = voronoi.validate();
    assert!(report.is_valid(), "{report}");
    assert!(report.site_pairs <= 3 * sites.len() - 6);
}

#[test]
fn test_grid_rows() {
    // all sites in a row share their y-coordinate with others
    let sites = perturbed_grid(10, 0., 0);
    let voronoi = Voronoi::build(&sites).unwrap();
    let report = voronoi.validate();
    assert!(report.is_valid(), "{report}");
    // every inner grid corner is a Voronoi vertex
    assert_eq!(voronoi.vertices().len(), 9 * 9);
}

#[test]
fn test_build_many() {
    let site_sets: Vec<Vec<DVec2>> = (0..8)
        .map(|seed| random_sites(100 + 10 * seed as usize, 10., 10., seed))
        .chain(std::iter::once(vec![]))
        .collect();
    let diagrams = Voronoi::build_many(&site_sets, &VoronoiOptions::default());
    assert_eq!(diagrams.len(), site_sets.len());
    for (sites, diagram) in site_sets.iter().zip(diagrams.iter()).take(8) {
        let diagram = diagram.as_ref().unwrap();
        assert_eq!(diagram.sites(), sites.as_slice());
        assert!(diagram.validate().is_valid());
    }
    assert_eq!(diagrams[8].as_ref().err(), Some(&VoronoiError::EmptyInput));
}

#[test]
fn test_event_budget() {
    let sites = random_sites(100, 1., 1., 5);
    let voronoi = Voronoi::build(&sites).unwrap();
    let needed = voronoi.processed_events();
    assert!(needed >= sites.len());

    let options = VoronoiOptions::default().with_max_events(needed);
    assert!(Voronoi::build_with(&sites, &options).is_ok());
    let options = VoronoiOptions::default().with_max_events(needed - 1);
    assert_eq!(
        Voronoi::build_with(&sites, &options).err(),
        Some(VoronoiError::EventBudgetExhausted { limit: needed - 1 })
    );
}

#[test]
fn test_scale_invariance() {
    for seed in 0..3 {
        let sites = random_sites(300, 1., 1., seed);
        let reference = Voronoi::build(&sites).unwrap();
        let num_vertices = reference.vertices().len();
        assert!(num_vertices > 0);

        for scale in [1e-8, 1e-7, 1e-4, 1e4, 1e8] {
            let scaled: Vec<DVec2> = sites.iter().map(|&site| site * scale).collect();
            let voronoi = log_time!(
                format!("Build at scale {scale:e}"),
                Voronoi::build(&scaled).unwrap()
            );
            assert_eq!(voronoi.edges().len(), reference.edges().len());
            assert_eq!(voronoi.vertices().len(), num_vertices);
            let report = voronoi.validate();
            assert!(report.is_valid(), "scale {scale:e}:\n{report}");
        }
    }
}
