use glam::DVec2;

/// Default tolerance for near-degenerate comparisons, relative to the largest
/// absolute coordinate of the sites.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// The largest absolute coordinate of `sites`.
pub(crate) fn extent(sites: &[DVec2]) -> f64 {
    sites
        .iter()
        .fold(0f64, |extent, site| extent.max(site.abs().max_element()))
}

/// The direction in which the sweep line moves over the sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SweepDirection {
    /// A horizontal sweep line moving from the largest y-coordinate down.
    #[default]
    TopToBottom,
    /// A vertical sweep line moving from the smallest x-coordinate right.
    LeftToRight,
}

impl SweepDirection {
    /// Rotate a point (or direction) into the frame in which the sweep line
    /// is horizontal and moves downwards.
    pub(super) fn to_sweep_frame(self, p: DVec2) -> DVec2 {
        match self {
            SweepDirection::TopToBottom => p,
            SweepDirection::LeftToRight => DVec2::new(p.y, -p.x),
        }
    }

    /// Inverse of [`SweepDirection::to_sweep_frame`].
    pub(super) fn from_sweep_frame(self, p: DVec2) -> DVec2 {
        match self {
            SweepDirection::TopToBottom => p,
            SweepDirection::LeftToRight => DVec2::new(-p.y, p.x),
        }
    }

    /// The coordinate of a sweep line at height `sweep` in the sweep frame,
    /// measured along the axis the sweep moves in.
    pub(super) fn sweep_position(self, sweep: f64) -> f64 {
        match self {
            SweepDirection::TopToBottom => sweep,
            SweepDirection::LeftToRight => -sweep,
        }
    }
}

/// Options for the construction of a [`Voronoi`](crate::Voronoi) diagram.
///
/// ```
/// use fortune_voronoi::{SweepDirection, VoronoiOptions};
/// use glam::DVec2;
///
/// let options = VoronoiOptions::default()
///     .with_tolerance(1e-7)
///     .with_max_events(10_000)
///     .with_direction(SweepDirection::LeftToRight);
/// assert_eq!(options.max_events, Some(10_000));
///
/// // without an explicit tolerance, it scales with the sites
/// let sites = [DVec2::new(0., 2e-6), DVec2::new(-3e-6, 0.)];
/// let tolerance = VoronoiOptions::default().tolerance_for(&sites);
/// assert!((tolerance - 3e-15).abs() < 1e-24);
/// assert_eq!(options.tolerance_for(&sites), 1e-7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiOptions {
    /// Absolute tolerance used to decide whether a site lies on the sweep
    /// line, whether an intersection lies behind the start of an edge and
    /// whether a circle event already passed.
    ///
    /// `None` uses [`DEFAULT_TOLERANCE`] times the largest absolute
    /// coordinate of the sites.
    pub tolerance: Option<f64>,
    /// Abort with [`VoronoiError::EventBudgetExhausted`](crate::VoronoiError)
    /// after processing this many events.
    pub max_events: Option<usize>,
    /// Record a [`SweepStep`](crate::SweepStep) for every processed event.
    pub record_trace: bool,
    /// The direction of the sweep.
    pub direction: SweepDirection,
}

impl Default for VoronoiOptions {
    fn default() -> Self {
        Self {
            tolerance: None,
            max_events: None,
            record_trace: false,
            direction: SweepDirection::TopToBottom,
        }
    }
}

impl VoronoiOptions {
    /// Use a fixed absolute tolerance instead of one scaled to the sites.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = Some(max_events);
        self
    }

    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn with_direction(mut self, direction: SweepDirection) -> Self {
        self.direction = direction;
        self
    }

    /// The absolute tolerance used for a sweep over `sites`.
    pub fn tolerance_for(&self, sites: &[DVec2]) -> f64 {
        self.tolerance.unwrap_or_else(|| DEFAULT_TOLERANCE * extent(sites))
    }
}
