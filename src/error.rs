use glam::DVec2;

/// Errors that abort the construction of a Voronoi diagram.
///
/// None of these are recoverable for the site set that caused them: callers
/// should sanitize the input (e.g. deduplicate or perturb the sites) and
/// retry.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum VoronoiError {
    /// No sites were given.
    #[error("Cannot build a Voronoi diagram without sites")]
    EmptyInput,

    /// A site has a NaN or infinite coordinate.
    #[error("Site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },

    /// Two sites share identical coordinates.
    #[error("Sites {first} and {second} coincide")]
    DuplicateSite { first: usize, second: usize },

    /// A parabola was requested for a focus lying on its directrix.
    #[error("Degenerate parabola: focus {site} lies on the directrix y = {directrix}")]
    DegenerateParabola { site: DVec2, directrix: f64 },

    /// A site event could not be inserted into the beachline.
    #[error("Degenerate input at site {site}: {reason}")]
    DegenerateInput { site: usize, reason: &'static str },

    /// The beachline reached a state that correct bookkeeping never produces.
    #[error("Beachline invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// The sweep processed more events than allowed.
    #[error("Event budget of {limit} events exhausted")]
    EventBudgetExhausted { limit: usize },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
